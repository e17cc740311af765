//! Result shapes returned by the content-generation service.
//!
//! The service itself lives elsewhere; these types describe what it hands
//! back so that callers can save drafts, favorites and sessions from it.

use serde::{Deserialize, Serialize};

/// Separator between the parts of an idea when it is copied as one text.
const PART_SEPARATOR: &str = "\n\n";

/// One generated social post idea.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Idea {
    pub hook: String,
    /// Post body. Newer service builds send it as `caption`.
    #[serde(alias = "caption")]
    pub script: String,
    /// Space-separated hashtags, e.g. `#CleanBeauty #RockMa`.
    pub hashtags: String,
}

impl Idea {
    /// Hook, script and hashtags joined by blank lines, as copied to the
    /// clipboard and saved as a draft.
    pub fn full_text(&self) -> String {
        [self.hook.as_str(), self.script.as_str(), self.hashtags.as_str()].join(PART_SEPARATOR)
    }
}

/// Daily inspiration response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedIdeas {
    pub ideas: Vec<Idea>,
    /// The product the ideas were written for.
    pub product: String,
}

/// Brand-voice rewrite response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdaptedText {
    pub adapted_text: String,
}

/// Platform translation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatedContent {
    pub translated_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_joins_with_blank_lines() {
        let idea = Idea {
            hook: "Dry skin?".to_string(),
            script: "Meet Vanilla Cream.".to_string(),
            hashtags: "#RockMa".to_string(),
        };
        assert_eq!(idea.full_text(), "Dry skin?\n\nMeet Vanilla Cream.\n\n#RockMa");
    }

    #[test]
    fn test_parse_service_payloads() {
        let ideas: GeneratedIdeas = serde_json::from_str(
            r##"{"success":true,"ideas":[{"hook":"h","caption":"c","hashtags":"#a"}],"product":"RockMa Aesthetic Apparel"}"##,
        )
        .unwrap();
        assert_eq!(ideas.ideas[0].script, "c");
        assert_eq!(ideas.product, "RockMa Aesthetic Apparel");

        let legacy: Idea = serde_json::from_str(r#"{"hook":"h","script":"s"}"#).unwrap();
        assert_eq!(legacy.script, "s");
        assert_eq!(legacy.hashtags, "");

        let adapted: AdaptedText = serde_json::from_str(r#"{"adaptedText":"warm words"}"#).unwrap();
        assert_eq!(adapted.adapted_text, "warm words");

        let translated: TranslatedContent =
            serde_json::from_str(r#"{"translatedContent":"tiktok copy","platform":"TikTok"}"#).unwrap();
        assert_eq!(translated.translated_content, "tiktok copy");
    }
}
