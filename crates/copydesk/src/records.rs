//! Record types for the draft, favorite and idea-clip collections.
//!
//! Field names serialize in camelCase to match the JSON written by earlier
//! releases. Fields added after the first release (`posted`,
//! `postedTimestamp`, `metadata`, `intent`, `snippet`) carry serde defaults
//! so older records load instead of failing; [`Record::normalize`] then
//! fills in anything that has to be derived.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{Editable, Record};
use crate::keys::names;

/// Open key/value map attached to drafts and favorites
/// (e.g. `platform`, `audience`, `product`).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

pub const DRAFT_LIMIT: usize = 3;
pub const FAVORITE_LIMIT: usize = 20;
pub const CLIP_LIMIT: usize = 50;

pub const DRAFT_SNIPPET_CHARS: usize = 50;
pub const FAVORITE_SNIPPET_CHARS: usize = 60;
pub const CLIP_SNIPPET_CHARS: usize = 60;
pub const CLIP_NOTES_MAX_CHARS: usize = 100;

/// First `width` characters of `text`, with `...` appended when cut.
pub fn snippet(text: &str, width: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(width).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn truncate_chars(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Which workflow produced a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "Daily Idea")]
    DailyIdea,
    Adaptation,
    Translation,
    #[serde(rename = "Raw Idea")]
    RawIdea,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::DailyIdea => "Daily Idea",
            ContentKind::Adaptation => "Adaptation",
            ContentKind::Translation => "Translation",
            ContentKind::RawIdea => "Raw Idea",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized content kind or clip intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {what} '{value}'")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
}

/// Lower-case and drop separators so `Daily Idea`, `daily-idea` and
/// `daily_idea` compare equal.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for ContentKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "dailyidea" => Ok(ContentKind::DailyIdea),
            "adaptation" => Ok(ContentKind::Adaptation),
            "translation" => Ok(ContentKind::Translation),
            "rawidea" => Ok(ContentKind::RawIdea),
            _ => Err(ParseKindError {
                what: "content kind",
                value: s.to_string(),
            }),
        }
    }
}

/// What the operator intends to turn a clipped idea into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipIntent {
    #[default]
    GeneralRewrite,
    FormatLinkedinSales,
    FormatEmailNewsletter,
    FormatTiktokVisual,
}

impl ClipIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            ClipIntent::GeneralRewrite => "general_rewrite",
            ClipIntent::FormatLinkedinSales => "format_linkedin_sales",
            ClipIntent::FormatEmailNewsletter => "format_email_newsletter",
            ClipIntent::FormatTiktokVisual => "format_tiktok_visual",
        }
    }
}

impl fmt::Display for ClipIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipIntent {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "generalrewrite" => Ok(ClipIntent::GeneralRewrite),
            "formatlinkedinsales" => Ok(ClipIntent::FormatLinkedinSales),
            "formatemailnewsletter" => Ok(ClipIntent::FormatEmailNewsletter),
            "formattiktokvisual" => Ok(ClipIntent::FormatTiktokVisual),
            _ => Err(ParseKindError {
                what: "clip intent",
                value: s.to_string(),
            }),
        }
    }
}

/// Automatically saved copy of generated content, kept for short-term recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub posted_timestamp: Option<DateTime<Utc>>,
}

impl Draft {
    pub fn new(
        id: String,
        kind: ContentKind,
        content: String,
        metadata: Metadata,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            snippet: snippet(&content, DRAFT_SNIPPET_CHARS),
            id,
            kind,
            content,
            metadata,
            timestamp,
            posted: false,
            posted_timestamp: None,
        }
    }
}

/// Content the operator starred for longer retention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub metadata: Metadata,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub posted_timestamp: Option<DateTime<Utc>>,
}

impl Favorite {
    pub fn new(
        id: String,
        content: String,
        kind: ContentKind,
        metadata: Metadata,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            snippet: snippet(&content, FAVORITE_SNIPPET_CHARS),
            id,
            content,
            kind,
            metadata,
            timestamp,
            posted: false,
            posted_timestamp: None,
        }
    }

    /// A string-valued metadata field, if present.
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata.get(field).and_then(|v| v.as_str())
    }
}

/// Raw inspiration captured for later transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaClip {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub intent: ClipIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub posted_timestamp: Option<DateTime<Utc>>,
}

impl IdeaClip {
    /// Build a clip; notes are cut to [`CLIP_NOTES_MAX_CHARS`] and blank
    /// url/notes are dropped.
    pub fn new(
        id: String,
        text: String,
        url: Option<String>,
        intent: ClipIntent,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            snippet: snippet(&text, CLIP_SNIPPET_CHARS),
            id,
            text,
            url: url.filter(|u| !u.trim().is_empty()),
            intent,
            notes: clip_notes(notes),
            timestamp,
            posted: false,
            posted_timestamp: None,
        }
    }
}

pub(crate) fn clip_notes(notes: Option<String>) -> Option<String> {
    notes
        .filter(|n| !n.trim().is_empty())
        .map(|n| truncate_chars(&n, CLIP_NOTES_MAX_CHARS))
}

impl Record for Draft {
    const NAME: &'static str = names::RECENT_DRAFTS;
    const LIMIT: usize = DRAFT_LIMIT;

    fn id(&self) -> &str {
        &self.id
    }

    fn normalize(&mut self) {
        if self.snippet.is_empty() {
            self.snippet = snippet(&self.content, DRAFT_SNIPPET_CHARS);
        }
    }
}

impl Editable for Draft {
    fn body(&self) -> &str {
        &self.content
    }

    fn set_body(&mut self, body: &str) {
        self.content = body.to_string();
        self.snippet = snippet(body, DRAFT_SNIPPET_CHARS);
    }

    fn set_posted(&mut self, posted_at: Option<DateTime<Utc>>) {
        self.posted = posted_at.is_some();
        self.posted_timestamp = posted_at;
    }
}

impl Record for Favorite {
    const NAME: &'static str = names::FAVORITES;
    const LIMIT: usize = FAVORITE_LIMIT;

    fn id(&self) -> &str {
        &self.id
    }

    fn normalize(&mut self) {
        if self.snippet.is_empty() {
            self.snippet = snippet(&self.content, FAVORITE_SNIPPET_CHARS);
        }
    }
}

impl Editable for Favorite {
    fn body(&self) -> &str {
        &self.content
    }

    fn set_body(&mut self, body: &str) {
        self.content = body.to_string();
        self.snippet = snippet(body, FAVORITE_SNIPPET_CHARS);
    }

    fn set_posted(&mut self, posted_at: Option<DateTime<Utc>>) {
        self.posted = posted_at.is_some();
        self.posted_timestamp = posted_at;
    }
}

impl Record for IdeaClip {
    const NAME: &'static str = names::IDEA_CLIPS;
    const LEGACY_NAME: Option<&'static str> = Some(names::COMPETITOR_CLIPS);
    const LIMIT: usize = CLIP_LIMIT;

    fn id(&self) -> &str {
        &self.id
    }

    fn normalize(&mut self) {
        if self.snippet.is_empty() {
            self.snippet = snippet(&self.text, CLIP_SNIPPET_CHARS);
        }
    }
}

impl Editable for IdeaClip {
    fn body(&self) -> &str {
        &self.text
    }

    fn set_body(&mut self, body: &str) {
        self.text = body.to_string();
        self.snippet = snippet(body, CLIP_SNIPPET_CHARS);
    }

    fn set_posted(&mut self, posted_at: Option<DateTime<Utc>>) {
        self.posted = posted_at.is_some();
        self.posted_timestamp = posted_at;
    }
}
