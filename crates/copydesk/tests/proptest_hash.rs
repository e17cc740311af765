//! Property-based tests for content hashing and bounded collections.

use copydesk::{ContentKind, Metadata, content_hash};
use proptest::prelude::*;

mod common;

fn is_base36(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}

proptest! {
    #[test]
    fn hash_is_deterministic(text in ".*") {
        prop_assert_eq!(content_hash(&text), content_hash(&text));
    }

    #[test]
    fn hash_ignores_surrounding_whitespace(text in "[a-zA-Z0-9 ]{0,40}", pad in "[ \t\n]{0,4}") {
        let padded = format!("{pad}{text}{pad}");
        prop_assert_eq!(content_hash(&padded), content_hash(&text));
    }

    #[test]
    fn hash_ignores_ascii_case(text in "[a-zA-Z0-9!?., ]{0,60}") {
        prop_assert_eq!(content_hash(&text.to_uppercase()), content_hash(&text.to_lowercase()));
    }

    #[test]
    fn hash_is_short_base36(text in any::<String>()) {
        let hash = content_hash(&text);
        prop_assert!(is_base36(&hash), "not base36: {}", hash);
        // 2^31 in base36 is "zik0zk"
        prop_assert!(hash.len() <= 6);
    }

    #[test]
    fn drafts_never_exceed_three(count in 0usize..10) {
        let fx = common::Fixture::new();
        for i in 0..count {
            fx.desk.drafts().save(ContentKind::RawIdea, &format!("draft {i}"), Metadata::new());
            fx.tick();
        }
        let drafts = fx.desk.drafts().list();
        prop_assert_eq!(drafts.len(), count.min(3));
        if let Some(newest) = drafts.first() {
            prop_assert_eq!(&newest.content, &format!("draft {}", count - 1));
        }
    }
}
