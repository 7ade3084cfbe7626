use deckgen::deck::{self, DeckBuilder, SlideRecord, truncate_chars};
use proptest::prelude::*;

/// Bullets mixing ASCII with two- and three-byte characters.
fn bullets_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zè↔ ]{0,120}", 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_truncate_is_char_prefix(text in "[a-zèé↔ 🎮]{0,400}", max in 0usize..300) {
        let truncated = truncate_chars(&text, max);

        prop_assert!(text.starts_with(truncated));
        prop_assert_eq!(truncated.chars().count(), text.chars().count().min(max));
    }

    #[test]
    fn prop_subtitle_is_truncated_join(bullets in bullets_strategy()) {
        let records = [SlideRecord {
            title: "Titolo".to_string(),
            bullets: bullets.clone(),
            notes: String::new(),
        }];
        let pres = DeckBuilder::default().build_presentation(&records).unwrap();

        let subtitle = pres.slides()[0].placeholder(1).unwrap().text_frame().text();
        let expected: String = bullets.join(" - ").chars().take(250).collect();
        prop_assert_eq!(subtitle, expected);
    }
}

#[test]
fn default_records_build_in_memory() {
    let bytes = DeckBuilder::default()
        .build_bytes(&deck::default_records())
        .unwrap();
    assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
}
