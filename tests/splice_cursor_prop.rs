//! Splice engine property tests
//!
//! Placeholder relocation and cursor adjustment are checked against a plain
//! string model, independent of the order in which the user edited the text.

use pasteup::config::ContentWrap;
use pasteup::editor::SpliceEngine;
use pasteup::upload::{failure_text, locate, placeholder_for, FileClass, UploadId};
use pasteup::{ErrorKind, TextArea, TextSurface};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// `!` is left out: directly before a plain placeholder it would be taken as the
// embed prefix and matched together with it.
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-z 日本語\n\\[\\]|()]{0,24}"
}

fn class_strategy() -> impl Strategy<Value = Option<FileClass>> {
    prop_oneof![
        Just(None),
        Just(Some(FileClass::Image)),
        Just(Some(FileClass::Video)),
        Just(Some(FileClass::Audio)),
        Just(Some(FileClass::Document)),
    ]
}

fn id_strategy() -> impl Strategy<Value = UploadId> {
    (1u64..10_000, 1_600_000_000_000u64..1_900_000_000_000).prop_map(|(seq, ts)| UploadId::new(seq, ts))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn inserted_placeholder_is_locatable(
        text in text_strategy(),
        cursor in 0usize..32,
        class in class_strategy(),
        id in id_strategy(),
    ) {
        let mut area = TextArea::from_str(&text);
        area.move_cursor_to(cursor);
        let state = area.snapshot();

        let placeholder = placeholder_for(class, id);
        prop_assert!(placeholder.contains(&id.to_string()));

        let position = SpliceEngine::default().insert(&mut area, &state, &placeholder);
        let span = locate(&area.value(), id).expect("placeholder must be found");

        prop_assert_eq!(&span.text, &placeholder);
        // 既定の前置き改行 1 文字ぶん後ろ
        prop_assert_eq!(span.start, position + 1);
    }

    #[test]
    fn replacement_moves_cursor_by_three_rules(
        before in text_strategy(),
        after in text_strategy(),
        replacement in "[a-z()\\[\\]/:.!]{0,40}",
        start_seed in any::<usize>(),
        end_seed in any::<usize>(),
        scroll in 0.0f64..5_000.0,
        class in class_strategy(),
        id in id_strategy(),
    ) {
        let placeholder = placeholder_for(class, id);
        let text = format!("{before}{placeholder}{after}");
        let len = text.chars().count();
        let s = before.chars().count();
        let e = s + placeholder.chars().count();
        let n = replacement.chars().count();
        let (a, b) = (start_seed % (len + 1), end_seed % (len + 1));
        let (sel_start, sel_end) = (a.min(b), a.max(b));

        let mut area = TextArea::from_str(&text);
        area.set_selection(sel_start, sel_end);
        area.set_scroll_top(scroll);
        let outcome = SpliceEngine::new(ContentWrap::none()).replace_by_pattern(&mut area, id, &replacement);

        prop_assert!(outcome.found);
        prop_assert_eq!(area.value(), format!("{before}{replacement}{after}"));

        let expected = |c: usize| if c < s {
            c
        } else if c <= e {
            s + n
        } else {
            c + n - (e - s)
        };
        prop_assert_eq!(area.selection(), (expected(sel_start), expected(sel_end)));
        prop_assert_eq!(area.scroll_top(), scroll);
    }

    #[test]
    fn missing_placeholder_always_appends(
        text in text_strategy(),
        cursor in 0usize..32,
        replacement in "[a-z]{1,12}",
        id in id_strategy(),
    ) {
        let mut area = TextArea::from_str(&text);
        area.move_cursor_to(cursor);

        let outcome = SpliceEngine::default().replace_by_pattern(&mut area, id, &replacement);
        prop_assert!(!outcome.found);

        let value = area.value();
        prop_assert!(value.starts_with(&text));
        prop_assert!(value.ends_with(&replacement));
        prop_assert_eq!(area.cursor(), value.chars().count());
    }

    #[test]
    fn failure_text_always_names_the_upload(id in id_strategy(), code in "[a-z]{0,10}") {
        let marker = failure_text(id, ErrorKind::from_code(&code));
        prop_assert!(!marker.is_empty());
        prop_assert!(marker.contains(&id.to_string()));
    }
}
