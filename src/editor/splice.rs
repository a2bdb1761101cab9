//! テキスト継ぎ接ぎ（スプライス）エンジン
//!
//! 位置指定の挿入と、パターン検索による置換を行い、
//! カーソル・スクロール位置をユーザーが編集していた状態に戻す

use crate::buffer::{char_to_byte, EditorState, TextSurface};
use crate::config::ContentWrap;
use crate::upload::placeholder::{locate, PlaceholderSpan};
use crate::upload::UploadId;

/// 置換結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// プレースホルダーが見つかったか（false なら末尾に追記した）
    pub found: bool,
    /// 置換した範囲（置換前の位置）
    pub span: Option<PlaceholderSpan>,
}

/// 置換後のカーソル位置
///
/// * 範囲より前: そのまま
/// * 範囲内（両端含む）: 置換テキストの直後
/// * 範囲より後: 長さの差分だけずらす
pub fn adjust_cursor(cursor: usize, span_start: usize, span_end: usize, replacement_len: usize) -> usize {
    if cursor < span_start {
        cursor
    } else if cursor <= span_end {
        span_start + replacement_len
    } else {
        cursor + replacement_len - (span_end - span_start)
    }
}

/// 文字位置 `start..end` を `replacement` で置き換えた文字列
fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end);
    let mut spliced = String::with_capacity(text.len() + replacement.len());
    spliced.push_str(&text[..start_byte]);
    spliced.push_str(replacement);
    spliced.push_str(&text[end_byte..]);
    spliced
}

/// スプライスエンジン
#[derive(Debug, Clone, Default)]
pub struct SpliceEngine {
    wrap: ContentWrap,
}

impl SpliceEngine {
    pub fn new(wrap: ContentWrap) -> Self {
        Self { wrap }
    }

    /// `state.selection_start` に前後空白付きで挿入し、挿入位置を返す
    ///
    /// 選択範囲は削除しない。カーソルは挿入したテキストの直後、
    /// スクロールは `state` の値に戻す
    pub fn insert<S: TextSurface + ?Sized>(&self, surface: &mut S, state: &EditorState, text: &str) -> usize {
        let position = state.selection_start.min(state.len_chars());
        let wrapped = self.wrap.apply(text);

        surface.set_value(splice(&state.value, position, position, &wrapped));
        surface.dispatch_input();

        let cursor = position + wrapped.chars().count();
        surface.set_selection(cursor, cursor);
        surface.set_scroll_top(state.scroll_top);

        log::debug!("inserted {} chars at {}", wrapped.chars().count(), position);
        position
    }

    /// ID のプレースホルダーを `replacement` に置き換える
    ///
    /// 呼び出し時点のテキスト・カーソルを読み直して検索する。
    /// 見つからなければ末尾に追記する（必ず成功する）
    pub fn replace_by_pattern<S: TextSurface + ?Sized>(
        &self,
        surface: &mut S,
        id: UploadId,
        replacement: &str,
    ) -> ReplaceOutcome {
        let state = surface.snapshot();

        let Some(span) = locate(&state.value, id) else {
            self.append_fallback(surface, &state, replacement);
            return ReplaceOutcome {
                found: false,
                span: None,
            };
        };

        surface.set_value(splice(&state.value, span.start, span.end, replacement));
        surface.dispatch_input();

        let replacement_len = replacement.chars().count();
        let start = adjust_cursor(state.selection_start, span.start, span.end, replacement_len);
        let end = adjust_cursor(state.selection_end, span.start, span.end, replacement_len);
        surface.set_selection(start, end);
        surface.set_scroll_top(state.scroll_top);

        ReplaceOutcome {
            found: true,
            span: Some(span),
        }
    }

    /// 末尾に追記（必要なら改行で区切る）し、カーソルを末尾へ
    fn append_fallback<S: TextSurface + ?Sized>(&self, surface: &mut S, state: &EditorState, replacement: &str) {
        log::info!("placeholder missing, appending {} chars at end", replacement.chars().count());

        let mut value = state.value.clone();
        if !value.is_empty() && !value.ends_with('\n') {
            value.push('\n');
        }
        value.push_str(replacement);

        let end = value.chars().count();
        surface.set_value(value);
        surface.dispatch_input();
        surface.set_selection(end, end);
        surface.set_scroll_top(state.scroll_top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextArea;
    use crate::upload::classify::FileClass;
    use crate::upload::placeholder::placeholder_for;

    fn id(seq: u64) -> UploadId {
        UploadId::new(seq, 1_700_000_000_000)
    }

    #[test]
    fn test_insert_wraps_and_moves_cursor() {
        let mut area = TextArea::from_str("helloworld");
        area.move_cursor_to(5);
        area.set_scroll_top(120.0);
        let state = area.snapshot();

        let engine = SpliceEngine::default();
        let position = engine.insert(&mut area, &state, "X");

        assert_eq!(position, 5);
        assert_eq!(area.value(), "hello\nX\n\nworld");
        assert_eq!(area.cursor(), 9);
        assert_eq!(area.scroll_top(), 120.0);
        assert_eq!(area.input_events(), 1);
    }

    #[test]
    fn test_insert_clamps_stale_position() {
        let mut area = TextArea::from_str("ab");
        let mut state = area.snapshot();
        state.selection_start = 99;

        let engine = SpliceEngine::new(ContentWrap::none());
        assert_eq!(engine.insert(&mut area, &state, "c"), 2);
        assert_eq!(area.value(), "abc");
    }

    #[test]
    fn test_adjust_cursor_cases() {
        // 範囲 [4, 10) を長さ 3 で置換
        assert_eq!(adjust_cursor(2, 4, 10, 3), 2);
        assert_eq!(adjust_cursor(4, 4, 10, 3), 7);
        assert_eq!(adjust_cursor(10, 4, 10, 3), 7);
        assert_eq!(adjust_cursor(15, 4, 10, 3), 8);
        // 長くなる置換
        assert_eq!(adjust_cursor(15, 4, 10, 20), 29);
    }

    #[test]
    fn test_replace_keeps_cursor_before_span() {
        let placeholder = placeholder_for(Some(FileClass::Image), id(1));
        let mut area = TextArea::from_str(&format!("ab{placeholder}cd"));
        area.move_cursor_to(1);

        let outcome = SpliceEngine::default().replace_by_pattern(&mut area, id(1), "LINK");
        assert!(outcome.found);
        assert_eq!(area.value(), "abLINKcd");
        assert_eq!(area.cursor(), 1);
    }

    #[test]
    fn test_replace_shifts_cursor_after_span() {
        let placeholder = placeholder_for(Some(FileClass::Image), id(1));
        let text = format!("ab{placeholder}cd");
        let len = text.chars().count();
        let mut area = TextArea::from_str(&text);
        area.move_cursor_to(len);

        SpliceEngine::default().replace_by_pattern(&mut area, id(1), "LINK");
        assert_eq!(area.cursor(), "abLINKcd".chars().count());
    }

    #[test]
    fn test_replace_cursor_inside_span_lands_after_replacement() {
        let placeholder = placeholder_for(None, id(1));
        let mut area = TextArea::from_str(&format!("ab{placeholder}cd"));
        area.move_cursor_to(5);

        SpliceEngine::default().replace_by_pattern(&mut area, id(1), "LINK");
        assert_eq!(area.cursor(), 6);
    }

    #[test]
    fn test_replace_restores_scroll_and_selection() {
        let placeholder = placeholder_for(Some(FileClass::Video), id(4));
        let mut area = TextArea::from_str(&format!("ab{placeholder}cd"));
        // 選択開始は範囲より前、終端は範囲内
        area.set_selection(1, 5);
        area.set_scroll_top(75.0);

        let outcome = SpliceEngine::default().replace_by_pattern(&mut area, id(4), "LINK");
        assert!(outcome.found);
        assert_eq!(area.value(), "abLINKcd");
        assert_eq!(area.selection(), (1, 2 + 4));
        assert_eq!(area.scroll_top(), 75.0);
    }

    #[test]
    fn test_replace_shifts_selection_after_span() {
        let placeholder = placeholder_for(None, id(5));
        let text = format!("ab{placeholder}cdef");
        let span_len = placeholder.chars().count();
        let mut area = TextArea::from_str(&text);
        area.set_selection(2 + span_len + 1, 2 + span_len + 3);

        SpliceEngine::default().replace_by_pattern(&mut area, id(5), "L");
        assert_eq!(area.value(), "abLcdef");
        assert_eq!(area.selection(), (4, 6));
    }

    #[test]
    fn test_replace_reads_current_text() {
        let placeholder = placeholder_for(Some(FileClass::Image), id(2));
        let mut area = TextArea::from_str(&placeholder);

        // 挿入後にユーザーが先頭へ入力
        area.type_at(0, "typed meanwhile ");
        let outcome = SpliceEngine::default().replace_by_pattern(&mut area, id(2), "![a](u)");

        assert_eq!(outcome.span.map(|span| span.start), Some(16));
        assert_eq!(area.value(), "typed meanwhile ![a](u)");
    }

    #[test]
    fn test_fallback_appends_with_separator() {
        let mut area = TextArea::from_str("user deleted it");
        area.move_cursor_to(3);
        area.set_scroll_top(40.0);

        let outcome = SpliceEngine::default().replace_by_pattern(&mut area, id(9), "![a](u)");
        assert!(!outcome.found);
        assert_eq!(area.value(), "user deleted it\n![a](u)");
        assert_eq!(area.cursor(), area.len_chars());
        assert_eq!(area.scroll_top(), 40.0);
    }

    #[test]
    fn test_fallback_on_empty_and_newline_terminated() {
        let engine = SpliceEngine::default();

        let mut empty = TextArea::new();
        engine.replace_by_pattern(&mut empty, id(1), "L");
        assert_eq!(empty.value(), "L");

        let mut terminated = TextArea::from_str("line\n");
        engine.replace_by_pattern(&mut terminated, id(1), "L");
        assert_eq!(terminated.value(), "line\nL");
    }
}
