//! バッファ管理モジュール
//!
//! 編集対象テキストへの窓口（`TextSurface`）と、そのメモリ内実装を提供
//! 位置はすべて文字単位（バイトではない）

pub mod text_area;

pub use text_area::{ChangeEvent, ChangeListener, ChangeNotifier, TextArea};

/// プログラムから書き換える前後で保存・復元するエディタ状態
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    /// 選択開始（文字位置）
    pub selection_start: usize,
    /// 選択終了（文字位置）
    pub selection_end: usize,
    /// 縦スクロール量
    pub scroll_top: f64,
    /// テキスト全体
    pub value: String,
}

impl EditorState {
    /// テキスト長（文字数）
    pub fn len_chars(&self) -> usize {
        self.value.chars().count()
    }
}

/// 編集対象のテキスト領域
///
/// フォーラムの投稿欄など、外部のテキスト入力欄を抽象化する。
/// 実装側は選択範囲をテキスト長に丸めること
pub trait TextSurface {
    /// テキスト全体
    fn value(&self) -> String;

    /// テキスト全体を置き換え
    fn set_value(&mut self, value: String);

    /// 選択範囲 (開始, 終了)
    fn selection(&self) -> (usize, usize);

    /// 選択範囲を設定
    fn set_selection(&mut self, start: usize, end: usize);

    fn scroll_top(&self) -> f64;

    fn set_scroll_top(&mut self, scroll_top: f64);

    /// 変更通知（input イベント相当）を発火
    fn dispatch_input(&mut self);

    /// ユーザーへのブロッキング通知
    fn show_notice(&mut self, message: &str) {
        let _ = message;
    }

    /// 現在の状態を取得
    fn snapshot(&self) -> EditorState {
        let (selection_start, selection_end) = self.selection();
        EditorState {
            selection_start,
            selection_end,
            scroll_top: self.scroll_top(),
            value: self.value(),
        }
    }
}

/// 文字位置をバイト位置に変換（範囲外は末尾）
pub fn char_to_byte(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// バイト位置を文字位置に変換
pub fn byte_to_char(text: &str, byte_pos: usize) -> usize {
    text[..byte_pos.min(text.len())].chars().count()
}
