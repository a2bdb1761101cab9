//! メモリ内テキスト領域
//!
//! `TextSurface` の標準実装。CLI とテストで投稿欄の代わりに使う

use super::{char_to_byte, TextSurface};

/// 変更イベント
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// テキストが変更された（input イベント）
    Input { length: usize },
    /// 選択範囲が移動した
    SelectionMove {
        old: (usize, usize),
        new: (usize, usize),
    },
}

/// 変更通知リスナー
pub trait ChangeListener {
    fn on_change(&mut self, event: &ChangeEvent);
}

/// 変更通知システム
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// リスナーを追加
    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// 変更を通知
    pub fn notify(&mut self, event: ChangeEvent) {
        for listener in &mut self.listeners {
            listener.on_change(&event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// テキスト領域
#[derive(Debug, Default)]
pub struct TextArea {
    value: String,
    selection: (usize, usize),
    scroll_top: f64,
    notifier: ChangeNotifier,
    notices: Vec<String>,
    input_events: usize,
}

impl TextArea {
    /// 空のテキスト領域
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列から作成（カーソルは先頭）
    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            ..Self::default()
        }
    }

    /// 変更リスナーを追加
    pub fn add_change_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.notifier.add_listener(listener);
    }

    pub fn len_chars(&self) -> usize {
        self.value.chars().count()
    }

    /// カーソル（選択開始位置）
    pub fn cursor(&self) -> usize {
        self.selection.0
    }

    /// カーソルを移動（選択は解除）
    pub fn move_cursor_to(&mut self, char_pos: usize) {
        self.set_selection(char_pos, char_pos);
    }

    /// 表示された通知
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// 発火した input イベント数
    pub fn input_events(&self) -> usize {
        self.input_events
    }

    /// ユーザー入力を模した挿入
    ///
    /// 挿入位置より後ろの選択端は挿入分だけずらす
    pub fn type_at(&mut self, char_pos: usize, text: &str) {
        let pos = char_pos.min(self.len_chars());
        let byte = char_to_byte(&self.value, pos);
        self.value.insert_str(byte, text);

        let inserted = text.chars().count();
        let shift = |end: usize| if end >= pos { end + inserted } else { end };
        let (start, end) = self.selection;
        self.set_selection(shift(start), shift(end));
        self.dispatch_input();
    }

    /// ユーザー入力を模した範囲削除。削除した文字列を返す
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let len = self.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return String::new();
        }

        let start_byte = char_to_byte(&self.value, start);
        let end_byte = char_to_byte(&self.value, end);
        let deleted: String = self.value.drain(start_byte..end_byte).collect();

        let adjust = |pos: usize| {
            if pos <= start {
                pos
            } else if pos <= end {
                start
            } else {
                pos - (end - start)
            }
        };
        let (sel_start, sel_end) = self.selection;
        self.set_selection(adjust(sel_start), adjust(sel_end));
        self.dispatch_input();
        deleted
    }
}

impl TextSurface for TextArea {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
        let (start, end) = self.selection;
        self.set_selection(start, end);
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let old = self.selection;
        self.selection = (start, end);

        if old != self.selection {
            self.notifier.notify(ChangeEvent::SelectionMove {
                old,
                new: self.selection,
            });
        }
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.max(0.0);
    }

    fn dispatch_input(&mut self) {
        self.input_events += 1;
        let length = self.len_chars();
        self.notifier.notify(ChangeEvent::Input { length });
    }

    fn show_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
