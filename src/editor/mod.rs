//! 編集層
//!
//! プレースホルダーの挿入・置換をテキスト領域へ適用する

pub mod splice;

pub use splice::{adjust_cursor, ReplaceOutcome, SpliceEngine};
