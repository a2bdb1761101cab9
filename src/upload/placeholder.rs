//! プレースホルダーの生成と検索
//!
//! 生成: `{!}[上传中...{id}{|kind}]`
//! 検索: ユーザーが編集した後のテキストから同じ ID のプレースホルダーを探す

use super::classify::FileClass;
use super::registry::UploadId;
use crate::buffer::byte_to_char;
use crate::error::ErrorKind;
use regex::Regex;

const UPLOADING_LABEL: &str = "上传中...";

/// テキスト内のプレースホルダー位置（検索のたびに再計算する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpan {
    /// 開始位置（文字単位）
    pub start: usize,
    /// 終了位置（文字単位、排他的）
    pub end: usize,
    pub text: String,
}

impl PlaceholderSpan {
    /// 長さ（文字数）
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// プレースホルダー文字列を生成
///
/// 分類が無い場合（汎用）は `[上传中...{id}]`
pub fn placeholder_for(class: Option<FileClass>, id: UploadId) -> String {
    let prefix = if class.is_some_and(FileClass::is_embedded) {
        "!"
    } else {
        ""
    };
    let suffix = class.map(FileClass::suffix).unwrap_or_default();
    format!("{prefix}[{UPLOADING_LABEL}{id}{suffix}]")
}

/// ID に対応する検索パターン
fn pattern_for(id: &str) -> Option<Regex> {
    let pattern = format!(
        r"(!)?\[{}{}(\|[a-z]+)?\]",
        regex::escape(UPLOADING_LABEL),
        regex::escape(id)
    );
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::error!("placeholder pattern for {id} did not compile: {err}");
            None
        }
    }
}

/// テキストから ID のプレースホルダーを探す（最初の一致）
pub fn locate(text: &str, id: UploadId) -> Option<PlaceholderSpan> {
    locate_raw(text, &id.to_string())
}

/// 任意の ID 文字列で検索する
pub fn locate_raw(text: &str, id: &str) -> Option<PlaceholderSpan> {
    let regex = pattern_for(id)?;
    let found = regex.find(text)?;
    let start = byte_to_char(text, found.start());
    Some(PlaceholderSpan {
        start,
        end: start + found.as_str().chars().count(),
        text: found.as_str().to_string(),
    })
}

/// 完成後の Markdown リンク
pub fn final_link(class: Option<FileClass>, filename: &str, url: &str) -> String {
    match class {
        Some(FileClass::Image) => format!("![{filename}]({url})"),
        Some(FileClass::Video) => format!("![{filename}|video]({url})"),
        Some(FileClass::Audio) => format!("![{filename}|audio]({url})"),
        Some(FileClass::Document) => format!("[{filename}|attachment]({url})"),
        None => format!("[{filename}]({url})"),
    }
}

/// 失敗マーカー `[上传失败({message})-{id}]`
pub fn failure_text(id: UploadId, kind: ErrorKind) -> String {
    failure_text_raw(&id.to_string(), kind.message())
}

/// 分類コード文字列から失敗マーカーを作る（未知のコードは「未知错误」）
pub fn failure_text_for_code(id: UploadId, code: &str) -> String {
    failure_text(id, ErrorKind::from_code(code))
}

fn failure_text_raw(id: &str, message: &str) -> String {
    format!("[上传失败({message})-{id}]")
}
