//! ファイル分類と検証
//!
//! MIME タイプから描画ルールを決め、サイズ・種別の制約をローカルで検査する

use crate::error::ErrorKind;
use crate::file::PendingFile;

/// ファイル分類
///
/// `ALL` の順序が判定の優先順位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClass {
    Image,
    Video,
    Audio,
    Document,
}

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/zip",
    "application/x-zip-compressed",
    "application/x-7z-compressed",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/msword",
    "text/plain",
    "text/markdown",
    "text/csv",
];

const DOCUMENT_TYPE_PREFIXES: &[&str] = &[
    "application/vnd.ms-",
    "application/vnd.openxmlformats-officedocument.",
];

impl FileClass {
    /// 宣言順（= 判定順）
    pub const ALL: [FileClass; 4] = [
        FileClass::Image,
        FileClass::Video,
        FileClass::Audio,
        FileClass::Document,
    ];

    /// MIME タイプがこの分類に属するか
    pub fn matches(self, mime: &str) -> bool {
        match self {
            FileClass::Image => mime.starts_with("image/"),
            FileClass::Video => mime.starts_with("video/"),
            FileClass::Audio => mime.starts_with("audio/"),
            FileClass::Document => {
                DOCUMENT_TYPES.contains(&mime)
                    || DOCUMENT_TYPE_PREFIXES
                        .iter()
                        .any(|prefix| mime.starts_with(prefix))
            }
        }
    }

    /// ファイル選択ダイアログの accept 値
    pub fn accept_filter(self) -> &'static str {
        match self {
            FileClass::Image => "image/*",
            FileClass::Video => "video/*",
            FileClass::Audio => "audio/*",
            FileClass::Document => ".pdf,.zip,.7z,.rar,.doc,.docx,.xls,.xlsx,.ppt,.pptx,.txt,.md,.csv",
        }
    }

    /// プレースホルダー・リンクの先頭に `!` を付けるか
    pub fn is_embedded(self) -> bool {
        matches!(self, FileClass::Image | FileClass::Video | FileClass::Audio)
    }

    /// `|video` などの種別サフィックス
    pub fn suffix(self) -> &'static str {
        match self {
            FileClass::Image => "",
            FileClass::Video => "|video",
            FileClass::Audio => "|audio",
            FileClass::Document => "|attachment",
        }
    }
}

/// `type/subtype` 部分を小文字で取り出す
fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// MIME タイプを分類する。未対応なら None
pub fn classify(mime: &str) -> Option<FileClass> {
    let mime = essence(mime);
    FileClass::ALL
        .into_iter()
        .find(|class| class.matches(&mime))
}

/// 検証結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid(FileClass),
    Invalid(ErrorKind),
}

impl Validation {
    pub fn is_valid(self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn error_kind(self) -> Option<ErrorKind> {
        match self {
            Validation::Valid(_) => None,
            Validation::Invalid(kind) => Some(kind),
        }
    }
}

/// ファイルを検証する（ネットワークには触れない）
pub fn validate(file: &PendingFile, max_file_size: u64) -> Validation {
    let Some(class) = classify(&file.mime) else {
        return Validation::Invalid(ErrorKind::FileType);
    };

    if file.size() > max_file_size {
        return Validation::Invalid(ErrorKind::FileSize);
    }

    Validation::Valid(class)
}

/// 全分類の accept 値を連結
pub fn accept_filter_string() -> String {
    FileClass::ALL
        .iter()
        .map(|class| class.accept_filter())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_prefix() {
        assert_eq!(classify("image/png"), Some(FileClass::Image));
        assert_eq!(classify("video/mp4"), Some(FileClass::Video));
        assert_eq!(classify("audio/mpeg"), Some(FileClass::Audio));
        assert_eq!(classify("application/pdf"), Some(FileClass::Document));
        assert_eq!(
            classify("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            Some(FileClass::Document)
        );
        assert_eq!(classify("application/x-msdownload"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_classify_ignores_case_and_parameters() {
        assert_eq!(classify("IMAGE/JPEG"), Some(FileClass::Image));
        assert_eq!(classify("text/plain; charset=utf-8"), Some(FileClass::Document));
    }

    #[test]
    fn test_validate_type_then_size() {
        let limit = 20 * 1024 * 1024;
        let ok = PendingFile::with_size("cat.png", "image/png", 5 * 1024 * 1024);
        assert_eq!(validate(&ok, limit), Validation::Valid(FileClass::Image));

        let huge = PendingFile::with_size("movie.mp4", "video/mp4", 25 * 1024 * 1024);
        assert_eq!(validate(&huge, limit).error_kind(), Some(ErrorKind::FileSize));

        // 種別エラーはサイズより先に判定
        let exe = PendingFile::with_size("setup.exe", "application/x-msdownload", 25 * 1024 * 1024);
        assert_eq!(validate(&exe, limit).error_kind(), Some(ErrorKind::FileType));

        let exact = PendingFile::with_size("a.png", "image/png", limit);
        assert!(validate(&exact, limit).is_valid());
    }

    #[test]
    fn test_accept_filter_string() {
        let accept = accept_filter_string();
        assert!(accept.starts_with("image/*,video/*,audio/*,.pdf"));
        assert!(accept.ends_with(".csv"));
    }
}
