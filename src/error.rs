//! エラーハンドリングシステム
//!
//! アップロード処理全体で使用されるエラー型と、失敗理由の分類テーブルを定義
//! ローカル検証エラーは即座に通知、転送エラーはバッファ内の失敗マーカーに変換する

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum UploadError {
    /// 転送エラー
    #[error("Transfer failed")]
    Transport(#[from] TransportError),

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// ファイル読み込みエラー
    #[error("File operation failed")]
    File(#[from] FileError),
}

/// 転送層のエラー
///
/// 表示文字列は [`classify_failure`] が調べる対象になるため、
/// 分類に必要な語（ステータスコード等）を必ず含める
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upload rejected with HTTP {status}")]
    Status { status: u16 },

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("response format error: missing src field")]
    MissingUrl,

    /// 転送層から文字列のまま渡された失敗
    #[error("{0}")]
    Message(String),
}

impl TransportError {
    /// 表示文字列から分類を求める
    pub fn kind(&self) -> ErrorKind {
        classify_failure(&self.to_string())
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Missing required setting: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// 失敗理由の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Server,
    Permission,
    Format,
    FileType,
    FileSize,
    Unknown,
}

impl ErrorKind {
    /// 分類コード（設定やログで使う文字列）
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Server => "server",
            ErrorKind::Permission => "permission",
            ErrorKind::Format => "format",
            ErrorKind::FileType => "filetype",
            ErrorKind::FileSize => "filesize",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// 分類コードから復元（未知のコードは Unknown）
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "network" => ErrorKind::Network,
            "server" => ErrorKind::Server,
            "permission" => ErrorKind::Permission,
            "format" => ErrorKind::Format,
            "filetype" => ErrorKind::FileType,
            "filesize" => ErrorKind::FileSize,
            _ => ErrorKind::Unknown,
        }
    }

    /// ユーザー向けメッセージ
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Network => "网络错误",
            ErrorKind::Server => "服务器错误",
            ErrorKind::Permission => "权限错误",
            ErrorKind::Format => "格式错误",
            ErrorKind::FileType => "不支持的文件类型",
            ErrorKind::FileSize => "文件过大",
            ErrorKind::Unknown => "未知错误",
        }
    }

    /// ローカル検証で発生する種別か
    pub fn is_local(self) -> bool {
        matches!(self, ErrorKind::FileType | ErrorKind::FileSize)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

const NETWORK_PHRASES: &[&str] = &[
    "network",
    "failed to fetch",
    "connection",
    "timed out",
    "timeout",
    "dns",
    "unreachable",
];

const PERMISSION_PHRASES: &[&str] = &[
    "401",
    "403",
    "unauthorized",
    "forbidden",
    "permission",
    "auth",
];

const SERVER_PHRASES: &[&str] = &[
    "500",
    "502",
    "503",
    "504",
    "server error",
    "internal server",
    "bad gateway",
    "service unavailable",
];

const FORMAT_PHRASES: &[&str] = &["json", "parse", "format", "unexpected token", "invalid response"];

/// 失敗文字列を分類する
///
/// 大文字小文字を区別せず network → permission → server → format の順に調べ、
/// どれにも当たらなければ Unknown
pub fn classify_failure(description: &str) -> ErrorKind {
    let lowered = description.to_lowercase();
    let hit = |phrases: &[&str]| phrases.iter().any(|phrase| lowered.contains(phrase));

    if hit(NETWORK_PHRASES) {
        ErrorKind::Network
    } else if hit(PERMISSION_PHRASES) {
        ErrorKind::Permission
    } else if hit(SERVER_PHRASES) {
        ErrorKind::Server
    } else if hit(FORMAT_PHRASES) {
        ErrorKind::Format
    } else {
        ErrorKind::Unknown
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, UploadError>;

// std::io::Error から UploadError への変換
impl From<std::io::Error> for UploadError {
    fn from(error: std::io::Error) -> Self {
        UploadError::File(FileError::Io {
            message: error.to_string(),
        })
    }
}
