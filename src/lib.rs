//! pasteup - Markdown 投稿欄向けアップロードエンジン
//!
//! 貼り付け・ドロップされたファイルをアセットホストへ送り、
//! 投稿欄のプレースホルダーを Markdown リンクに置き換える

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// 編集層
pub mod editor;

// ロジック層
pub mod transport;
pub mod upload;

// 公開API
pub use buffer::{EditorState, TextArea, TextSurface};
pub use config::UploaderConfig;
pub use error::{ErrorKind, Result, TransportError, UploadError};
pub use file::PendingFile;
pub use transport::{HttpTransport, Transport, UploadedAsset};
pub use upload::{UploadOutcome, UploadSession};
