//! アップロードモジュール
//!
//! 登録簿・分類・プレースホルダー・セッションをまとめる

pub mod classify;
pub mod placeholder;
pub mod registry;
pub mod session;
pub mod setup;

// 公開API
pub use classify::{accept_filter_string, classify, validate, FileClass, Validation};
pub use placeholder::{failure_text, final_link, locate, placeholder_for, PlaceholderSpan};
pub use registry::{UploadId, UploadRecord, UploadRegistry};
pub use session::{UploadOutcome, UploadSession, UploadStage};
pub use setup::{SessionSlot, SetupStatus};
pub use crate::error::classify_failure;
