//! 転送層
//!
//! ファイルを外部のアセットホストへ送り、公開URLを受け取る

pub mod http;

use crate::error::TransportError;
use crate::file::PendingFile;
use async_trait::async_trait;

pub use http::HttpTransport;

/// アップロード完了時の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// 公開URL
    pub url: String,
}

/// 転送の窓口
///
/// UI スレッド上で協調的に実行するため `Send` は要求しない。
/// タイムアウトやリトライは実装側の責務
#[async_trait(?Send)]
pub trait Transport {
    async fn upload(&self, file: &PendingFile) -> Result<UploadedAsset, TransportError>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    async fn upload(&self, file: &PendingFile) -> Result<UploadedAsset, TransportError> {
        (**self).upload(file).await
    }
}
