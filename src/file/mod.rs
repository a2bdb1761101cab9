//! アップロード対象ファイル
//!
//! 名前・MIME タイプ・内容をまとめた値と、ディスクからの読み込み

use crate::error::{FileError, Result};
use std::io::ErrorKind;
use std::path::Path;

/// MIME タイプを判定できなかった場合の既定値
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// アップロード待ちのファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub mime: String,
    size: u64,
    data: Vec<u8>,
}

impl PendingFile {
    /// 内容からファイルを作成
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// サイズだけが分かっているファイル（内容は空）
    pub fn with_size(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
            data: Vec::new(),
        }
    }

    /// ファイルを読み込み、内容から MIME タイプを推定する
    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileError::NotFound {
                path: path.display().to_string(),
            },
            _ => FileError::Io {
                message: e.to_string(),
            },
        })?;

        let mime = infer::get(&data)
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| mime_from_extension(path).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Ok(Self::new(name, mime, data))
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// マジックナンバーを持たないテキスト系ファイルの補完
fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}
