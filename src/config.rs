//! 設定
//!
//! アップロード先・サイズ上限・挿入時の前後空白など、定数として扱う設定値をまとめる

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定のファイルサイズ上限（20 MiB）
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;
pub const DEFAULT_ENDPOINT: &str = "https://h1.appinn.me/upload";
pub const DEFAULT_ASSET_URL_PREFIX: &str = "https://h1.appinn.me";

/// アップロード先チャネル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UploadChannel {
    #[default]
    #[serde(rename = "telegram")]
    Primary,
    #[serde(rename = "cfr2")]
    SecondaryA,
    #[serde(rename = "s3")]
    SecondaryB,
}

impl UploadChannel {
    pub fn as_param(self) -> &'static str {
        match self {
            UploadChannel::Primary => "telegram",
            UploadChannel::SecondaryA => "cfr2",
            UploadChannel::SecondaryB => "s3",
        }
    }
}

/// サーバー側のファイル命名方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingScheme {
    /// タイムスタンプ + 元のファイル名
    #[default]
    #[serde(rename = "default")]
    TimestampedOriginal,
    #[serde(rename = "index")]
    TimestampOnly,
    #[serde(rename = "origin")]
    OriginalName,
    #[serde(rename = "short")]
    RandomShort,
}

impl NamingScheme {
    pub fn as_param(self) -> &'static str {
        match self {
            NamingScheme::TimestampedOriginal => "default",
            NamingScheme::TimestampOnly => "index",
            NamingScheme::OriginalName => "origin",
            NamingScheme::RandomShort => "short",
        }
    }
}

/// クエリパラメータとして付与するアップロード設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadParams {
    pub auth_code: String,
    pub server_compress: bool,
    pub upload_channel: UploadChannel,
    pub upload_name_type: NamingScheme,
    pub auto_retry: bool,
}

impl Default for UploadParams {
    fn default() -> Self {
        Self {
            auth_code: String::new(),
            server_compress: true,
            upload_channel: UploadChannel::default(),
            upload_name_type: NamingScheme::default(),
            auto_retry: true,
        }
    }
}

impl UploadParams {
    /// クエリ文字列のペア（認証コードは空なら省略）
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        if !self.auth_code.is_empty() {
            pairs.push(("authCode", self.auth_code.clone()));
        }
        pairs.push(("serverCompress", self.server_compress.to_string()));
        pairs.push(("uploadChannel", self.upload_channel.as_param().to_string()));
        pairs.push(("uploadNameType", self.upload_name_type.as_param().to_string()));
        pairs.push(("autoRetry", self.auto_retry.to_string()));
        pairs
    }
}

/// 挿入・追記するテキストの前後に付ける空白
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentWrap {
    pub leading: String,
    pub trailing: String,
}

impl Default for ContentWrap {
    fn default() -> Self {
        Self {
            leading: "\n".to_string(),
            trailing: "\n\n".to_string(),
        }
    }
}

impl ContentWrap {
    /// 空白なし
    pub fn none() -> Self {
        Self {
            leading: String::new(),
            trailing: String::new(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        format!("{}{}{}", self.leading, text, self.trailing)
    }
}

/// アップローダー設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploaderConfig {
    /// ファイルサイズ上限（バイト）
    pub max_file_size: u64,
    /// アップロード先URL
    pub endpoint: String,
    /// レスポンスの相対パスに付与するURL
    pub asset_url_prefix: String,
    pub params: UploadParams,
    pub wrap: ContentWrap,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            asset_url_prefix: DEFAULT_ASSET_URL_PREFIX.to_string(),
            params: UploadParams::default(),
            wrap: ContentWrap::default(),
        }
    }
}

impl UploaderConfig {
    /// JSON 文字列から読み込み（省略されたキーは既定値）
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source).map_err(|e| ConfigError::InvalidFile {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&source).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 明示パス、既定パスの順に探し、どちらも無ければ既定値
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 値の整合性チェック
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "maxFileSize".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "endpoint".to_string(),
            }
            .into());
        }

        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "endpoint".to_string(),
                value: self.endpoint.clone(),
            }
            .into());
        }

        Ok(())
    }
}

/// `~/.config/pasteup/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pasteup").join("config.json"))
}
