//! HTTP 転送
//!
//! multipart で POST し、`[{"src": "/file/..."}]` 形式の応答から公開URLを組み立てる

use super::{Transport, UploadedAsset};
use crate::config::UploaderConfig;
use crate::error::TransportError;
use crate::file::PendingFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UploadResponseItem {
    src: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    List(Vec<UploadResponseItem>),
    Single(UploadResponseItem),
}

/// 応答本文から相対パスを取り出す
pub fn parse_response(body: &str) -> Result<String, TransportError> {
    let response: UploadResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Parse(e.to_string()))?;

    let src = match response {
        UploadResponse::List(items) => items.into_iter().next().and_then(|item| item.src),
        UploadResponse::Single(item) => item.src,
    };

    src.filter(|src| !src.is_empty())
        .ok_or(TransportError::MissingUrl)
}

/// 接頭辞と相対パスを `/` 一つで連結する（絶対URLはそのまま）
pub fn join_asset_url(prefix: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP 転送
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: UploaderConfig,
}

impl HttpTransport {
    pub fn new(config: UploaderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: UploaderConfig) -> Self {
        Self { client, config }
    }

    fn form_for(file: &PendingFile) -> Result<Form, TransportError> {
        let part = Part::bytes(file.data().to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| TransportError::Message(format!("invalid mime type {}: {e}", file.mime)))?;
        Ok(Form::new().part("file", part))
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn upload(&self, file: &PendingFile) -> Result<UploadedAsset, TransportError> {
        let form = Self::form_for(file)?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&self.config.params.query_pairs())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("upload of {} returned {}", file.name, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let path = parse_response(&body)?;

        Ok(UploadedAsset {
            url: join_asset_url(&self.config.asset_url_prefix, &path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_response() {
        let path = parse_response(r#"[{"src": "/f/abc.png"}]"#).unwrap();
        assert_eq!(path, "/f/abc.png");
    }

    #[test]
    fn test_parse_single_object() {
        assert_eq!(parse_response(r#"{"src": "/f/x.mp4"}"#).unwrap(), "/f/x.mp4");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_response("[]"), Err(TransportError::MissingUrl));
        assert_eq!(parse_response(r#"[{"error": "nope"}]"#), Err(TransportError::MissingUrl));
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(TransportError::Parse(_))
        ));
    }

    #[test]
    fn test_join_asset_url() {
        assert_eq!(
            join_asset_url("https://h1.appinn.me", "/f/abc.png"),
            "https://h1.appinn.me/f/abc.png"
        );
        assert_eq!(
            join_asset_url("https://h1.appinn.me/", "f/abc.png"),
            "https://h1.appinn.me/f/abc.png"
        );
        assert_eq!(
            join_asset_url("https://h1.appinn.me", "https://cdn.example/x"),
            "https://cdn.example/x"
        );
    }

    #[test]
    fn test_form_rejects_bad_mime() {
        let file = PendingFile::new("x", "not a mime", vec![1, 2, 3]);
        assert!(HttpTransport::form_for(&file).is_err());
    }
}
