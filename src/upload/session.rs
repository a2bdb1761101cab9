//! アップロードセッション
//!
//! エディタ 1 つにつき 1 セッション。ファイルごとに
//! 検証 → プレースホルダー挿入 → 転送 → 置換（または失敗マーカー）→ 後片付け
//! の順で進める。転送の await 中にユーザーや他のアップロードがテキストを
//! 書き換えるため、置換は毎回テキストを読み直して行う

use super::classify::{self, FileClass, Validation};
use super::placeholder::{failure_text, final_link, placeholder_for};
use super::registry::{UploadId, UploadRegistry};
use crate::buffer::TextSurface;
use crate::config::UploaderConfig;
use crate::editor::SpliceEngine;
use crate::error::ErrorKind;
use crate::file::PendingFile;
use crate::transport::Transport;
use futures::future::join_all;
use std::cell::RefCell;
use std::rc::Rc;

/// 1 ファイルの処理段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Validating,
    PlaceholderInserted,
    Transferring,
    Succeeded,
    Failed,
    Cleaned,
}

impl UploadStage {
    pub fn label(self) -> &'static str {
        match self {
            UploadStage::Validating => "validating",
            UploadStage::PlaceholderInserted => "placeholder-inserted",
            UploadStage::Transferring => "transferring",
            UploadStage::Succeeded => "succeeded",
            UploadStage::Failed => "failed",
            UploadStage::Cleaned => "cleaned",
        }
    }
}

/// 1 ファイルの最終結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// ローカル検証で拒否（プレースホルダーは挿入していない）
    Rejected { file: String, kind: ErrorKind },
    /// リンクに置換済み
    Succeeded {
        id: UploadId,
        link: String,
        /// プレースホルダーが消えていて末尾に追記した
        fallback: bool,
    },
    /// 失敗マーカーに置換済み
    Failed {
        id: UploadId,
        kind: ErrorKind,
        marker: String,
        fallback: bool,
    },
}

impl UploadOutcome {
    pub fn id(&self) -> Option<UploadId> {
        match self {
            UploadOutcome::Rejected { .. } => None,
            UploadOutcome::Succeeded { id, .. } | UploadOutcome::Failed { id, .. } => Some(*id),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            UploadOutcome::Rejected { kind, .. } | UploadOutcome::Failed { kind, .. } => Some(*kind),
            UploadOutcome::Succeeded { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded { .. })
    }
}

/// アップロードセッション
pub struct UploadSession<S: TextSurface, T: Transport> {
    surface: Rc<RefCell<S>>,
    transport: T,
    config: UploaderConfig,
    splice: SpliceEngine,
    registry: RefCell<UploadRegistry>,
}

impl<S: TextSurface, T: Transport> UploadSession<S, T> {
    pub fn new(surface: Rc<RefCell<S>>, transport: T, config: UploaderConfig) -> Self {
        let splice = SpliceEngine::new(config.wrap.clone());
        Self {
            surface,
            transport,
            config,
            splice,
            registry: RefCell::new(UploadRegistry::new()),
        }
    }

    /// 対象のテキスト領域
    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.surface
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// 進行中のアップロード数
    pub fn in_flight(&self) -> usize {
        self.registry.borrow().len()
    }

    /// ファイル選択ダイアログ用の accept 値
    pub fn accept_filter(&self) -> String {
        classify::accept_filter_string()
    }

    /// 複数ファイルを並行して処理する（完了順は不定）
    pub async fn upload_all(&self, files: Vec<PendingFile>) -> Vec<UploadOutcome> {
        join_all(files.into_iter().map(|file| self.upload(file))).await
    }

    /// 1 ファイルを処理する。失敗もすべて結果として返す
    pub async fn upload(&self, file: PendingFile) -> UploadOutcome {
        log::debug!("{}: {}", file.name, UploadStage::Validating.label());
        let class = match classify::validate(&file, self.config.max_file_size) {
            Validation::Valid(class) => class,
            Validation::Invalid(kind) => return self.reject(&file, kind),
        };

        let id = self.insert_placeholder(&file, class);

        log::debug!("{id}: {}", UploadStage::Transferring.label());
        let result = self.transport.upload(&file).await;

        let outcome = match result {
            Ok(asset) => {
                let link = final_link(Some(class), &file.name, &asset.url);
                let fallback = !self.replace(id, &link);
                log::debug!("{id}: {}", UploadStage::Succeeded.label());
                UploadOutcome::Succeeded { id, link, fallback }
            }
            Err(error) => {
                let kind = error.kind();
                log::warn!("{id}: upload of {} failed ({kind}): {error}", file.name);
                let marker = failure_text(id, kind);
                let fallback = !self.replace(id, &marker);
                log::debug!("{id}: {}", UploadStage::Failed.label());
                UploadOutcome::Failed {
                    id,
                    kind,
                    marker,
                    fallback,
                }
            }
        };

        self.registry.borrow_mut().remove(id);
        log::debug!("{id}: {}", UploadStage::Cleaned.label());
        outcome
    }

    fn reject(&self, file: &PendingFile, kind: ErrorKind) -> UploadOutcome {
        debug_assert!(kind.is_local(), "{kind} is not a local validation failure");
        log::warn!("{} rejected before upload: {kind}", file.name);

        let notice = match kind {
            ErrorKind::FileSize => format!(
                "{} ({}): {}",
                kind.message(),
                format_size(self.config.max_file_size),
                file.name
            ),
            _ => format!("{}: {}", kind.message(), file.name),
        };
        self.surface.borrow_mut().show_notice(&notice);

        UploadOutcome::Rejected {
            file: file.name.clone(),
            kind,
        }
    }

    /// 現在のカーソル位置にプレースホルダーを挿入し、登録する
    fn insert_placeholder(&self, file: &PendingFile, class: FileClass) -> UploadId {
        let id = self.registry.borrow_mut().generate_id();
        let placeholder = placeholder_for(Some(class), id);

        let position = {
            let mut surface = self.surface.borrow_mut();
            let state = surface.snapshot();
            self.splice.insert(&mut *surface, &state, &placeholder)
        };

        self.registry.borrow_mut().add(id, position, placeholder);
        log::debug!(
            "{id}: {} for {} at {position}",
            UploadStage::PlaceholderInserted.label(),
            file.name
        );
        id
    }

    /// プレースホルダーを置換。見つかったら true
    fn replace(&self, id: UploadId, text: &str) -> bool {
        if let Some(record) = self.registry.borrow().get(id) {
            log::debug!("{id}: replacing placeholder inserted near {}", record.position);
        }

        let mut surface = self.surface.borrow_mut();
        self.splice.replace_by_pattern(&mut *surface, id, text).found
    }
}

/// サイズ上限の表示（1 MiB 未満は KB / バイトで表す）
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{bytes} B")
    }
}
