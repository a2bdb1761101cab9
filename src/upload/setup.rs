//! セッションの取り付け
//!
//! エディタの出現・消滅を監視する外部コードから何度でも呼ばれる。
//! 同じエディタなら何もしない

use super::session::UploadSession;
use crate::buffer::TextSurface;
use crate::config::UploaderConfig;
use crate::transport::Transport;
use std::cell::RefCell;
use std::rc::Rc;

/// `attempt_setup` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStatus {
    /// 新しいエディタにセッションを取り付けた
    Attached,
    /// 取り付け済みのエディタ
    AlreadyAttached,
    /// 別のエディタに付け替えた
    Replaced,
    /// エディタが消えたのでセッションを外した
    Detached,
    /// エディタが無く、セッションも無い
    Idle,
}

/// 1 つのエディタ枠に対するセッション保持者
pub struct SessionSlot<S: TextSurface, T: Transport + Clone> {
    transport: T,
    config: UploaderConfig,
    session: Option<Rc<UploadSession<S, T>>>,
}

impl<S: TextSurface, T: Transport + Clone> SessionSlot<S, T> {
    pub fn new(transport: T, config: UploaderConfig) -> Self {
        Self {
            transport,
            config,
            session: None,
        }
    }

    /// 現在のセッション
    pub fn session(&self) -> Option<Rc<UploadSession<S, T>>> {
        self.session.clone()
    }

    /// 見つかったエディタに合わせてセッションを用意する
    pub fn attempt_setup(&mut self, editor: Option<Rc<RefCell<S>>>) -> SetupStatus {
        let attached = self
            .session
            .as_ref()
            .map(|session| Rc::clone(session.surface()));

        match (editor, attached) {
            (None, None) => SetupStatus::Idle,
            (None, Some(_)) => {
                log::debug!("editor disappeared, detaching upload session");
                self.session = None;
                SetupStatus::Detached
            }
            (Some(editor), Some(current)) if Rc::ptr_eq(&editor, &current) => {
                SetupStatus::AlreadyAttached
            }
            (Some(editor), current) => {
                let status = if current.is_some() {
                    SetupStatus::Replaced
                } else {
                    SetupStatus::Attached
                };
                log::debug!("attaching upload session ({status:?})");
                self.session = Some(Rc::new(UploadSession::new(
                    editor,
                    self.transport.clone(),
                    self.config.clone(),
                )));
                status
            }
        }
    }
}
