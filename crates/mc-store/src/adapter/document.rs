//! Root document adapter

use std::rc::Rc;

use crate::owner::{ChangeListener, DocumentOwner, ListenerId, OwnerId};

#[derive(Clone)]
pub(crate) struct DocumentAdapter {
    owner: Rc<dyn DocumentOwner>,
    listener: ListenerId,
}

impl DocumentAdapter {
    pub fn bind(owner: Rc<dyn DocumentOwner>, on_change: ChangeListener) -> Self {
        let listener = owner.add_change_listener(on_change);
        Self { owner, listener }
    }

    pub fn unbind(&self) {
        self.owner.remove_change_listener(self.listener);
    }

    pub fn fullscreen_element(&self) -> Option<OwnerId> {
        self.owner.fullscreen_element()
    }

    pub fn pip_element(&self) -> Option<OwnerId> {
        self.owner.pip_element()
    }

    /// Ordered language preference chain of the environment.
    pub fn languages(&self) -> Vec<String> {
        self.owner.languages()
    }

    pub fn exit_fullscreen(&self) {
        if let Err(err) = self.owner.exit_fullscreen() {
            tracing::warn!("document owner rejected fullscreen exit: {}", err);
        }
    }

    pub fn exit_pip(&self) {
        if let Err(err) = self.owner.exit_pip() {
            tracing::warn!("document owner rejected picture-in-picture exit: {}", err);
        }
    }
}
