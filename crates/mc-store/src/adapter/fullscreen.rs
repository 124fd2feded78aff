//! Fullscreen container adapter

use std::rc::Rc;

use crate::owner::{ChangeListener, FullscreenOwner, ListenerId, OwnerId};

#[derive(Clone)]
pub(crate) struct FullscreenAdapter {
    owner: Rc<dyn FullscreenOwner>,
    listener: ListenerId,
}

impl FullscreenAdapter {
    pub fn bind(owner: Rc<dyn FullscreenOwner>, on_change: ChangeListener) -> Self {
        let listener = owner.add_change_listener(on_change);
        Self { owner, listener }
    }

    pub fn unbind(&self) {
        self.owner.remove_change_listener(self.listener);
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner.owner_id()
    }

    /// Enter fullscreen. Asynchronous at the owner; a late rejection is
    /// logged and otherwise ignored.
    pub fn request_fullscreen(&self) {
        if let Err(err) = self.owner.request_fullscreen() {
            tracing::warn!("fullscreen owner rejected enter: {}", err);
        }
    }
}
