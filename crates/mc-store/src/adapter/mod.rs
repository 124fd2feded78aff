//! State-owner adapters
//!
//! One adapter per role. Each installs exactly one change listener on bind
//! and removes it on unbind, exposes the role's imperative effects (failures
//! are caught and logged, never returned to the dispatcher), and reads the
//! owner's current values into a fresh snapshot during recomputation.

mod document;
mod fullscreen;
mod media;

pub(crate) use document::DocumentAdapter;
pub(crate) use fullscreen::FullscreenAdapter;
pub(crate) use media::MediaAdapter;

pub use media::volume_level;
