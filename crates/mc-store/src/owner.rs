//! State owners
//!
//! Capability traits for the three external objects the store can bind:
//! the playback source, the fullscreen-capable container, and the root
//! document. Each is an explicit tagged interface checked at bind time;
//! the store never duck-types an owner.
//!
//! Listener discipline: the store's adapter for a role is the only party
//! allowed to register or remove change listeners on an owner. Exactly one
//! listener is installed per binding and removed before the next binding
//! starts.

use std::rc::Rc;

use mc_state::{Rendition, TextTrackInfo, TimeRanges, TrackKind, TrackMode};
use thiserror::Error;

/// Stable identity of an owner object, used to match the document's
/// reported fullscreen/picture-in-picture element against bound owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// Handle to an installed change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(pub u64);

/// Callback invoked by an owner whenever its native state changes.
pub type ChangeListener = Rc<dyn Fn()>;

/// Failure of an imperative owner operation. Adapters catch and log these;
/// they never reach the dispatch call site.
#[derive(Debug, Error)]
pub enum OwnerError {
    #[error("not allowed: {0}")]
    NotAllowed(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Playback source: readers for every media-derived state field plus the
/// imperative playback effects.
pub trait MediaOwner {
    fn owner_id(&self) -> OwnerId;

    // Readers
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    fn current_time(&self) -> f64;
    /// NaN while unknown.
    fn duration(&self) -> f64;
    fn seekable(&self) -> TimeRanges;
    fn buffered(&self) -> TimeRanges;
    fn volume(&self) -> f64;
    fn muted(&self) -> bool;
    fn playback_rate(&self) -> f64;
    fn loading(&self) -> bool;
    fn is_casting(&self) -> bool {
        false
    }
    fn text_tracks(&self) -> Vec<TextTrackInfo>;
    fn renditions(&self) -> Vec<Rendition> {
        Vec::new()
    }
    fn selected_rendition(&self) -> Option<String> {
        None
    }

    // Effects
    fn play(&self) -> Result<(), OwnerError>;
    fn pause(&self);
    fn set_current_time(&self, seconds: f64);
    fn set_volume(&self, volume: f64);
    fn set_muted(&self, muted: bool);
    fn set_playback_rate(&self, rate: f64);
    fn set_track_mode(&self, kind: TrackKind, language: &str, label: &str, mode: TrackMode);
    fn select_rendition(&self, id: Option<&str>) -> Result<(), OwnerError>;
    fn request_pip(&self) -> Result<(), OwnerError>;

    // Change notification
    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId;
    fn remove_change_listener(&self, id: ListenerId);
}

/// Fullscreen-capable container.
pub trait FullscreenOwner {
    fn owner_id(&self) -> OwnerId;

    fn request_fullscreen(&self) -> Result<(), OwnerError>;

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId;
    fn remove_change_listener(&self, id: ListenerId);
}

/// Root document: reports which element currently holds fullscreen or
/// picture-in-picture, exposes the exit effects, and carries the
/// environment's ordered language preference chain.
pub trait DocumentOwner {
    fn owner_id(&self) -> OwnerId;

    fn fullscreen_element(&self) -> Option<OwnerId>;
    fn pip_element(&self) -> Option<OwnerId>;
    fn languages(&self) -> Vec<String>;

    fn exit_fullscreen(&self) -> Result<(), OwnerError>;
    fn exit_pip(&self) -> Result<(), OwnerError>;

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId;
    fn remove_change_listener(&self, id: ListenerId);
}
