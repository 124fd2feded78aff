//! mc-store
//!
//! Media state synchronization engine: a central store that many
//! independently authored widgets observe through selector subscriptions,
//! kept consistent with up to three swappable imperative state owners (a
//! playback source, a fullscreen container, and a root document).
//!
//! Data flow: widget → `dispatch(action)` → adapter effect → the owner's
//! native state changes → the adapter's listener fires → the store
//! recomputes a fresh snapshot → subscribers whose selected slice changed
//! are notified.

pub mod action;
pub mod adapter;
pub mod anim;
pub mod owner;
pub mod prefs;
pub mod registry;
pub mod select;
pub mod store;
pub mod tokens;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{ActionError, MediaAction, RawAction};
pub use adapter::volume_level;
pub use anim::{AnimationConfig, RangeAnimation};
pub use owner::{
    ChangeListener, DocumentOwner, FullscreenOwner, ListenerId, MediaOwner, OwnerError, OwnerId,
};
pub use prefs::{
    JsonFilePreferences, MemoryPreferences, PreferenceStore, SUBTITLES_LANG_KEY,
};
pub use registry::{ControlTree, NodeId, CONTROLLER_ATTR, DEFAULT_HOTKEYS};
pub use select::{choose_track, plan_toggle, primary_subtag, TrackChange};
pub use store::{MediaStore, Subscription};
pub use tokens::TokenSet;

pub use mc_state::{
    MediaState, Rendition, TextTrackInfo, TimeRanges, TrackKind, TrackMode, VolumeLevel,
};
