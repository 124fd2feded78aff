//! mc-state
//!
//! Passive data model for the media state synchronization engine: the
//! immutable `MediaState` snapshot plus the range, track, and volume-level
//! types it is built from. Every field is derived from an attached state
//! owner; `None` means unknown or owner absent.

mod ranges;
mod tracks;

pub use ranges::TimeRanges;
pub use tracks::{Rendition, TextTrackInfo, TrackKind, TrackMode};

use serde::Serialize;

/// Coarse volume bucket derived from `volume` and `muted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeLevel {
    Off,
    Low,
    Medium,
    High,
}

/// Immutable snapshot of everything the attached owners currently report.
///
/// Replaced wholesale on every recomputation, never patched in place.
/// Serialized field names match the wire protocol (`currentTime`,
/// `isFullscreen`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    pub paused: Option<bool>,
    pub ended: Option<bool>,
    pub current_time: Option<f64>,
    /// May be NaN while the owner itself has not learned it yet.
    pub duration: Option<f64>,
    pub seekable: Option<(f64, f64)>,
    pub buffered: TimeRanges,
    pub volume: Option<f64>,
    pub muted: Option<bool>,
    pub volume_level: Option<VolumeLevel>,
    pub playback_rate: Option<f64>,
    pub is_fullscreen: Option<bool>,
    pub is_pip: Option<bool>,
    pub is_casting: Option<bool>,
    pub loading: Option<bool>,
    pub subtitles_list: Vec<TextTrackInfo>,
    pub subtitles_showing: Vec<TextTrackInfo>,
    pub captions_list: Vec<TextTrackInfo>,
    pub captions_showing: Vec<TextTrackInfo>,
    pub rendition_list: Vec<Rendition>,
    /// `None` means automatic rendition selection.
    pub rendition_selected: Option<String>,
}

impl MediaState {
    /// Snapshot with every field unknown (no owners attached).
    pub fn unknown() -> Self {
        Self::default()
    }

    /// All text tracks currently showing, subtitles and captions alike.
    pub fn showing_tracks(&self) -> impl Iterator<Item = &TextTrackInfo> {
        self.subtitles_showing
            .iter()
            .chain(self.captions_showing.iter())
    }
}
