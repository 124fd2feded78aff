//! Media tracks
//!
//! Text track and rendition descriptors.

use serde::{Deserialize, Serialize};

/// Text track kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Subtitles,
    Captions,
}

/// Text track mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackMode {
    #[default]
    Disabled,
    Hidden,
    Showing,
}

/// Text track descriptor as reported by a playback owner.
///
/// Tracks also cross the string protocol boundary as show/disable request
/// details, hence the `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTrackInfo {
    pub kind: TrackKind,
    pub language: String,
    pub label: String,
    #[serde(default)]
    pub mode: TrackMode,
}

impl TextTrackInfo {
    pub fn new(kind: TrackKind, language: &str, label: &str) -> Self {
        Self {
            kind,
            language: language.to_string(),
            label: label.to_string(),
            mode: TrackMode::Disabled,
        }
    }

    pub fn showing(&self) -> bool {
        self.mode == TrackMode::Showing
    }

    /// Same logical track regardless of current mode.
    pub fn same_track(&self, other: &TextTrackInfo) -> bool {
        self.kind == other.kind && self.language == other.language && self.label == other.label
    }
}

/// Playback rendition (quality level).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendition {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub bitrate: u64,
}
