//! Actions
//!
//! The closed dispatch vocabulary. Widgets construct a `MediaAction` (or a
//! `RawAction` when they live behind the string protocol) and hand it to
//! `MediaStore::dispatch`; actions are never mutated after construction.

use std::fmt;
use std::rc::Rc;

use mc_state::TextTrackInfo;
use thiserror::Error;

use crate::owner::{DocumentOwner, FullscreenOwner, MediaOwner};

/// A dispatched request.
///
/// Two families: request actions, which route to exactly one adapter
/// effect, and ownership changes, which rebind a role and are visible
/// synchronously.
pub enum MediaAction {
    Play,
    Pause,
    /// Target position in seconds.
    Seek(f64),
    /// Requested volume in `0.0..=1.0`.
    Volume(f64),
    Mute,
    Unmute,
    PlaybackRate(f64),
    EnterFullscreen,
    ExitFullscreen,
    EnterPip,
    ExitPip,
    /// Empty list means "auto-select by language preference".
    ShowSubtitles(Vec<TextTrackInfo>),
    /// Empty list means "everything currently showing".
    DisableSubtitles(Vec<TextTrackInfo>),
    /// `None` selects automatic rendition switching.
    SelectRendition(Option<String>),
    MediaElementChange(Option<Rc<dyn MediaOwner>>),
    FullscreenElementChange(Option<Rc<dyn FullscreenOwner>>),
    DocumentElementChange(Option<Rc<dyn DocumentOwner>>),
}

impl MediaAction {
    /// Stable protocol name for this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "mediaplayrequest",
            Self::Pause => "mediapauserequest",
            Self::Seek(_) => "mediaseekrequest",
            Self::Volume(_) => "mediavolumerequest",
            Self::Mute => "mediamuterequest",
            Self::Unmute => "mediaunmuterequest",
            Self::PlaybackRate(_) => "mediaplaybackraterequest",
            Self::EnterFullscreen => "mediaenterfullscreenrequest",
            Self::ExitFullscreen => "mediaexitfullscreenrequest",
            Self::EnterPip => "mediaenterpiprequest",
            Self::ExitPip => "mediaexitpiprequest",
            Self::ShowSubtitles(_) => "mediashowsubtitlesrequest",
            Self::DisableSubtitles(_) => "mediadisablesubtitlesrequest",
            Self::SelectRendition(_) => "mediarenditionrequest",
            Self::MediaElementChange(_) => "mediaelementchangerequest",
            Self::FullscreenElementChange(_) => "fullscreenelementchangerequest",
            Self::DocumentElementChange(_) => "documentelementchangerequest",
        }
    }

    /// True for the three role-rebinding actions.
    pub fn is_ownership_change(&self) -> bool {
        matches!(
            self,
            Self::MediaElementChange(_)
                | Self::FullscreenElementChange(_)
                | Self::DocumentElementChange(_)
        )
    }
}

impl fmt::Debug for MediaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Owner handles are opaque; the protocol name identifies the action.
        write!(f, "MediaAction({})", self.name())
    }
}

/// Failure at the string protocol boundary. `dispatch_raw` logs these and
/// drops the action; nothing ever propagates to UI input handlers.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action type: {0}")]
    UnknownType(String),

    #[error("bad detail for {kind}: {reason}")]
    BadDetail { kind: String, reason: String },

    #[error("{0} carries an owner object and cannot cross the string boundary")]
    OwnershipNotSerializable(String),
}

/// Untyped `{ type, detail }` action as sent by out-of-process widgets.
#[derive(Debug, Clone)]
pub struct RawAction {
    pub kind: String,
    pub detail: serde_json::Value,
}

impl RawAction {
    pub fn new(kind: &str, detail: serde_json::Value) -> Self {
        Self {
            kind: kind.to_string(),
            detail,
        }
    }
}

impl MediaAction {
    /// Parse a raw protocol action. Ownership changes are rejected here:
    /// owner objects only exist in-process.
    pub fn from_raw(raw: &RawAction) -> Result<Self, ActionError> {
        let bad = |reason: &str| ActionError::BadDetail {
            kind: raw.kind.clone(),
            reason: reason.to_string(),
        };

        match raw.kind.as_str() {
            "mediaplayrequest" => Ok(Self::Play),
            "mediapauserequest" => Ok(Self::Pause),
            "mediamuterequest" => Ok(Self::Mute),
            "mediaunmuterequest" => Ok(Self::Unmute),
            "mediaenterfullscreenrequest" => Ok(Self::EnterFullscreen),
            "mediaexitfullscreenrequest" => Ok(Self::ExitFullscreen),
            "mediaenterpiprequest" => Ok(Self::EnterPip),
            "mediaexitpiprequest" => Ok(Self::ExitPip),
            "mediaseekrequest" => raw
                .detail
                .as_f64()
                .map(Self::Seek)
                .ok_or_else(|| bad("expected seconds as a number")),
            "mediavolumerequest" => raw
                .detail
                .as_f64()
                .map(Self::Volume)
                .ok_or_else(|| bad("expected a number in 0..1")),
            "mediaplaybackraterequest" => raw
                .detail
                .as_f64()
                .map(Self::PlaybackRate)
                .ok_or_else(|| bad("expected a rate as a number")),
            "mediashowsubtitlesrequest" => parse_tracks(&raw.detail)
                .map(Self::ShowSubtitles)
                .map_err(|reason| bad(&reason)),
            "mediadisablesubtitlesrequest" => parse_tracks(&raw.detail)
                .map(Self::DisableSubtitles)
                .map_err(|reason| bad(&reason)),
            "mediarenditionrequest" => match &raw.detail {
                serde_json::Value::Null => Ok(Self::SelectRendition(None)),
                serde_json::Value::String(id) => Ok(Self::SelectRendition(Some(id.clone()))),
                _ => Err(bad("expected a rendition id string or null")),
            },
            "mediaelementchangerequest"
            | "fullscreenelementchangerequest"
            | "documentelementchangerequest" => {
                Err(ActionError::OwnershipNotSerializable(raw.kind.clone()))
            }
            _ => Err(ActionError::UnknownType(raw.kind.clone())),
        }
    }
}

/// Detail may be absent, a single track, or a track list.
fn parse_tracks(detail: &serde_json::Value) -> Result<Vec<TextTrackInfo>, String> {
    match detail {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(_) => {
            serde_json::from_value(detail.clone()).map_err(|e| e.to_string())
        }
        serde_json::Value::Object(_) => serde_json::from_value::<TextTrackInfo>(detail.clone())
            .map(|track| vec![track])
            .map_err(|e| e.to_string()),
        _ => Err("expected a track, a track list, or null".to_string()),
    }
}
