//! Playback source adapter

use std::rc::Rc;

use mc_state::{MediaState, TextTrackInfo, TrackKind, TrackMode, VolumeLevel};

use crate::owner::{ChangeListener, ListenerId, MediaOwner, OwnerId};

/// Derive the coarse volume bucket. Owner-independent: the rule is the same
/// for every playback source.
pub fn volume_level(volume: f64, muted: bool) -> VolumeLevel {
    if muted || volume == 0.0 {
        VolumeLevel::Off
    } else if volume < 0.33 {
        VolumeLevel::Low
    } else if volume < 0.66 {
        VolumeLevel::Medium
    } else {
        VolumeLevel::High
    }
}

/// Bound playback source plus its installed listener.
#[derive(Clone)]
pub(crate) struct MediaAdapter {
    owner: Rc<dyn MediaOwner>,
    listener: ListenerId,
}

impl MediaAdapter {
    /// Install the change listener and wrap the owner. The caller must have
    /// torn down any previous binding for this role first.
    pub fn bind(owner: Rc<dyn MediaOwner>, on_change: ChangeListener) -> Self {
        let listener = owner.add_change_listener(on_change);
        Self { owner, listener }
    }

    pub fn unbind(&self) {
        self.owner.remove_change_listener(self.listener);
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner.owner_id()
    }

    // Effects. Fire-and-forget: a rejection is logged, not propagated.

    pub fn play(&self) {
        if let Err(err) = self.owner.play() {
            tracing::warn!("media owner rejected play: {}", err);
        }
    }

    pub fn pause(&self) {
        self.owner.pause();
    }

    pub fn seek(&self, seconds: f64) {
        self.owner.set_current_time(seconds);
    }

    pub fn set_volume(&self, volume: f64) {
        self.owner.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn set_muted(&self, muted: bool) {
        self.owner.set_muted(muted);
    }

    pub fn set_playback_rate(&self, rate: f64) {
        self.owner.set_playback_rate(rate);
    }

    pub fn set_track_mode(&self, track: &TextTrackInfo, mode: TrackMode) {
        self.owner
            .set_track_mode(track.kind, &track.language, &track.label, mode);
    }

    pub fn select_rendition(&self, id: Option<&str>) {
        if let Err(err) = self.owner.select_rendition(id) {
            tracing::warn!("media owner rejected rendition change: {}", err);
        }
    }

    pub fn request_pip(&self) {
        if let Err(err) = self.owner.request_pip() {
            tracing::warn!("media owner rejected picture-in-picture: {}", err);
        }
    }

    /// Subtitle and caption tracks as currently reported by the owner.
    pub fn text_tracks(&self) -> Vec<TextTrackInfo> {
        self.owner.text_tracks()
    }

    /// Read every media-derived field into the snapshot.
    pub fn read_into(&self, state: &mut MediaState) {
        let owner = &self.owner;
        let volume = owner.volume();
        let muted = owner.muted();

        state.paused = Some(owner.paused());
        state.ended = Some(owner.ended());
        state.current_time = Some(owner.current_time());
        state.duration = Some(owner.duration());
        state.seekable = owner.seekable().bounds();
        state.buffered = owner.buffered();
        state.volume = Some(volume);
        state.muted = Some(muted);
        state.volume_level = Some(volume_level(volume, muted));
        state.playback_rate = Some(owner.playback_rate());
        state.loading = Some(owner.loading());
        state.is_casting = Some(owner.is_casting());

        let tracks = owner.text_tracks();
        state.subtitles_list = filter_kind(&tracks, TrackKind::Subtitles);
        state.captions_list = filter_kind(&tracks, TrackKind::Captions);
        state.subtitles_showing = state
            .subtitles_list
            .iter()
            .filter(|t| t.showing())
            .cloned()
            .collect();
        state.captions_showing = state
            .captions_list
            .iter()
            .filter(|t| t.showing())
            .cloned()
            .collect();

        state.rendition_list = owner.renditions();
        state.rendition_selected = owner.selected_rendition();
    }
}

fn filter_kind(tracks: &[TextTrackInfo], kind: TrackKind) -> Vec<TextTrackInfo> {
    tracks.iter().filter(|t| t.kind == kind).cloned().collect()
}
