//! Scripted fake owners for tests.
//!
//! Effects only record themselves; tests mutate the fake's reported state
//! and emit a change explicitly, mirroring how a real owner's asynchronous
//! operations land after the dispatch call has returned.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mc_state::{Rendition, TextTrackInfo, TimeRanges, TrackKind, TrackMode};

use crate::owner::{
    ChangeListener, DocumentOwner, FullscreenOwner, ListenerId, MediaOwner, OwnerError, OwnerId,
};

#[derive(Default)]
struct Listeners {
    entries: RefCell<Vec<(u64, ChangeListener)>>,
    next: Cell<u64>,
}

impl Listeners {
    fn add(&self, listener: ChangeListener) -> ListenerId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        ListenerId(id)
    }

    fn remove(&self, id: ListenerId) {
        self.entries.borrow_mut().retain(|(i, _)| *i != id.0);
    }

    fn emit(&self) {
        let snapshot: Vec<ChangeListener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    fn count(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Reported state of a fake playback source.
pub struct FakeMediaFields {
    pub paused: bool,
    pub ended: bool,
    pub current_time: f64,
    pub duration: f64,
    pub seekable: TimeRanges,
    pub buffered: TimeRanges,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub loading: bool,
    pub casting: bool,
    pub tracks: Vec<TextTrackInfo>,
    pub renditions: Vec<Rendition>,
    pub rendition_selected: Option<String>,
}

impl Default for FakeMediaFields {
    fn default() -> Self {
        Self {
            paused: true,
            ended: false,
            current_time: 0.0,
            duration: f64::NAN,
            seekable: TimeRanges::new(),
            buffered: TimeRanges::new(),
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            loading: false,
            casting: false,
            tracks: Vec::new(),
            renditions: Vec::new(),
            rendition_selected: None,
        }
    }
}

pub struct FakeMedia {
    id: OwnerId,
    fields: RefCell<FakeMediaFields>,
    effects: RefCell<Vec<String>>,
    listeners: Listeners,
    play_fails: Cell<bool>,
}

impl FakeMedia {
    pub fn new(id: u64) -> Rc<Self> {
        Rc::new(Self {
            id: OwnerId(id),
            fields: RefCell::new(FakeMediaFields::default()),
            effects: RefCell::new(Vec::new()),
            listeners: Listeners::default(),
            play_fails: Cell::new(false),
        })
    }

    pub fn id(&self) -> OwnerId {
        self.id
    }

    pub fn track(kind: TrackKind, language: &str, label: &str, mode: TrackMode) -> TextTrackInfo {
        let mut track = TextTrackInfo::new(kind, language, label);
        track.mode = mode;
        track
    }

    pub fn fail_play(&self) {
        self.play_fails.set(true);
    }

    /// Mutate the reported state and emit a change notification.
    pub fn update(&self, f: impl FnOnce(&mut FakeMediaFields)) {
        f(&mut self.fields.borrow_mut());
        self.emit();
    }

    /// Mutate without notifying, for pre-attachment setup.
    pub fn update_silently(&self, f: impl FnOnce(&mut FakeMediaFields)) {
        f(&mut self.fields.borrow_mut());
    }

    pub fn emit(&self) {
        self.listeners.emit();
    }

    pub fn effects(&self) -> Vec<String> {
        self.effects.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    fn record(&self, effect: String) {
        self.effects.borrow_mut().push(effect);
    }
}

impl MediaOwner for FakeMedia {
    fn owner_id(&self) -> OwnerId {
        self.id
    }

    fn paused(&self) -> bool {
        self.fields.borrow().paused
    }

    fn ended(&self) -> bool {
        self.fields.borrow().ended
    }

    fn current_time(&self) -> f64 {
        self.fields.borrow().current_time
    }

    fn duration(&self) -> f64 {
        self.fields.borrow().duration
    }

    fn seekable(&self) -> TimeRanges {
        self.fields.borrow().seekable.clone()
    }

    fn buffered(&self) -> TimeRanges {
        self.fields.borrow().buffered.clone()
    }

    fn volume(&self) -> f64 {
        self.fields.borrow().volume
    }

    fn muted(&self) -> bool {
        self.fields.borrow().muted
    }

    fn playback_rate(&self) -> f64 {
        self.fields.borrow().playback_rate
    }

    fn loading(&self) -> bool {
        self.fields.borrow().loading
    }

    fn is_casting(&self) -> bool {
        self.fields.borrow().casting
    }

    fn text_tracks(&self) -> Vec<TextTrackInfo> {
        self.fields.borrow().tracks.clone()
    }

    fn renditions(&self) -> Vec<Rendition> {
        self.fields.borrow().renditions.clone()
    }

    fn selected_rendition(&self) -> Option<String> {
        self.fields.borrow().rendition_selected.clone()
    }

    fn play(&self) -> Result<(), OwnerError> {
        self.record("play".to_string());
        if self.play_fails.get() {
            Err(OwnerError::NotAllowed("autoplay blocked".to_string()))
        } else {
            Ok(())
        }
    }

    fn pause(&self) {
        self.record("pause".to_string());
    }

    fn set_current_time(&self, seconds: f64) {
        self.record(format!("set_current_time {}", seconds));
    }

    fn set_volume(&self, volume: f64) {
        self.record(format!("set_volume {}", volume));
    }

    fn set_muted(&self, muted: bool) {
        self.record(format!("set_muted {}", muted));
    }

    fn set_playback_rate(&self, rate: f64) {
        self.record(format!("set_playback_rate {}", rate));
    }

    fn set_track_mode(&self, kind: TrackKind, language: &str, _label: &str, mode: TrackMode) {
        let kind = match kind {
            TrackKind::Subtitles => "subtitles",
            TrackKind::Captions => "captions",
        };
        let mode = match mode {
            TrackMode::Disabled => "disabled",
            TrackMode::Hidden => "hidden",
            TrackMode::Showing => "showing",
        };
        self.record(format!("set_track_mode {} {} {}", kind, language, mode));
    }

    fn select_rendition(&self, id: Option<&str>) -> Result<(), OwnerError> {
        self.record(format!("select_rendition {}", id.unwrap_or("auto")));
        Ok(())
    }

    fn request_pip(&self) -> Result<(), OwnerError> {
        self.record("request_pip".to_string());
        Ok(())
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

pub struct FakeFullscreen {
    id: OwnerId,
    effects: RefCell<Vec<String>>,
    listeners: Listeners,
}

impl FakeFullscreen {
    pub fn new(id: u64) -> Rc<Self> {
        Rc::new(Self {
            id: OwnerId(id),
            effects: RefCell::new(Vec::new()),
            listeners: Listeners::default(),
        })
    }

    pub fn id(&self) -> OwnerId {
        self.id
    }

    pub fn effects(&self) -> Vec<String> {
        self.effects.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }
}

impl FullscreenOwner for FakeFullscreen {
    fn owner_id(&self) -> OwnerId {
        self.id
    }

    fn request_fullscreen(&self) -> Result<(), OwnerError> {
        self.effects.borrow_mut().push("request_fullscreen".to_string());
        Ok(())
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

pub struct FakeDocument {
    id: OwnerId,
    fullscreen_element: Cell<Option<OwnerId>>,
    pip_element: Cell<Option<OwnerId>>,
    languages: RefCell<Vec<String>>,
    effects: RefCell<Vec<String>>,
    listeners: Listeners,
}

impl FakeDocument {
    pub fn new(id: u64) -> Rc<Self> {
        Rc::new(Self {
            id: OwnerId(id),
            fullscreen_element: Cell::new(None),
            pip_element: Cell::new(None),
            languages: RefCell::new(Vec::new()),
            effects: RefCell::new(Vec::new()),
            listeners: Listeners::default(),
        })
    }

    pub fn set_languages(&self, languages: &[&str]) {
        *self.languages.borrow_mut() = languages.iter().map(|l| l.to_string()).collect();
    }

    pub fn set_fullscreen_element(&self, element: Option<OwnerId>) {
        self.fullscreen_element.set(element);
        self.listeners.emit();
    }

    pub fn set_pip_element(&self, element: Option<OwnerId>) {
        self.pip_element.set(element);
        self.listeners.emit();
    }

    pub fn effects(&self) -> Vec<String> {
        self.effects.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }
}

impl DocumentOwner for FakeDocument {
    fn owner_id(&self) -> OwnerId {
        self.id
    }

    fn fullscreen_element(&self) -> Option<OwnerId> {
        self.fullscreen_element.get()
    }

    fn pip_element(&self) -> Option<OwnerId> {
        self.pip_element.get()
    }

    fn languages(&self) -> Vec<String> {
        self.languages.borrow().clone()
    }

    fn exit_fullscreen(&self) -> Result<(), OwnerError> {
        self.effects.borrow_mut().push("exit_fullscreen".to_string());
        Ok(())
    }

    fn exit_pip(&self) -> Result<(), OwnerError> {
        self.effects.borrow_mut().push("exit_pip".to_string());
        Ok(())
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}
