//! Store core
//!
//! Holds the derived `MediaState` snapshot, processes dispatched actions by
//! invoking adapter effects, recomputes state from owner change events, and
//! notifies selector-based subscribers.
//!
//! Single-threaded by design: `dispatch` never suspends, effects are
//! fire-and-forget, and real state change is learned through the owners'
//! own change notifications — except ownership changes, which rebind and
//! recompute synchronously so the new owner's fields are visible before
//! `dispatch` returns.

use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};

use mc_state::{MediaState, TextTrackInfo};

use crate::action::{MediaAction, RawAction};
use crate::adapter::{DocumentAdapter, FullscreenAdapter, MediaAdapter};
use crate::owner::{ChangeListener, DocumentOwner, FullscreenOwner, MediaOwner};
use crate::prefs::{MemoryPreferences, PreferenceStore, SUBTITLES_LANG_KEY};
use crate::select;

struct Subscriber {
    id: u64,
    /// Selects, compares against the last delivered value, and invokes the
    /// callback when different. Owns the selector, equality, callback, and
    /// last value.
    notify: Box<dyn FnMut(&MediaState)>,
}

struct Inner {
    state: Rc<MediaState>,
    media: Option<MediaAdapter>,
    fullscreen: Option<FullscreenAdapter>,
    document: Option<DocumentAdapter>,
    prefs: Rc<dyn PreferenceStore>,
    subscribers: Vec<Subscriber>,
    next_subscriber: u64,
    /// Unsubscriptions landed while a notification pass had the subscriber
    /// list checked out.
    removals: Rc<RefCell<Vec<u64>>>,
    notifying: bool,
    pending_pass: bool,
}

impl Inner {
    /// Fresh snapshot from every attached owner's current values.
    fn compute_state(&self) -> MediaState {
        let mut state = MediaState::unknown();

        if let Some(media) = &self.media {
            media.read_into(&mut state);
        }

        // Fullscreen/PiP are judged by the document; without one, unknown.
        if let Some(document) = &self.document {
            let fullscreen_id = self.fullscreen.as_ref().map(|a| a.owner_id());
            let media_id = self.media.as_ref().map(|a| a.owner_id());
            state.is_fullscreen = Some(matches!(
                (document.fullscreen_element(), fullscreen_id),
                (Some(element), Some(bound)) if element == bound
            ));
            state.is_pip = Some(matches!(
                (document.pip_element(), media_id),
                (Some(element), Some(bound)) if element == bound
            ));
        }

        state
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Owners may outlive the store; leave no listener registered on them.
        if let Some(media) = self.media.take() {
            media.unbind();
        }
        if let Some(fullscreen) = self.fullscreen.take() {
            fullscreen.unbind();
        }
        if let Some(document) = self.document.take() {
            document.unbind();
        }
    }
}

/// Handle to a subscription; dropping it (or calling `unsubscribe`)
/// removes the subscriber.
pub struct Subscription {
    inner: Weak<RefCell<Inner>>,
    removals: Weak<RefCell<Vec<u64>>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The entry may be checked out by a running notification pass, so
        // the id is always queued; the pass filters it on merge.
        if let Some(removals) = self.removals.upgrade() {
            removals.borrow_mut().push(self.id);
        }
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                let id = self.id;
                inner.subscribers.retain(|s| s.id != id);
            }
        }
    }
}

/// The media state store.
///
/// Cheap to clone; clones share the same state, owners, and subscribers.
#[derive(Clone)]
pub struct MediaStore {
    inner: Rc<RefCell<Inner>>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::with_preferences(Rc::new(MemoryPreferences::new()))
    }

    pub fn with_preferences(prefs: Rc<dyn PreferenceStore>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: Rc::new(MediaState::unknown()),
                media: None,
                fullscreen: None,
                document: None,
                prefs,
                subscribers: Vec::new(),
                next_subscriber: 0,
                removals: Rc::new(RefCell::new(Vec::new())),
                notifying: false,
                pending_pass: false,
            })),
        }
    }

    /// The durable preference store. Widgets handling an explicit user
    /// track choice write the chosen language here; the store only reads.
    pub fn preferences(&self) -> Rc<dyn PreferenceStore> {
        Rc::clone(&self.inner.borrow().prefs)
    }

    /// Current immutable snapshot.
    pub fn get_state(&self) -> Rc<MediaState> {
        Rc::clone(&self.inner.borrow().state)
    }

    /// Subscribe with `PartialEq` as the equality check.
    pub fn subscribe<S, Sel, Cb>(&self, selector: Sel, callback: Cb) -> Subscription
    where
        S: PartialEq + 'static,
        Sel: Fn(&MediaState) -> S + 'static,
        Cb: FnMut(&S) + 'static,
    {
        self.subscribe_with(selector, |a, b| a == b, callback)
    }

    /// Subscribe with a caller-supplied equality check. The callback fires
    /// once per recomputation in which the selected value differs from the
    /// last delivered one; it is seeded with the current state and not
    /// called initially.
    pub fn subscribe_with<S, Sel, Eq, Cb>(
        &self,
        selector: Sel,
        equal: Eq,
        mut callback: Cb,
    ) -> Subscription
    where
        S: 'static,
        Sel: Fn(&MediaState) -> S + 'static,
        Eq: Fn(&S, &S) -> bool + 'static,
        Cb: FnMut(&S) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;

        let mut last = selector(&inner.state);
        let notify = Box::new(move |state: &MediaState| {
            let next = selector(state);
            if !equal(&last, &next) {
                callback(&next);
                last = next;
            }
        });

        inner.subscribers.push(Subscriber { id, notify });
        Subscription {
            inner: Rc::downgrade(&self.inner),
            removals: Rc::downgrade(&inner.removals),
            id,
        }
    }

    /// Dispatch an action. Never fails, never panics: requests with no
    /// owner attached for the required role are logged no-ops.
    pub fn dispatch(&self, action: MediaAction) {
        if action.is_ownership_change() {
            tracing::debug!("{}: rebinding owner", action.name());
        }
        match action {
            MediaAction::MediaElementChange(owner) => self.rebind_media(owner),
            MediaAction::FullscreenElementChange(owner) => self.rebind_fullscreen(owner),
            MediaAction::DocumentElementChange(owner) => self.rebind_document(owner),

            MediaAction::Play => self.with_media("mediaplayrequest", |m| m.play()),
            MediaAction::Pause => self.with_media("mediapauserequest", |m| m.pause()),
            MediaAction::Seek(seconds) => {
                self.with_media("mediaseekrequest", |m| m.seek(seconds))
            }
            MediaAction::Volume(volume) => {
                self.with_media("mediavolumerequest", |m| m.set_volume(volume))
            }
            MediaAction::Mute => self.with_media("mediamuterequest", |m| m.set_muted(true)),
            MediaAction::Unmute => self.with_media("mediaunmuterequest", |m| m.set_muted(false)),
            MediaAction::PlaybackRate(rate) => {
                self.with_media("mediaplaybackraterequest", |m| m.set_playback_rate(rate))
            }
            MediaAction::EnterPip => self.with_media("mediaenterpiprequest", |m| m.request_pip()),
            MediaAction::SelectRendition(id) => self.with_media("mediarenditionrequest", |m| {
                m.select_rendition(id.as_deref())
            }),

            MediaAction::EnterFullscreen => {
                let adapter = self.inner.borrow().fullscreen.clone();
                match adapter {
                    Some(fullscreen) => fullscreen.request_fullscreen(),
                    None => tracing::debug!(
                        "mediaenterfullscreenrequest ignored: no fullscreen owner attached"
                    ),
                }
            }
            MediaAction::ExitFullscreen => {
                self.with_document("mediaexitfullscreenrequest", |d| d.exit_fullscreen())
            }
            MediaAction::ExitPip => self.with_document("mediaexitpiprequest", |d| d.exit_pip()),

            MediaAction::ShowSubtitles(tracks) => self.apply_subtitles(tracks, true),
            MediaAction::DisableSubtitles(tracks) => self.apply_subtitles(tracks, false),
        }
    }

    /// String-protocol entry point. Parse failures are logged and dropped;
    /// this is called from UI input handlers that must never crash.
    pub fn dispatch_raw(&self, raw: &RawAction) {
        match MediaAction::from_raw(raw) {
            Ok(action) => self.dispatch(action),
            Err(err) => tracing::warn!("dropped raw action: {}", err),
        }
    }

    fn with_media(&self, name: &str, effect: impl FnOnce(&MediaAdapter)) {
        let adapter = self.inner.borrow().media.clone();
        match adapter {
            Some(media) => effect(&media),
            None => tracing::debug!("{} ignored: no media owner attached", name),
        }
    }

    fn with_document(&self, name: &str, effect: impl FnOnce(&DocumentAdapter)) {
        let adapter = self.inner.borrow().document.clone();
        match adapter {
            Some(document) => effect(&document),
            None => tracing::debug!("{} ignored: no document owner attached", name),
        }
    }

    fn apply_subtitles(&self, requested: Vec<TextTrackInfo>, show: bool) {
        let (media, languages, prefs) = {
            let inner = self.inner.borrow();
            (
                inner.media.clone(),
                inner
                    .document
                    .as_ref()
                    .map(|d| d.languages())
                    .unwrap_or_default(),
                Rc::clone(&inner.prefs),
            )
        };
        let Some(media) = media else {
            tracing::debug!("subtitle request ignored: no media owner attached");
            return;
        };

        let available = media.text_tracks();
        let showing: Vec<TextTrackInfo> =
            available.iter().filter(|t| t.showing()).cloned().collect();

        let mut preferences = Vec::new();
        if show && requested.is_empty() {
            // Remembered explicit choice outranks the environment chain.
            if let Some(lang) = prefs.get(SUBTITLES_LANG_KEY) {
                preferences.push(lang);
            }
            preferences.extend(languages);
        }

        let plan = select::plan_toggle(&available, &showing, Some(show), &requested, &preferences);
        for change in plan {
            media.set_track_mode(&change.track, change.mode);
        }
    }

    // Ownership changes. Teardown strictly precedes the new bind so no
    // event from the torn-down owner can reach the store afterwards.

    fn rebind_media(&self, owner: Option<Rc<dyn MediaOwner>>) {
        let old = self.inner.borrow_mut().media.take();
        if let Some(old) = old {
            old.unbind();
        }
        if let Some(owner) = owner {
            let adapter = MediaAdapter::bind(owner, self.change_listener());
            self.inner.borrow_mut().media = Some(adapter);
        }
        Self::recompute(&self.inner);
    }

    fn rebind_fullscreen(&self, owner: Option<Rc<dyn FullscreenOwner>>) {
        let old = self.inner.borrow_mut().fullscreen.take();
        if let Some(old) = old {
            old.unbind();
        }
        if let Some(owner) = owner {
            let adapter = FullscreenAdapter::bind(owner, self.change_listener());
            self.inner.borrow_mut().fullscreen = Some(adapter);
        }
        Self::recompute(&self.inner);
    }

    fn rebind_document(&self, owner: Option<Rc<dyn DocumentOwner>>) {
        let old = self.inner.borrow_mut().document.take();
        if let Some(old) = old {
            old.unbind();
        }
        if let Some(owner) = owner {
            let adapter = DocumentAdapter::bind(owner, self.change_listener());
            self.inner.borrow_mut().document = Some(adapter);
        }
        Self::recompute(&self.inner);
    }

    /// The single listener installed on each bound owner. Holds only a weak
    /// reference: owners outliving the store must not keep it alive.
    fn change_listener(&self) -> ChangeListener {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::recompute(&inner);
            }
        })
    }

    /// Replace the snapshot from the attached owners and notify.
    fn recompute(inner_rc: &Rc<RefCell<Inner>>) {
        {
            let mut inner = inner_rc.borrow_mut();
            let next = inner.compute_state();
            inner.state = Rc::new(next);
            if inner.notifying {
                // A callback re-entered the store; the running pass rewinds
                // with the fresh snapshot once it finishes.
                inner.pending_pass = true;
                return;
            }
        }
        Self::notify_pass(inner_rc);
    }

    /// Run subscriber callbacks outside any interior borrow, so callbacks
    /// may freely subscribe, unsubscribe, or dispatch.
    fn notify_pass(inner_rc: &Rc<RefCell<Inner>>) {
        loop {
            let (state, mut checked_out) = {
                let mut inner = inner_rc.borrow_mut();
                inner.notifying = true;
                (Rc::clone(&inner.state), mem::take(&mut inner.subscribers))
            };

            for subscriber in checked_out.iter_mut() {
                (subscriber.notify)(&state);
            }

            let mut inner = inner_rc.borrow_mut();
            inner.notifying = false;
            let added = mem::take(&mut inner.subscribers);
            checked_out.extend(added);
            let removed = mem::take(&mut *inner.removals.borrow_mut());
            if !removed.is_empty() {
                checked_out.retain(|s| !removed.contains(&s.id));
            }
            inner.subscribers = checked_out;

            if !inner.pending_pass {
                break;
            }
            inner.pending_pass = false;
        }
    }
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new()
    }
}
