//! Subtitle auto-selection
//!
//! Pure planning for show/hide subtitle requests. The store feeds these
//! functions the owner's track list, the currently showing set, and a
//! language preference chain (remembered choice first, then the
//! environment's ordered languages), and applies the returned mode changes
//! through the media adapter.

use mc_state::{TextTrackInfo, TrackMode};

/// One track mode change the caller should apply.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackChange {
    pub track: TextTrackInfo,
    pub mode: TrackMode,
}

/// Primary language subtag: `en-US` and `en_us` both compare as `en`.
pub fn primary_subtag(language: &str) -> &str {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or(language)
}

/// Pick the track to enable for an unspecific "show subtitles" request.
///
/// Tracks whose primary subtag appears in `preferences` win, ordered by the
/// index of the first matching preference; ties keep track-list order. With
/// no match the first available track is chosen; with no tracks at all,
/// nothing.
pub fn choose_track<'a>(
    available: &'a [TextTrackInfo],
    preferences: &[String],
) -> Option<&'a TextTrackInfo> {
    let prefs: Vec<String> = preferences
        .iter()
        .map(|p| primary_subtag(p).to_ascii_lowercase())
        .collect();

    let mut best: Option<(usize, &TextTrackInfo)> = None;
    for track in available {
        let lang = primary_subtag(&track.language).to_ascii_lowercase();
        if let Some(index) = prefs.iter().position(|p| *p == lang) {
            if best.map_or(true, |(b, _)| index < b) {
                best = Some((index, track));
            }
        }
    }

    best.map(|(_, track)| track).or_else(|| available.first())
}

/// Plan a toggle request.
///
/// `force`: `Some(true)` show, `Some(false)` hide, `None` flip based on
/// whether anything is currently showing. `requested` names specific
/// tracks; empty means "no specific track" (auto-select on show, all
/// showing on hide). Both directions are idempotent: an already-showing
/// equivalent track, or hiding with nothing showing, plans no changes.
pub fn plan_toggle(
    available: &[TextTrackInfo],
    showing: &[TextTrackInfo],
    force: Option<bool>,
    requested: &[TextTrackInfo],
    preferences: &[String],
) -> Vec<TrackChange> {
    let turning_on = force.unwrap_or_else(|| showing.is_empty());

    if !turning_on {
        let targets: Vec<&TextTrackInfo> = if requested.is_empty() {
            showing.iter().collect()
        } else {
            requested
                .iter()
                .filter(|r| showing.iter().any(|s| s.same_track(r)))
                .collect()
        };
        return targets
            .into_iter()
            .map(|track| TrackChange {
                track: track.clone(),
                mode: TrackMode::Disabled,
            })
            .collect();
    }

    if !requested.is_empty() {
        return requested
            .iter()
            .filter(|r| !showing.iter().any(|s| s.same_track(r)))
            .map(|track| TrackChange {
                track: track.clone(),
                mode: TrackMode::Showing,
            })
            .collect();
    }

    // Unspecific enable: a no-op while something is already showing.
    if !showing.is_empty() {
        return Vec::new();
    }

    choose_track(available, preferences)
        .map(|track| {
            vec![TrackChange {
                track: track.clone(),
                mode: TrackMode::Showing,
            }]
        })
        .unwrap_or_default()
}
