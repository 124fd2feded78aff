//! Range animation
//!
//! Drift-corrected interpolation for a continuously increasing scalar (the
//! playhead) that the owner only reports sporadically and with jitter. A
//! frame driver calls `tick` at its own pace; `tick` throttles itself to
//! the configured fps and predicts the current value from the last
//! authoritative update. When the prediction would regress — the owner's
//! predicted rate exceeded reality — the display instead advances by a
//! geometrically damped copy of the last accepted per-frame increment, so
//! it neither jumps backward nor freezes.
//!
//! The frame driver should stop ticking while playback is paused; the
//! prediction is only meaningful for a moving playhead.

/// Tunable constants. Empirically chosen; adjust rather than assume they
/// are load-bearing for correctness.
#[derive(Debug, Clone, Copy)]
pub struct AnimationConfig {
    /// Target display rate; frames arriving faster are dropped.
    pub fps: f64,
    /// Geometric decay applied to the per-frame increment on regression.
    pub damping: f64,
    /// Backward jumps beyond this snap immediately (treated as a seek).
    pub seek_threshold: f64,
    /// Duration changes beyond this snap immediately (treated as a source
    /// change).
    pub duration_threshold: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            damping: 0.995,
            seek_threshold: 0.5,
            duration_threshold: 0.03,
        }
    }
}

/// Frame-driven predictor for a sparsely updated increasing value.
#[derive(Debug)]
pub struct RangeAnimation {
    config: AnimationConfig,
    update_start: f64,
    update_at_ms: f64,
    duration: f64,
    rate: f64,
    value: f64,
    last_increment: f64,
    last_frame_ms: Option<f64>,
}

impl RangeAnimation {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            update_start: 0.0,
            update_at_ms: 0.0,
            duration: f64::NAN,
            rate: 1.0,
            value: 0.0,
            last_increment: 0.0,
            last_frame_ms: None,
        }
    }

    /// Currently displayed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Record an authoritative update from the owner.
    ///
    /// The displayed value snaps to `start` only for a forward jump, a
    /// backward jump beyond the seek threshold, or a duration change beyond
    /// the duration threshold; otherwise the display keeps interpolating and
    /// only the prediction parameters are rebased.
    pub fn update(&mut self, start: f64, duration: f64, playback_rate: f64, now_ms: f64) {
        let duration_changed = match (self.duration.is_nan(), duration.is_nan()) {
            (true, true) => false,
            (was, is) if was != is => true,
            _ => (duration - self.duration).abs() > self.config.duration_threshold,
        };
        let forward_jump = start > self.value;
        let backward_seek = self.value - start > self.config.seek_threshold;

        if forward_jump || backward_seek || duration_changed {
            self.value = start;
            self.last_increment = 0.0;
        }

        self.update_start = start;
        self.update_at_ms = now_ms;
        self.duration = duration;
        self.rate = playback_rate;
    }

    /// Advance one frame. Returns the displayed value, or `None` when the
    /// frame arrives faster than the configured fps allows.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        if let Some(last) = self.last_frame_ms {
            if now_ms - last < 1000.0 / self.config.fps {
                return None;
            }
        }
        self.last_frame_ms = Some(now_ms);

        let predicted = self.update_start + self.rate * (now_ms - self.update_at_ms) / 1000.0;
        let delta = predicted - self.value;
        if delta > 0.0 {
            self.value = predicted;
            self.last_increment = delta;
        } else if delta < 0.0 {
            self.last_increment *= self.config.damping;
            self.value += self.last_increment;
        }

        if self.duration.is_finite() {
            self.value = self.value.min(self.duration);
        }
        self.value = self.value.max(0.0);
        Some(self.value)
    }
}

impl Default for RangeAnimation {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}
