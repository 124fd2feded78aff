//! Time ranges
//!
//! Buffered/seekable ranges reported by a playback source.

use serde::Serialize;

/// Ordered list of `(start, end)` second pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl TimeRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of pairs, keeping the given order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            ranges: pairs.into_iter().collect(),
        }
    }

    pub fn add(&mut self, start: f64, end: f64) {
        self.ranges.push((start, end));
    }

    pub fn length(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn start(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(s, _)| *s)
    }

    pub fn end(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(_, e)| *e)
    }

    /// Outermost `(start, end)` covering every range, or `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let first = self.ranges.first()?;
        let mut lo = first.0;
        let mut hi = first.1;
        for (s, e) in &self.ranges {
            lo = lo.min(*s);
            hi = hi.max(*e);
        }
        Some((lo, hi))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ranges.iter().copied()
    }
}
