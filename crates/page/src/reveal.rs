//! Scroll-triggered fade-in: an element appears once enough of it is visible
//! and stays visible afterwards.

/// Intersection ratio at or above which an element is revealed.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Reveal latches for a fixed list of observed elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    threshold: f64,
    revealed: Vec<bool>,
}

impl Reveal {
    pub fn new(elements: usize) -> Self {
        Self::with_threshold(elements, DEFAULT_THRESHOLD)
    }

    /// `threshold` is clamped to [0, 1].
    pub fn with_threshold(elements: usize, threshold: f64) -> Self {
        Self {
            threshold: if threshold.is_nan() {
                DEFAULT_THRESHOLD
            } else {
                threshold.clamp(0.0, 1.0)
            },
            revealed: vec![false; elements],
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Records an intersection observation for element `index`.
    ///
    /// Returns `true` only on the observation that first reveals the element,
    /// so the caller adds the "appear" class exactly once. Unknown indices
    /// are ignored.
    pub fn observe(&mut self, index: usize, intersection_ratio: f64) -> bool {
        let Some(slot) = self.revealed.get_mut(index) else {
            return false;
        };
        if *slot || intersection_ratio.is_nan() || intersection_ratio < self.threshold {
            return false;
        }
        *slot = true;
        true
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|&&r| r).count()
    }
}
