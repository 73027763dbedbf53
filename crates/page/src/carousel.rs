//! Slide index, wrap-around navigation, layout percentages and autoplay.

use backdrop_core::error::EngineError;
use log::trace;
use serde::Serialize;

/// Default autoplay interval, in milliseconds.
pub const DEFAULT_AUTOPLAY_MS: f64 = 5000.0;

/// CSS percentages that place the track so the current slide is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarouselLayout {
    /// Track width, `count × 100` percent.
    pub track_width_pct: f64,
    /// Each slide's width as a share of the track.
    pub slide_width_pct: f64,
    /// `translateX` of the track, always `<= 0`.
    pub offset_pct: f64,
}

/// A carousel over a non-empty set of slides.
///
/// A page without slides has no carousel: [`Carousel::new`] returns `None`
/// and the caller skips the behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    count: usize,
    index: usize,
    autoplay_ms: Option<f64>,
    elapsed_ms: f64,
}

impl Carousel {
    /// A carousel at slide 0 with the default 5 s autoplay.
    pub fn new(count: usize) -> Option<Self> {
        (count > 0).then_some(Self {
            count,
            index: 0,
            autoplay_ms: Some(DEFAULT_AUTOPLAY_MS),
            elapsed_ms: 0.0,
        })
    }

    /// Replaces the autoplay interval; `None` disables autoplay.
    pub fn with_autoplay(mut self, interval_ms: Option<f64>) -> Result<Self, EngineError> {
        if let Some(ms) = interval_ms {
            if !(ms.is_finite() && ms > 0.0) {
                return Err(EngineError::invalid_param(
                    "autoplay_ms",
                    format!("{ms} is not a positive interval"),
                ));
            }
        }
        self.autoplay_ms = interval_ms;
        self.elapsed_ms = 0.0;
        Ok(self)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn autoplay_ms(&self) -> Option<f64> {
        self.autoplay_ms
    }

    /// Moves to the next slide, wrapping to the first.
    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    /// Moves to the previous slide, wrapping to the last.
    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.count - 1) % self.count;
        self.index
    }

    /// Jumps to slide `dot`. Out-of-range dots are ignored and return `false`.
    pub fn go_to(&mut self, dot: usize) -> bool {
        if dot < self.count {
            self.index = dot;
            true
        } else {
            false
        }
    }

    /// Feeds elapsed time to the autoplay timer and returns how many slides
    /// it advanced. Manual navigation does not reset the timer.
    pub fn advance(&mut self, elapsed_ms: f64) -> usize {
        let Some(interval) = self.autoplay_ms else {
            return 0;
        };
        if !(elapsed_ms.is_finite() && elapsed_ms > 0.0) {
            return 0;
        }
        self.elapsed_ms += elapsed_ms;
        if self.elapsed_ms < interval {
            return 0;
        }
        let ticks = (self.elapsed_ms / interval).floor();
        self.elapsed_ms %= interval;
        // `as` saturates, so huge tick counts still land on a valid slide.
        let advanced = ticks as usize;
        let shift = (ticks as u128 % self.count as u128) as usize;
        self.index = (self.index + shift) % self.count;
        if advanced > 0 {
            trace!("autoplay advanced {advanced} slide(s) to {}", self.index);
        }
        advanced
    }

    pub fn layout(&self) -> CarouselLayout {
        let n = self.count as f64;
        CarouselLayout {
            track_width_pct: n * 100.0,
            slide_width_pct: 100.0 / n,
            offset_pct: -(self.index as f64) * (100.0 / n),
        }
    }

    /// Whether dot `dot` should show as active.
    pub fn is_active(&self, dot: usize) -> bool {
        dot == self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_slides_means_no_carousel() {
        assert!(Carousel::new(0).is_none());
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut c = Carousel::new(3).unwrap();
        assert_eq!(c.prev(), 2);
        assert_eq!(c.next(), 0);
        assert_eq!(c.next(), 1);
        assert_eq!(c.next(), 2);
        assert_eq!(c.next(), 0);
    }

    #[test]
    fn single_slide_stays_put() {
        let mut c = Carousel::new(1).unwrap();
        assert_eq!(c.next(), 0);
        assert_eq!(c.prev(), 0);
    }

    #[test]
    fn go_to_ignores_out_of_range_dots() {
        let mut c = Carousel::new(4).unwrap();
        assert!(c.go_to(2));
        assert!(c.is_active(2));
        assert!(!c.go_to(4));
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn layout_matches_track_and_slide_percentages() {
        let mut c = Carousel::new(4).unwrap();
        c.go_to(3);
        let l = c.layout();
        assert_eq!(l.track_width_pct, 400.0);
        assert_eq!(l.slide_width_pct, 25.0);
        assert_eq!(l.offset_pct, -75.0);
    }

    #[test]
    fn autoplay_advances_once_per_interval() {
        let mut c = Carousel::new(3).unwrap();
        assert_eq!(c.advance(4999.0), 0);
        assert_eq!(c.advance(1.0), 1);
        assert_eq!(c.index(), 1);
        assert_eq!(c.advance(10_000.0), 2);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn autoplay_can_be_disabled_or_retimed() {
        let mut off = Carousel::new(3).unwrap().with_autoplay(None).unwrap();
        assert_eq!(off.advance(1e9), 0);
        let mut fast = Carousel::new(3).unwrap().with_autoplay(Some(100.0)).unwrap();
        assert_eq!(fast.advance(250.0), 2);
        assert!(Carousel::new(3).unwrap().with_autoplay(Some(0.0)).is_err());
        assert!(Carousel::new(3)
            .unwrap()
            .with_autoplay(Some(f64::NAN))
            .is_err());
    }

    #[test]
    fn autoplay_handles_huge_elapsed_times() {
        let mut c = Carousel::new(3).unwrap();
        assert!(c.advance(1e20) > 0);
        assert!(c.index() < 3);
        assert!(c.advance(f64::MAX) > 0);
        assert!(c.index() < 3);
        assert_eq!(c.advance(f64::MAX), usize::MAX);
        assert!(c.index() < 3);
    }

    #[test]
    fn autoplay_keeps_the_remainder() {
        let mut c = Carousel::new(4).unwrap();
        assert_eq!(c.advance(12_500.0), 2);
        assert_eq!(c.index(), 2);
        assert_eq!(c.advance(2_499.0), 0);
        assert_eq!(c.advance(1.0), 1);
        assert_eq!(c.index(), 3);
    }

    #[test]
    fn autoplay_ignores_negative_and_nan_elapsed() {
        let mut c = Carousel::new(3).unwrap();
        assert_eq!(c.advance(-5000.0), 0);
        assert_eq!(c.advance(f64::NAN), 0);
        assert_eq!(c.advance(5000.0), 1);
    }

    #[test]
    fn layout_serializes_for_the_bindings() {
        let v = serde_json::to_value(Carousel::new(2).unwrap().layout()).unwrap();
        assert_eq!(v["track_width_pct"], 200.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn index_always_in_range(count in 1_usize..20, moves in proptest::collection::vec(0_u8..3, 0..100)) {
                let mut c = Carousel::new(count).unwrap();
                for m in moves {
                    match m {
                        0 => { c.next(); }
                        1 => { c.prev(); }
                        _ => { c.advance(DEFAULT_AUTOPLAY_MS); }
                    }
                    prop_assert!(c.index() < count);
                }
            }

            #[test]
            fn next_then_prev_is_identity(count in 1_usize..20, start in 0_usize..20) {
                let mut c = Carousel::new(count).unwrap();
                c.go_to(start % count);
                let before = c.index();
                c.next();
                c.prev();
                prop_assert_eq!(c.index(), before);
            }
        }
    }
}
