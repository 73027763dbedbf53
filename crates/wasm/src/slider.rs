//! Carousel state exported to page scripts.
//!
//! The script owns the DOM: it calls `next`/`prev`/`go_to` from button and
//! dot handlers, feeds `advance` from a timer, and applies `offset_pct` to the
//! track's `translateX`.

use backdrop_page::Carousel;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Slider {
    inner: Carousel,
}

impl Slider {
    fn from_count(count: usize) -> Option<Slider> {
        Carousel::new(count).map(|inner| Slider { inner })
    }
}

#[wasm_bindgen]
impl Slider {
    /// A slider over `count` slides with the default 5 s autoplay.
    /// Returns `undefined` when there are no slides.
    pub fn create(count: usize) -> Option<Slider> {
        Slider::from_count(count)
    }

    /// Sets the autoplay interval in milliseconds. Non-positive or missing
    /// values disable autoplay.
    pub fn set_autoplay(&mut self, interval_ms: Option<f64>) {
        let interval = interval_ms.filter(|ms| ms.is_finite() && *ms > 0.0);
        let retimed = self.inner.clone().with_autoplay(interval);
        if let Ok(inner) = retimed {
            self.inner = inner;
        }
    }

    pub fn next(&mut self) -> usize {
        self.inner.next()
    }

    pub fn prev(&mut self) -> usize {
        self.inner.prev()
    }

    pub fn go_to(&mut self, dot: usize) -> bool {
        self.inner.go_to(dot)
    }

    /// Advances the autoplay timer; returns how many slides it moved.
    pub fn advance(&mut self, elapsed_ms: f64) -> usize {
        self.inner.advance(elapsed_ms)
    }

    pub fn index(&self) -> usize {
        self.inner.index()
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn is_active(&self, dot: usize) -> bool {
        self.inner.is_active(dot)
    }

    pub fn offset_pct(&self) -> f64 {
        self.inner.layout().offset_pct
    }

    pub fn track_width_pct(&self) -> f64 {
        self.inner.layout().track_width_pct
    }

    pub fn slide_width_pct(&self) -> f64 {
        self.inner.layout().slide_width_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_slides_no_slider() {
        assert!(Slider::create(0).is_none());
    }

    #[test]
    fn navigation_updates_offset() {
        let mut s = Slider::create(4).unwrap();
        assert_eq!(s.prev(), 3);
        assert_eq!(s.offset_pct(), -75.0);
        assert_eq!(s.next(), 0);
        assert!(s.go_to(2));
        assert!(s.is_active(2));
        assert_eq!(s.track_width_pct(), 400.0);
        assert_eq!(s.slide_width_pct(), 25.0);
    }

    #[test]
    fn autoplay_can_be_retimed_and_disabled() {
        let mut s = Slider::create(3).unwrap();
        s.set_autoplay(Some(100.0));
        assert_eq!(s.advance(250.0), 2);
        s.set_autoplay(Some(-1.0));
        assert_eq!(s.advance(1e9), 0);
        s.set_autoplay(None);
        assert_eq!(s.advance(1e9), 0);
        assert_eq!(s.count(), 3);
    }
}
