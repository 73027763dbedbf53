//! Navbar style switch once the page scrolls past a threshold.

/// Scroll offset in pixels past which the navbar is "scrolled".
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navbar {
    threshold: f64,
    scrolled: bool,
}

impl Default for Navbar {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl Navbar {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scrolled: false,
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Applies a scroll offset. Returns the new state only when it changed,
    /// so the caller touches the DOM on transitions alone.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<bool> {
        let scrolled = scroll_y > self.threshold;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }
}

/// Where the "scroll down" affordance scrolls to: one viewport below the top.
pub fn scroll_down_target(viewport_height: f64) -> f64 {
    viewport_height.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_transitions() {
        let mut nav = Navbar::default();
        assert_eq!(nav.on_scroll(10.0), None);
        assert_eq!(nav.on_scroll(51.0), Some(true));
        assert_eq!(nav.on_scroll(400.0), None);
        assert!(nav.is_scrolled());
        assert_eq!(nav.on_scroll(50.0), Some(false));
    }

    #[test]
    fn custom_threshold() {
        let mut nav = Navbar::new(0.0);
        assert_eq!(nav.on_scroll(1.0), Some(true));
    }

    #[test]
    fn scroll_down_goes_one_viewport() {
        assert_eq!(scroll_down_target(900.0), 900.0);
        assert_eq!(scroll_down_target(-3.0), 0.0);
    }
}
