use tracing::debug;

pub(crate) const DEFAULT_THRESHOLD: f32 = 0.12;

/// Half-open vertical range of page rows, `[top, bottom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowSpan {
    pub(crate) top: i32,
    pub(crate) bottom: i32,
}

impl RowSpan {
    pub(crate) fn new(top: i32, height: i32) -> Self {
        Self {
            top,
            bottom: top + height.max(0),
        }
    }
    pub(crate) fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// One observation of an element against the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Intersection {
    pub(crate) is_intersecting: bool,
    pub(crate) ratio: f32,
}

/// Fraction of `element` inside `viewport`.
pub(crate) fn intersect(element: RowSpan, viewport: RowSpan) -> Intersection {
    let top = element.top.max(viewport.top);
    let bottom = element.bottom.min(viewport.bottom);
    let overlap = (bottom - top).max(0);
    let h = element.height();
    let ratio = if h > 0 {
        overlap as f32 / h as f32
    } else if element.top >= viewport.top && element.top < viewport.bottom {
        1.0
    } else {
        0.0
    };
    Intersection {
        is_intersecting: overlap > 0 || ratio > 0.0,
        ratio,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Observation {
    Idle,
    Observing,
    Disengaged,
}

/// One-shot "has this scrolled into view" flag.
#[derive(Clone, Debug)]
pub(crate) struct VisibilityTrigger {
    threshold: f32,
    state: Observation,
    visible: bool,
    callbacks: u32,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl VisibilityTrigger {
    pub(crate) fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            state: Observation::Idle,
            visible: false,
            callbacks: 0,
        }
    }

    pub(crate) fn observe(&mut self) {
        if self.state == Observation::Idle {
            self.state = Observation::Observing;
        }
    }

    pub(crate) fn is_observing(&self) -> bool {
        self.state == Observation::Observing
    }

    pub(crate) fn visible(&self) -> bool {
        self.visible
    }

    /// Number of times the intersection callback has run.
    pub(crate) fn callbacks(&self) -> u32 {
        self.callbacks
    }

    /// Delivers an observation. Returns true when the callback ran.
    pub(crate) fn notify(&mut self, entry: Intersection) -> bool {
        if self.state != Observation::Observing {
            return false;
        }
        if !(entry.is_intersecting && entry.ratio >= self.threshold) {
            return false;
        }
        self.callbacks += 1;
        self.visible = true;
        self.state = Observation::Disengaged;
        debug!(ratio = entry.ratio, "element became visible");
        true
    }

    /// Stops observing whether or not the flag ever flipped.
    pub(crate) fn disconnect(&mut self) {
        self.state = Observation::Disengaged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(ratio: f32) -> Intersection {
        Intersection {
            is_intersecting: ratio > 0.0,
            ratio,
        }
    }

    #[test]
    fn test_starts_hidden() {
        let t = VisibilityTrigger::default();
        assert!(!t.visible());
        assert!(!t.is_observing());
    }

    #[test]
    fn test_ignores_events_before_observe() {
        let mut t = VisibilityTrigger::default();
        assert!(!t.notify(seen(1.0)));
        assert!(!t.visible());
    }

    #[test]
    fn test_below_threshold_does_not_trigger() {
        let mut t = VisibilityTrigger::default();
        t.observe();
        assert!(!t.notify(seen(0.05)));
        assert!(!t.visible());
        assert!(t.notify(seen(0.12)));
        assert!(t.visible());
    }

    #[test]
    fn test_flag_is_monotonic_and_fires_once() {
        let mut t = VisibilityTrigger::new(0.12);
        t.observe();
        assert!(t.notify(seen(0.5)));
        for r in [0.0, 1.0, 0.0, 0.3, 0.0] {
            assert!(!t.notify(seen(r)));
            assert!(t.visible());
        }
        assert_eq!(t.callbacks(), 1);
        assert!(!t.is_observing());
    }

    #[test]
    fn test_disconnect_before_trigger_stops_callbacks() {
        let mut t = VisibilityTrigger::default();
        t.observe();
        t.disconnect();
        assert!(!t.notify(seen(1.0)));
        assert_eq!(t.callbacks(), 0);
        assert!(!t.visible());
        t.observe();
        assert!(!t.is_observing());
    }

    #[test]
    fn test_intersect_partial_overlap() {
        let vp = RowSpan::new(0, 20);
        let i = intersect(RowSpan::new(15, 10), vp);
        assert!(i.is_intersecting);
        assert!((i.ratio - 0.5).abs() < 1e-6);
        let o = intersect(RowSpan::new(25, 10), vp);
        assert!(!o.is_intersecting);
        assert_eq!(o.ratio, 0.0);
        let full = intersect(RowSpan::new(2, 4), vp);
        assert_eq!(full.ratio, 1.0);
    }

    #[test]
    fn test_zero_height_span_counts_while_top_row_in_view() {
        let vp = RowSpan::new(0, 20);
        for top in [0, 5, 19] {
            let i = intersect(RowSpan::new(top, 0), vp);
            assert!(i.is_intersecting, "top {top}");
            assert_eq!(i.ratio, 1.0);
        }
        for top in [-1, 20, 30] {
            let i = intersect(RowSpan::new(top, 0), vp);
            assert!(!i.is_intersecting, "top {top}");
            assert_eq!(i.ratio, 0.0);
        }
    }
}
