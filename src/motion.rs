/// Cubic bezier timing curve from (0,0) to (1,1) with control points (x1,y1) and (x2,y2).
#[derive(Clone, Copy, Debug)]
pub(crate) struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

/// `cubic-bezier(.22,1,.36,1)`: fast start, long soft landing.
pub(crate) const EASE_OUT: CubicBezier = CubicBezier::new(0.22, 1.0, 0.36, 1.0);

fn bezier(a1: f32, a2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
}

fn bezier_slope(a1: f32, a2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
}

impl CubicBezier {
    pub(crate) const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub(crate) fn ease(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        // Newton first, bisection if the slope flattens out
        let mut t = x;
        for _ in 0..8 {
            let err = bezier(self.x1, self.x2, t) - x;
            if err.abs() < 1e-5 {
                return bezier(self.y1, self.y2, t);
            }
            let d = bezier_slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t = (t - err / d).clamp(0.0, 1.0);
        }
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let v = bezier(self.x1, self.x2, t);
            if (v - x).abs() < 1e-5 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        bezier(self.y1, self.y2, t)
    }
}

/// Entrance transition: fade in while rising `rise` rows into place.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Reveal {
    pub(crate) delay: f32,
    pub(crate) duration: f32,
    pub(crate) rise: f32,
}

/// Scroll-triggered block entrance: 0.8 s, two rows of rise.
pub(crate) const FADE_IN: Reveal = Reveal {
    delay: 0.0,
    duration: 0.8,
    rise: 2.0,
};

/// Hero load-in: 1 s, two and a half rows of rise.
pub(crate) const HERO_IN: Reveal = Reveal {
    delay: 0.0,
    duration: 1.0,
    rise: 2.5,
};

impl Reveal {
    pub(crate) fn delayed(self, delay: f32) -> Self {
        Self { delay, ..self }
    }

    /// Eased progress in 0..=1. `shown_at` is when the trigger fired.
    pub(crate) fn progress(&self, shown_at: Option<f32>, now: f32) -> f32 {
        let Some(start) = shown_at else {
            return 0.0;
        };
        let elapsed = now - start - self.delay;
        if elapsed <= 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        EASE_OUT.ease(elapsed / self.duration)
    }

    /// Row offset still to travel at the given progress.
    pub(crate) fn offset(&self, progress: f32) -> i32 {
        ((1.0 - progress) * self.rise).round() as i32
    }
}

/// Scroll position that glides towards its target.
#[derive(Clone, Debug, Default)]
pub(crate) struct SmoothScroll {
    pos: f32,
    target: f32,
    max: f32,
}

const SCROLL_RATE: f32 = 12.0;

impl SmoothScroll {
    pub(crate) fn set_max(&mut self, max: i32) {
        self.max = max.max(0) as f32;
        self.target = self.target.clamp(0.0, self.max);
        self.pos = self.pos.clamp(0.0, self.max);
    }

    pub(crate) fn scroll_by(&mut self, rows: i32) {
        self.scroll_to(self.target + rows as f32);
    }

    pub(crate) fn scroll_to(&mut self, row: f32) {
        self.target = row.clamp(0.0, self.max);
    }

    pub(crate) fn step(&mut self, dt: f32) {
        let diff = self.target - self.pos;
        if diff.abs() < 0.05 {
            self.pos = self.target;
            return;
        }
        self.pos += diff * (1.0 - (-dt * SCROLL_RATE).exp());
    }

    pub(crate) fn row(&self) -> i32 {
        self.pos.round() as i32
    }

    pub(crate) fn target(&self) -> f32 {
        self.target
    }

    #[cfg(test)]
    pub(crate) fn is_settled(&self) -> bool {
        self.pos == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints_and_monotonic() {
        assert_eq!(EASE_OUT.ease(0.0), 0.0);
        assert_eq!(EASE_OUT.ease(1.0), 1.0);
        let mut last = 0.0;
        for i in 1..=20 {
            let v = EASE_OUT.ease(i as f32 / 20.0);
            assert!(v >= last - 1e-4, "not monotonic at {i}");
            last = v;
        }
        // front-loaded curve
        assert!(EASE_OUT.ease(0.3) > 0.6);
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for x in [0.1, 0.25, 0.5, 0.9] {
            assert!((linear.ease(x) - x).abs() < 1e-3);
        }
    }

    #[test]
    fn test_reveal_waits_for_trigger_and_delay() {
        let r = FADE_IN.delayed(0.16);
        assert_eq!(r.progress(None, 10.0), 0.0);
        assert_eq!(r.progress(Some(1.0), 1.1), 0.0);
        assert_eq!(r.progress(Some(1.0), 2.0), 1.0);
        assert_eq!(r.offset(0.0), 2);
        assert_eq!(r.offset(1.0), 0);
    }

    #[test]
    fn test_smooth_scroll_settles_and_clamps() {
        let mut s = SmoothScroll::default();
        s.set_max(100);
        s.scroll_to(250.0);
        assert_eq!(s.target(), 100.0);
        for _ in 0..200 {
            s.step(1.0 / 30.0);
        }
        assert!(s.is_settled());
        assert_eq!(s.row(), 100);
        s.scroll_by(-500);
        assert_eq!(s.target(), 0.0);
    }
}
