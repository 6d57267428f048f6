use crate::TRANSITION_MS;
use std::time::Duration;

// CSS `ease`
const EASE: (f64, f64, f64, f64) = (0.25, 0.1, 0.25, 1.0);

/// Tween of the displayed value between two caller-supplied values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    duration: Duration,
}

impl Transition {
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            duration: Duration::from_millis(TRANSITION_MS),
        }
    }

    /// Already at `value`; sampling returns it immediately.
    pub fn settled(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            duration: Duration::ZERO,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease(t)
    }
}

/// Cubic bezier timing curve through (0,0), (x1,y1), (x2,y2), (1,1), solved
/// for `x = t` by bisection.
pub fn ease(t: f64) -> f64 {
    let (x1, y1, x2, y2) = EASE;
    let bezier = |s: f64, p1: f64, p2: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };

    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..40 {
        let mid = (lo + hi) / 2.0;
        if bezier(mid, x1, x2) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier((lo + hi) / 2.0, y1, y2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints_and_shape() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        // `ease` front-loads the motion
        assert!(ease(0.5) > 0.75);
        let mut last = 0.0;
        for i in 0..=100 {
            let y = ease(i as f64 / 100.0);
            assert!(y >= last - 1e-12);
            last = y;
        }
    }

    #[test]
    fn test_transition_sampling() {
        let t = Transition::new(16.0, 30.0);
        assert_eq!(t.sample(Duration::ZERO), 16.0);
        let mid = t.sample(Duration::from_millis(150));
        assert!(mid > 16.0 && mid < 30.0);
        assert_eq!(t.sample(Duration::from_millis(300)), 30.0);
        assert!(t.is_finished(Duration::from_secs(1)));
        assert_eq!(t.target(), 30.0);
    }

    #[test]
    fn test_settled_transition() {
        let t = Transition::settled(42.0);
        assert!(t.is_finished(Duration::ZERO));
        assert_eq!(t.sample(Duration::ZERO), 42.0);
    }
}
