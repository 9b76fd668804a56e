//! Time-boxed value smoothing.
//!
//! A tween is advanced explicitly by the frame loop; nothing here reads a
//! clock. Retargeting replaces a tween rather than stacking a second one.

use std::f64::consts::TAU;

use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Ease {
    Linear,
    /// Cubic ease-out, `1 - (1 - t)^3`.
    OutCubic,
    /// Elastic ease-out with overshoot `amplitude` and oscillation `period`.
    OutElastic { amplitude: f64, period: f64 },
}

impl Ease {
    /// Maps normalized time (clamped to 0..1) to progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::Linear => t,
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
            Ease::OutElastic { amplitude, period } => {
                if t <= 0.0 {
                    return 0.0;
                }
                if t >= 1.0 {
                    return 1.0;
                }
                let a = amplitude.max(1.0);
                let period = if period > 0.0 { period } else { 0.3 };
                let p = period / amplitude.clamp(f64::EPSILON, 1.0);
                let shift = p / TAU * (1.0 / a).asin();
                a * 2f64.powf(-10.0 * t) * ((t - shift) * TAU / p).sin() + 1.0
            }
        }
    }
}

pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp_to(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, other: Self, t: f64) -> Self {
        self.lerp(other, t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    elapsed_s: f64,
    duration_s: f64,
    ease: Ease,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration_s: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            elapsed_s: 0.0,
            duration_s,
            ease,
        }
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        !(self.duration_s > 0.0) || self.elapsed_s >= self.duration_s
    }

    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed_s / self.duration_s;
        self.from.lerp_to(self.to, self.ease.apply(t))
    }

    /// Moves the tween forward by `dt_s` and returns the new value.
    pub fn advance(&mut self, dt_s: f64) -> T {
        if dt_s.is_finite() && dt_s > 0.0 {
            self.elapsed_s += dt_s;
        }
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::{Ease, Tween};
    use foundation::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps {eps})");
    }

    #[test]
    fn eases_hit_both_ends() {
        let elastic = Ease::OutElastic {
            amplitude: 1.0,
            period: 0.5,
        };
        for ease in [Ease::Linear, Ease::OutCubic, elastic] {
            assert_close(ease.apply(0.0), 0.0, 1e-12);
            assert_close(ease.apply(1.0), 1.0, 1e-12);
        }
    }

    #[test]
    fn out_cubic_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = Ease::OutCubic.apply(i as f64 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
        assert_close(Ease::OutCubic.apply(0.5), 0.875, 1e-12);
    }

    #[test]
    fn elastic_overshoots_then_settles() {
        let e = Ease::OutElastic {
            amplitude: 1.0,
            period: 0.5,
        };
        let peak = (1..100)
            .map(|i| e.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
        assert_close(e.apply(0.99), 1.0, 0.01);
    }

    #[test]
    fn tween_reaches_target_and_stays() {
        let mut t = Tween::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.8, Ease::OutCubic);
        let mid = t.advance(0.4);
        assert!(mid.x > 1.0 && mid.x < 2.0);
        t.advance(0.5);
        assert!(t.is_finished());
        assert_eq!(t.value(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(t.advance(1.0), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn zero_duration_jumps() {
        let mut t = Tween::new(0.0, 5.0, 0.0, Ease::Linear);
        assert!(t.is_finished());
        assert_eq!(t.advance(0.0), 5.0);
    }

    #[test]
    fn bad_deltas_do_not_move_the_tween() {
        let mut t = Tween::new(0.0, 1.0, 1.0, Ease::Linear);
        t.advance(f64::NAN);
        t.advance(-3.0);
        assert_eq!(t.value(), 0.0);
    }
}
