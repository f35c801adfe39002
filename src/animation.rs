use std::time::Duration;

/// Timing curves mapping linear progress in `[0, 1]` to eased progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseInOutCubic,
    /// CSS style cubic bezier with fixed end points (0,0) and (1,1)
    CubicBezier(f64, f64, f64, f64),
    /// Unit mass damped spring released from 0 towards 1
    Spring {
        stiffness: f64,
        damping: f64,
    },
}

pub const EASE_IN_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);
pub const EASE_OUT: Easing = Easing::CubicBezier(0.0, 0.0, 0.58, 1.0);

impl Easing {
    /// Eased value for linear progress `t`. Springs read `t` as a fraction of
    /// their settle time and may overshoot 1 before coming to rest.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
            Easing::Spring { stiffness, damping } => {
                if t >= 1.0 {
                    1.0
                } else {
                    spring_position(
                        stiffness,
                        damping,
                        t * spring_settle_secs(stiffness, damping),
                    )
                }
            }
        }
    }

    /// How long the curve naturally runs; springs decide this themselves.
    pub fn natural_duration(self, requested: Duration) -> Duration {
        match self {
            Easing::Spring { stiffness, damping } => {
                Duration::from_secs_f64(spring_settle_secs(stiffness, damping))
            }
            _ => requested,
        }
    }
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

fn bezier_component(a1: f64, a2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
}

fn bezier_slope(a1: f64, a2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x <= 0.0 || x >= 1.0 {
        return x;
    }

    // newton first, bisection when the slope flattens out
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(x1, x2, s) - x;
        if err.abs() < 1e-7 {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..50 {
        let value = bezier_component(x1, x2, s);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_component(y1, y2, s)
}

fn spring_position(stiffness: f64, damping: f64, secs: f64) -> f64 {
    let w0 = stiffness.sqrt();
    let zeta = damping / (2.0 * w0);
    if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * w0 * secs).exp();
        1.0 - envelope * ((wd * secs).cos() + (zeta * w0 / wd) * (wd * secs).sin())
    } else {
        // overdamped springs are treated as critically damped
        1.0 - (-w0 * secs).exp() * (1.0 + w0 * secs)
    }
}

/// Time until the oscillation envelope falls under 0.1%
fn spring_settle_secs(stiffness: f64, damping: f64) -> f64 {
    let w0 = stiffness.sqrt();
    let zeta = damping / (2.0 * w0);
    let decay = if zeta < 1.0 { zeta * w0 } else { w0 };
    1000f64.ln() / decay
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub done: bool,
}

/// Interpolates a value over time. The clock starts on the first sample, the
/// same way a frame callback learns its start time from the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
    started_at: Option<Duration>,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: easing.natural_duration(duration),
            easing,
            started_at: None,
        }
    }

    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    pub fn sample(&mut self, now: Duration) -> Sample {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(started_at);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            return Sample {
                value: self.to,
                done: true,
            };
        }
        Sample {
            value: self.from + (self.to - self.from) * self.easing.apply(progress),
            done: false,
        }
    }
}
