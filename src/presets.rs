//! Shared animation presets so every section moves the same way.
//!
//! Durations and curves are expressed once here; widgets only ask how far an
//! animation has progressed `elapsed` after its trigger.

use std::time::Duration;

use crate::animation::{Easing, EASE_IN_OUT, EASE_OUT};

/// A timed curve, optionally delayed from its trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Transition {
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    pub const fn spring(stiffness: f64, damping: f64) -> Self {
        Self::new(Duration::ZERO, Easing::Spring { stiffness, damping })
    }

    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn total(&self) -> Duration {
        self.delay + self.easing.natural_duration(self.duration)
    }

    /// Eased progress `elapsed` after the trigger, 0 while still delayed
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        let duration = self.easing.natural_duration(self.duration);
        if duration.is_zero() {
            return 1.0;
        }
        let t = (running.as_secs_f64() / duration.as_secs_f64()).min(1.0);
        self.easing.apply(t)
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.total()
    }
}

pub const SMOOTH: Transition = Transition::new(Duration::from_millis(300), EASE_IN_OUT);
pub const QUICK: Transition = Transition::new(Duration::from_millis(200), EASE_OUT);
pub const SPRING: Transition = Transition::spring(500.0, 30.0);
pub const BOUNCE: Transition = Transition::spring(400.0, 10.0);

pub mod delays {
    use std::time::Duration;

    pub const NONE: Duration = Duration::ZERO;
    pub const SHORT: Duration = Duration::from_millis(100);
    pub const MEDIUM: Duration = Duration::from_millis(200);
    pub const LONG: Duration = Duration::from_millis(300);
    pub const EXTRA_LONG: Duration = Duration::from_millis(500);
}

pub const STAGGER_CHILDREN: Duration = Duration::from_millis(100);

/// Delay for the `index`-th child of a staggered group
pub fn stagger(index: usize, step: Duration) -> Duration {
    step * index as u32
}

/// Visual properties a variant animates between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f64,
    pub scale: f64,
    pub offset_y: f64,
}

impl Pose {
    pub const REST: Pose = Pose {
        opacity: 1.0,
        scale: 1.0,
        offset_y: 0.0,
    };

    fn lerp(self, to: Pose, t: f64) -> Pose {
        Pose {
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            scale: self.scale + (to.scale - self.scale) * t,
            offset_y: self.offset_y + (to.offset_y - self.offset_y) * t,
        }
    }

    /// Terminal cells can't be half transparent: visible once mostly opaque
    pub fn is_visible(&self) -> bool {
        self.opacity >= 0.05
    }

    pub fn is_faded(&self) -> bool {
        self.opacity < 0.6
    }

    /// Vertical offset in rows, one row per 20 units of offset
    pub fn row_offset(&self) -> i32 {
        (self.offset_y / 20.0).round() as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variant {
    pub from: Pose,
    pub to: Pose,
    pub transition: Transition,
}

impl Variant {
    pub fn pose(&self, elapsed: Duration) -> Pose {
        self.from.lerp(self.to, self.transition.progress(elapsed))
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.transition.delay = delay;
        self
    }
}

pub const HOVER: Variant = Variant {
    from: Pose::REST,
    to: Pose {
        opacity: 1.0,
        scale: 1.05,
        offset_y: 0.0,
    },
    transition: Transition::new(Duration::from_millis(200), Easing::Linear),
};

pub const TAP: Variant = Variant {
    from: Pose::REST,
    to: Pose {
        opacity: 1.0,
        scale: 0.95,
        offset_y: 0.0,
    },
    transition: Transition::new(Duration::from_millis(100), Easing::Linear),
};

pub const FADE_IN: Variant = Variant {
    from: Pose {
        opacity: 0.0,
        scale: 1.0,
        offset_y: 0.0,
    },
    to: Pose::REST,
    transition: Transition::new(Duration::from_millis(500), Easing::Linear),
};

pub const SLIDE_UP: Variant = Variant {
    from: Pose {
        opacity: 0.0,
        scale: 1.0,
        offset_y: 20.0,
    },
    to: Pose::REST,
    transition: Transition::new(Duration::from_millis(300), Easing::Linear),
};

pub const SCALE_IN: Variant = Variant {
    from: Pose {
        opacity: 0.0,
        scale: 0.8,
        offset_y: 0.0,
    },
    to: Pose::REST,
    transition: Transition::new(Duration::from_millis(300), Easing::Linear),
};

/// Entry pose for one child of a staggered list
pub fn stagger_item(index: usize) -> Variant {
    SLIDE_UP.delayed(stagger(index, STAGGER_CHILDREN))
}
