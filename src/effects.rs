use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::session::TargetColor;

const SPLAT_SYMBOLS: [char; 5] = ['*', '·', '✶', '+', '°'];
const PARTICLES_PER_SPLAT: usize = 8;
const GRAVITY: f64 = 15.0;

/// One fleck thrown off a smashed bug, in play-area cell coordinates
#[derive(Debug, Clone)]
pub struct SplatParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color: TargetColor,
    pub age: f64,
    pub max_age: f64,
}

impl SplatParticle {
    fn new<R: Rng>(x: f64, y: f64, color: TargetColor, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-5.0..-1.0),
            symbol: *SPLAT_SYMBOLS.choose(rng).unwrap_or(&'*'),
            color,
            age: 0.0,
            max_age: rng.gen_range(0.4..0.8),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }

    /// Remaining life in `[0, 1]`, used to fade the particle out
    pub fn vitality(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Short-lived bursts drawn where targets were dismissed
#[derive(Debug, Default)]
pub struct Splats {
    pub particles: Vec<SplatParticle>,
    last_frame: Option<Duration>,
}

impl Splats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn burst(&mut self, x: f64, y: f64, color: TargetColor) {
        let mut rng = rand::thread_rng();
        self.particles
            .extend((0..PARTICLES_PER_SPLAT).map(|_| SplatParticle::new(x, y, color, &mut rng)));
    }

    /// Step the physics to `now`, dropping dead or off-area particles.
    pub fn on_frame(&mut self, now: Duration, width: f64, height: f64) {
        let dt = match self.last_frame {
            Some(last) => now.saturating_sub(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        if dt == 0.0 {
            return;
        }

        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            let inside = p.x >= 0.0 && p.x < width && p.y >= 0.0 && p.y < height;
            alive && inside
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_emits_particles_at_the_hit() {
        let mut splats = Splats::new();
        assert!(!splats.is_active());
        splats.burst(10.0, 5.0, TargetColor::Violet);
        assert_eq!(splats.particles.len(), PARTICLES_PER_SPLAT);
        assert!(splats
            .particles
            .iter()
            .all(|p| p.x == 10.0 && p.y == 5.0 && p.color == TargetColor::Violet));
    }

    #[test]
    fn particles_fall_under_gravity() {
        let mut p = SplatParticle::new(10.0, 10.0, TargetColor::Amber, &mut rand::thread_rng());
        let vel_y = p.vel_y;
        assert!(p.update(0.05));
        assert!(p.vel_y > vel_y);
        assert!(p.vitality() < 1.0);
    }

    #[test]
    fn first_frame_only_sets_the_clock() {
        let mut splats = Splats::new();
        splats.burst(10.0, 5.0, TargetColor::Red);
        splats.on_frame(ms(100), 40.0, 20.0);
        assert!(splats.particles.iter().all(|p| p.age == 0.0));
    }

    #[test]
    fn bursts_die_out() {
        let mut splats = Splats::new();
        splats.burst(20.0, 10.0, TargetColor::Blue);
        splats.on_frame(ms(0), 40.0, 20.0);
        for i in 1..=20 {
            splats.on_frame(ms(i * 50), 40.0, 20.0);
        }
        assert!(!splats.is_active());
    }

    #[test]
    fn particles_leaving_the_area_are_dropped() {
        let mut splats = Splats::new();
        splats.burst(0.0, 0.0, TargetColor::Emerald);
        splats.on_frame(ms(0), 1.0, 1.0);
        splats.on_frame(ms(200), 1.0, 1.0);
        for p in &splats.particles {
            assert!(p.x >= 0.0 && p.x < 1.0 && p.y >= 0.0 && p.y < 1.0);
        }
    }
}
