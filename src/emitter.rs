//! Stochastic particle factory.
//!
//! Emission velocity follows a time-based sinusoidal modulation, a purely
//! cosmetic circular jitter in the emission direction. The PRNG is injected
//! at construction so tests can assert deterministic output.

use crate::color;
use crate::particle::Particle;
use crate::random::XorShift32;
use crate::vec2::Vec2;

/// Scales the sinusoidal emission velocity.
const EMIT_SPEED_FACTOR: f32 = 5.0;

/// How emitted particles are colored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Fixed HSL mapping from the particle's temperature.
    Temperature,
    /// Random bright RGB.
    Random,
}

pub struct Emitter {
    position: Vec2,
    bounds: Vec2,
    color_mode: ColorMode,
    rng: XorShift32,
}

impl Emitter {
    /// `bounds` is the region `emit_random` spawns into.
    pub fn new(position: Vec2, bounds: Vec2, seed: u32) -> Self {
        Self {
            position,
            bounds,
            color_mode: ColorMode::Temperature,
            rng: XorShift32::new(seed),
        }
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Emit one particle at the anchor with a velocity derived from the
    /// supplied wall-clock time. Always succeeds.
    pub fn emit(&mut self, time_s: f64) -> Particle {
        let modulation_x = (time_s.sin()) as f32;
        let modulation_y = (time_s.cos()) as f32;
        let velocity = Vec2::new(
            -modulation_x * EMIT_SPEED_FACTOR,
            -(modulation_y - 1.5) * EMIT_SPEED_FACTOR,
        );
        self.generate(self.position, velocity)
    }

    /// Emit one particle at a uniformly random position within the bounds,
    /// zero velocity.
    pub fn emit_random(&mut self) -> Particle {
        let x = (self.rng.next_f32() * self.bounds.x).floor();
        let y = (self.rng.next_f32() * self.bounds.y).floor();
        self.generate(Vec2::new(x, y), Vec2::zero())
    }

    fn generate(&mut self, position: Vec2, velocity: Vec2) -> Particle {
        let radius = (self.rng.next_f32() * 3.0).floor() + 1.0;
        let mass = radius;
        let temperature = self.rng.next_range(1000.0, 2000.0);
        let color = match self.color_mode {
            ColorMode::Temperature => color::temperature_color(temperature),
            ColorMode::Random => color::random_color(&mut self.rng),
        };
        Particle {
            position,
            position_prev: position - velocity,
            acceleration: Vec2::zero(),
            radius,
            mass,
            temperature,
            color,
            is_static: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_anchors_position_and_back_computes_prev() {
        let mut emitter = Emitter::new(Vec2::new(200.0, 200.0), Vec2::new(800.0, 600.0), 1);
        let p = emitter.emit(0.0);
        assert_eq!(p.position, Vec2::new(200.0, 200.0));
        // sin(0) = 0, cos(0) = 1 => velocity (0, 2.5)
        assert_eq!(p.velocity(), Vec2::new(0.0, 2.5));
        assert_eq!(p.position_prev, p.position - p.velocity());
    }

    #[test]
    fn emitted_attributes_are_in_range() {
        let mut emitter = Emitter::new(Vec2::zero(), Vec2::new(800.0, 600.0), 99);
        for _ in 0..200 {
            let p = emitter.emit(1.25);
            assert!((1.0..=3.0).contains(&p.radius));
            assert_eq!(p.mass, p.radius);
            assert!((1000.0..2000.0).contains(&p.temperature));
            assert!(!p.is_static);
        }
    }

    #[test]
    fn emit_random_stays_in_bounds() {
        let mut emitter = Emitter::new(Vec2::zero(), Vec2::new(800.0, 600.0), 5);
        for _ in 0..200 {
            let p = emitter.emit_random();
            assert!((0.0..800.0).contains(&p.position.x));
            assert!((0.0..600.0).contains(&p.position.y));
            assert_eq!(p.velocity(), Vec2::zero());
        }
    }

    #[test]
    fn same_seed_emits_identical_sequences() {
        let mut a = Emitter::new(Vec2::new(10.0, 10.0), Vec2::new(800.0, 600.0), 777);
        let mut b = Emitter::new(Vec2::new(10.0, 10.0), Vec2::new(800.0, 600.0), 777);
        for i in 0..50 {
            let t = i as f64 * 0.016;
            let pa = a.emit(t);
            let pb = b.emit(t);
            assert_eq!(pa.radius, pb.radius);
            assert_eq!(pa.temperature, pb.temperature);
            assert_eq!(pa.color, pb.color);
        }
    }

    #[test]
    fn random_mode_uses_rgb_palette() {
        let mut emitter = Emitter::new(Vec2::zero(), Vec2::new(100.0, 100.0), 3)
            .with_color_mode(ColorMode::Random);
        let p = emitter.emit_random();
        assert!(p.color & 0xff >= 55);
    }
}
