use crate::vec2::Vec2;

/// A point mass integrated with position-based Verlet steps.
///
/// Velocity is never stored: it is implicit in `position - position_prev`.
/// Constraints and collisions mutate `position` (and, for impulse responses,
/// rewrite `position_prev`), which changes the velocity the next integration
/// step derives.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub position_prev: Vec2,
    pub acceleration: Vec2,
    pub radius: f32,
    /// Mass in arbitrary units. Zero marks a massless fixture: collisions
    /// against it fall back to the positional push-apart.
    pub mass: f32,
    pub temperature: f32,
    /// Packed 0x00RRGGBB display attribute, opaque to the solver.
    pub color: u32,
    /// Static particles are never moved by forces, constraints or collisions.
    pub is_static: bool,
}

impl Particle {
    /// Build a particle with an initial velocity expressed in units per
    /// substep. `position_prev` is back-computed so the first integration
    /// step reproduces exactly this velocity.
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, mass: f32) -> Result<Self, String> {
        if !position.is_finite() || !velocity.is_finite() {
            return Err("particle position/velocity must be finite".to_string());
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(format!("particle radius must be positive, got {radius}"));
        }
        if !(mass >= 0.0) || !mass.is_finite() {
            return Err(format!("particle mass must be non-negative, got {mass}"));
        }
        Ok(Self {
            position,
            position_prev: position - velocity,
            acceleration: Vec2::zero(),
            radius,
            mass,
            temperature: 0.0,
            color: 0x00ff_ffff,
            is_static: false,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.max(0.0);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Accumulate a force contribution for this substep. Callers may stack
    /// several sources (gravity, convection); order does not matter.
    #[inline]
    pub fn accelerate(&mut self, a: Vec2) {
        self.acceleration = self.acceleration + a;
    }

    /// The implicit velocity, in units per substep.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.position_prev
    }

    /// One Verlet step. Requires the same `dt` every substep, otherwise the
    /// implicit-velocity derivation is corrupted.
    pub fn update_position(&mut self, dt: f32) {
        if self.is_static {
            self.acceleration = Vec2::zero();
            return;
        }
        let velocity = self.position - self.position_prev;
        self.position_prev = self.position;
        self.position = self.position + velocity + self.acceleration * (dt * dt);
        self.acceleration = Vec2::zero();
    }
}

/// Mutable access to two distinct arena slots at once.
///
/// Panics if `i == j` or either index is out of bounds; callers validate
/// indices when links are created and the broad phase never emits `i == j`.
pub fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = particles.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = particles.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
