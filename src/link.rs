use crate::particle::{pair_mut, Particle};
use crate::vec2::Vec2;

/// Distances below this are treated as coincident to avoid division blowups.
const MIN_DISTANCE: f32 = 1e-6;

/// Rigid distance constraint between two particles in the arena.
///
/// Stores indices, not references: the particles live in the scene's flat
/// array and the link is a relation over it. One `apply` call is a single
/// relaxation iteration; repeated per-substep calls converge toward the
/// target distance.
#[derive(Clone, Copy, Debug)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub target_distance: f32,
}

impl Link {
    pub fn new(a: usize, b: usize, target_distance: f32) -> Result<Self, String> {
        if a == b {
            return Err(format!("link endpoints must differ, got {a} twice"));
        }
        if !(target_distance >= 0.0) || !target_distance.is_finite() {
            return Err(format!(
                "link target distance must be non-negative, got {target_distance}"
            ));
        }
        Ok(Self { a, b, target_distance })
    }

    /// Single-iteration relaxation: move both non-static endpoints half the
    /// error along the axis. Coincident endpoints fall back to a fixed +X
    /// axis so the pair separates instead of dividing by zero.
    pub fn apply(&self, particles: &mut [Particle]) {
        let (pa, pb) = pair_mut(particles, self.a, self.b);
        let axis = pa.position - pb.position;
        let distance = axis.length();
        let n = if distance < MIN_DISTANCE {
            Vec2::new(1.0, 0.0)
        } else {
            axis / distance
        };
        let delta = self.target_distance - distance;
        if !pa.is_static {
            pa.position = pa.position + n * (delta * 0.5);
        }
        if !pb.is_static {
            pb.position = pb.position - n * (delta * 0.5);
        }
    }
}
