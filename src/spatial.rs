//! Broad-phase spatial hash for collision candidate pairs.
//!
//! One flat map keyed by packed `(cell_x, cell_y)` coordinates. The grid is a
//! disposable index: rebuilt from current positions every substep and never
//! read across substep boundaries.

use std::collections::HashMap;

use crate::particle::Particle;
use crate::vec2::Vec2;

/// Pack signed cell coordinates into a single map key.
#[inline]
fn pack_key(cx: i32, cy: i32) -> u64 {
    ((cx as u32 as u64) << 32) | (cy as u32 as u64)
}

pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<u64, Vec<usize>>,
}

impl SpatialGrid {
    /// `cell_size` must exceed the largest collision diameter so particles
    /// farther apart than one cell can never collide.
    pub fn new(cell_size: f32) -> Result<Self, String> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(format!("grid cell size must be positive, got {cell_size}"));
        }
        Ok(Self { cell_size, cells: HashMap::new() })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn cell_of(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Bucket every particle index by its current cell. O(n).
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.cells.clear();
        for (i, p) in particles.iter().enumerate() {
            let (cx, cy) = self.cell_of(p.position);
            self.cells.entry(pack_key(cx, cy)).or_default().push(i);
        }
    }

    /// Visit every candidate pair exactly once.
    ///
    /// Walks particles in arena order and pairs each against higher-indexed
    /// members of its 3x3 cell neighborhood. Iterating by particle index
    /// rather than by map entry keeps the pair order independent of the
    /// hasher, so runs are reproducible.
    pub fn for_each_candidate_pair<F>(&self, particles: &[Particle], mut f: F)
    where
        F: FnMut(usize, usize),
    {
        for (i, p) in particles.iter().enumerate() {
            let (cx, cy) = self.cell_of(p.position);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(members) = self.cells.get(&pack_key(cx + dx, cy + dy)) {
                        for &j in members {
                            if j > i {
                                f(i, j);
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::zero(), 4.0, 1.0).unwrap()
    }

    fn pairs_of(grid: &mut SpatialGrid, particles: &[Particle]) -> Vec<(usize, usize)> {
        grid.rebuild(particles);
        let mut pairs = Vec::new();
        grid.for_each_candidate_pair(particles, |i, j| pairs.push((i, j)));
        pairs
    }

    #[test]
    fn new_rejects_non_positive_cell_size() {
        assert!(SpatialGrid::new(0.0).is_err());
        assert!(SpatialGrid::new(-1.0).is_err());
        assert!(SpatialGrid::new(f32::NAN).is_err());
    }

    #[test]
    fn same_cell_pair_visited_once() {
        let mut grid = SpatialGrid::new(40.0).unwrap();
        let particles = vec![particle_at(10.0, 10.0), particle_at(12.0, 10.0)];
        assert_eq!(pairs_of(&mut grid, &particles), vec![(0, 1)]);
    }

    #[test]
    fn adjacent_cell_pair_is_a_candidate() {
        let mut grid = SpatialGrid::new(40.0).unwrap();
        // Straddling the x=40 cell boundary, 4 units apart.
        let particles = vec![particle_at(38.0, 10.0), particle_at(42.0, 10.0)];
        assert_eq!(pairs_of(&mut grid, &particles), vec![(0, 1)]);
    }

    #[test]
    fn distant_pair_is_not_a_candidate() {
        let mut grid = SpatialGrid::new(40.0).unwrap();
        let particles = vec![particle_at(10.0, 10.0), particle_at(200.0, 200.0)];
        assert!(pairs_of(&mut grid, &particles).is_empty());
    }

    #[test]
    fn negative_coordinates_bucket_correctly() {
        let mut grid = SpatialGrid::new(40.0).unwrap();
        // Cells (-1, -1) and (0, 0) are diagonal neighbors.
        let particles = vec![particle_at(-2.0, -2.0), particle_at(2.0, 2.0)];
        assert_eq!(pairs_of(&mut grid, &particles), vec![(0, 1)]);
    }

    #[test]
    fn rebuild_discards_previous_index() {
        let mut grid = SpatialGrid::new(40.0).unwrap();
        let close = vec![particle_at(10.0, 10.0), particle_at(12.0, 10.0)];
        assert_eq!(pairs_of(&mut grid, &close).len(), 1);
        let far = vec![particle_at(10.0, 10.0), particle_at(500.0, 500.0)];
        assert!(pairs_of(&mut grid, &far).is_empty());
    }
}
