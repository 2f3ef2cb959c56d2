//! Scene orchestration.
//!
//! `SimulationCore` owns the particle arena, the links and the solver; the
//! host drives it through the wasm facade, either one fixed tick at a time
//! (`step`) or with wall-clock elapsed time (`advance`, which runs a fixed
//! timestep accumulator so the Verlet dt stays constant).

mod facade;
mod perf;
mod render;

#[cfg(test)]
mod tests;

pub use facade::Simulation;
pub use perf::PerfStats;

use render::RenderBuffers;

use crate::emitter::Emitter;
use crate::link::Link;
use crate::particle::Particle;
use crate::solver::{Constraint, Solver, SolverConfig};
use crate::vec2::Vec2;

/// Elapsed time above this is clamped before stepping so a backgrounded tab
/// does not replay hundreds of catch-up ticks in one call.
const MAX_FRAME_TIME_S: f64 = 0.25;

const DEFAULT_SEED: u32 = 12345;

pub struct SimulationCore {
    solver: Solver,
    emitter: Emitter,
    particles: Vec<Particle>,
    links: Vec<Link>,
    frame: u64,
    time_accumulator: f64,
    perf_enabled: bool,
    perf_stats: PerfStats,
    render: RenderBuffers,
}

impl SimulationCore {
    pub fn new(config: SolverConfig) -> Result<Self, String> {
        Self::with_seed(config, DEFAULT_SEED)
    }

    pub fn with_seed(config: SolverConfig, seed: u32) -> Result<Self, String> {
        let bounds = match config.constraint {
            Constraint::Box { width, height } => Vec2::new(width, height),
            Constraint::Disc { center_x, center_y, radius } => {
                Vec2::new(center_x + radius, center_y + radius)
            }
        };
        let solver = Solver::new(config)?.with_seed(seed);
        Ok(Self {
            solver,
            emitter: Emitter::new(config.emitter_position, bounds, seed),
            particles: Vec::new(),
            links: Vec::new(),
            frame: 0,
            time_accumulator: 0.0,
            perf_enabled: false,
            perf_stats: PerfStats::default(),
            render: RenderBuffers::new(),
        })
    }

    pub fn from_config_json(json: &str) -> Result<Self, String> {
        Self::new(SolverConfig::from_json(json)?)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Fixed tick duration in seconds.
    pub fn dt(&self) -> f32 {
        self.solver.dt()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
    }

    /// Snapshot of the last tick (zeros while perf is disabled).
    pub fn get_perf_stats(&self) -> PerfStats {
        self.perf_stats
    }

    /// Add a fully-formed particle, returning its arena index.
    pub fn spawn(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Emit one particle at the emitter anchor. `time_s` feeds the
    /// sinusoidal emission jitter.
    pub fn spawn_emitted(&mut self, time_s: f64) -> usize {
        let p = self.emitter.emit(time_s);
        self.spawn(p)
    }

    /// Emit one particle at a random position within the scene bounds.
    pub fn spawn_random(&mut self) -> usize {
        let p = self.emitter.emit_random();
        self.spawn(p)
    }

    /// Link two existing particles at the given rest distance.
    pub fn add_link(&mut self, a: usize, b: usize, target_distance: f32) -> Result<(), String> {
        if a >= self.particles.len() || b >= self.particles.len() {
            return Err(format!(
                "link endpoints {a},{b} out of bounds for {} particles",
                self.particles.len()
            ));
        }
        self.links.push(Link::new(a, b, target_distance)?);
        Ok(())
    }

    /// Spawn a chain of linked particles between two points with static
    /// endpoints, the classic hanging-rope setup.
    pub fn spawn_chain(
        &mut self,
        from: Vec2,
        to: Vec2,
        count: usize,
        target_distance: f32,
    ) -> Result<(), String> {
        if count < 2 {
            return Err(format!("chain needs at least 2 particles, got {count}"));
        }
        let step = (to - from) / (count - 1) as f32;
        let first = self.particles.len();
        for i in 0..count {
            let position = from + step * i as f32;
            let particle = Particle::new(position, Vec2::zero(), 8.0, 1.0)?
                .with_static(i == 0 || i == count - 1);
            self.particles.push(particle);
        }
        for i in first + 1..first + count {
            self.links.push(Link::new(i - 1, i, target_distance)?);
        }
        Ok(())
    }

    /// Advance exactly one fixed tick. The clock is only read while perf
    /// metrics are enabled.
    pub fn step(&mut self) {
        let start_ms = if self.perf_enabled { perf::now_ms() } else { 0.0 };
        self.solver.update(&mut self.particles, &self.links);
        self.frame += 1;
        if self.perf_enabled {
            let stats = self.solver.stats();
            self.perf_stats = PerfStats {
                step_ms: perf::now_ms() - start_ms,
                particle_count: self.particles.len() as u32,
                link_count: self.links.len() as u32,
                collision_checks: stats.collision_checks,
                collisions_resolved: stats.collisions_resolved,
                thermal_contacts: stats.thermal_contacts,
                links_solved: stats.links_solved,
            };
        }
    }

    /// Feed wall-clock elapsed seconds; runs however many whole fixed ticks
    /// fit and banks the remainder. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_s: f64) -> u32 {
        let clamped = elapsed_s.clamp(0.0, MAX_FRAME_TIME_S);
        self.time_accumulator += clamped;
        let dt = self.solver.dt() as f64;
        let mut ticks = 0;
        while self.time_accumulator >= dt {
            self.step();
            self.time_accumulator -= dt;
            ticks += 1;
        }
        ticks
    }

    /// Scene reset: drops every particle and link.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.links.clear();
        self.frame = 0;
        self.time_accumulator = 0.0;
    }
}
