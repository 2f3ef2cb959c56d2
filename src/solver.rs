//! Physics solver: the per-tick substep pipeline.
//!
//! Each `update` runs a fixed number of substeps, each performing
//! heating/cooling, force application, boundary constraint, link relaxation,
//! grid-partitioned collision resolution and Verlet integration, in that
//! order. The solver borrows the particle arena for the duration of the call
//! and retains nothing afterwards.

use serde::Deserialize;

use crate::link::Link;
use crate::particle::{pair_mut, Particle};
use crate::random::XorShift32;
use crate::spatial::SpatialGrid;
use crate::vec2::Vec2;

// 60 updates per second
const DEFAULT_UPDATE_RATE: f32 = 60.0;
const DEFAULT_SUB_STEPS: u32 = 2;
// coefficient of restitution
const DEFAULT_RESTITUTION: f32 = 0.7;
const DEFAULT_GRID_CELL_SIZE: f32 = 40.0;

/// Distances below this are treated as degenerate to avoid division blowups.
const MIN_DISTANCE: f32 = 1e-6;

/// Region particles are confined to.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Axis-aligned box with the origin at the top-left corner.
    Box { width: f32, height: f32 },
    /// Disc centered at (center_x, center_y). Particles striking the bottom
    /// of the rim gain heat, particles striking the sides lose it.
    Disc { center_x: f32, center_y: f32, radius: f32 },
}

impl Default for Constraint {
    fn default() -> Self {
        Constraint::Box { width: 800.0, height: 600.0 }
    }
}

/// Thermal constants. These were tuning values in the source experiments, so
/// they are configuration rather than hard-coded invariants.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    /// Temperatures clamp to [0, max_temperature].
    pub max_temperature: f32,
    /// Particles higher than this (smaller y) cool each substep.
    pub cooling_threshold: f32,
    /// Cooling amount is (cooling_reference - y) * cooling_rate.
    pub cooling_reference: f32,
    pub cooling_rate: f32,
    /// Heat gained per substep while touching the floor, drawn uniformly
    /// from [floor_heat_min, floor_heat_max).
    pub floor_heat_min: f32,
    pub floor_heat_max: f32,
    /// Upward convection acceleration per unit of (clamped) temperature.
    pub convection_rate: f32,
    /// Fraction of the distance to thermal equilibrium moved per contact.
    pub transmission_rate: f32,
    /// Gap beyond geometric contact within which heat still transmits.
    pub contact_epsilon: f32,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            max_temperature: 5000.0,
            cooling_threshold: 550.0,
            cooling_reference: 850.0,
            cooling_rate: 0.1,
            floor_heat_min: 50.0,
            floor_heat_max: 150.0,
            convection_rate: 1.0,
            transmission_rate: 0.01,
            contact_epsilon: 1.0,
        }
    }
}

/// Solver configuration. `gravity` has no default: a host that forgets it
/// gets a construction error, not a silently falling world. Everything else
/// falls back to the canonical tuning.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SolverConfig {
    pub gravity: Vec2,
    /// Simulation ticks per second; derives the fixed dt.
    #[serde(default = "default_update_rate")]
    pub update_rate: f32,
    #[serde(default = "default_substeps")]
    pub substeps: u32,
    /// Coefficient of restitution in [0, 1].
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    #[serde(default)]
    pub constraint: Constraint,
    /// Broad-phase cell size; must exceed the largest collision diameter.
    #[serde(default = "default_grid_cell_size")]
    pub grid_cell_size: f32,
    /// Anchor for time-driven emission.
    #[serde(default = "default_emitter_position")]
    pub emitter_position: Vec2,
    #[serde(default)]
    pub thermal: ThermalConfig,
}

fn default_update_rate() -> f32 {
    DEFAULT_UPDATE_RATE
}

fn default_substeps() -> u32 {
    DEFAULT_SUB_STEPS
}

fn default_restitution() -> f32 {
    DEFAULT_RESTITUTION
}

fn default_grid_cell_size() -> f32 {
    DEFAULT_GRID_CELL_SIZE
}

fn default_emitter_position() -> Vec2 {
    Vec2 { x: 200.0, y: 200.0 }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 800.0),
            update_rate: DEFAULT_UPDATE_RATE,
            substeps: DEFAULT_SUB_STEPS,
            restitution: DEFAULT_RESTITUTION,
            constraint: Constraint::default(),
            grid_cell_size: DEFAULT_GRID_CELL_SIZE,
            emitter_position: default_emitter_position(),
            thermal: ThermalConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: SolverConfig =
            serde_json::from_str(json).map_err(|e| format!("invalid solver config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.gravity.is_finite() {
            return Err("gravity must be finite".to_string());
        }
        if !(self.update_rate > 0.0) || !self.update_rate.is_finite() {
            return Err(format!("update_rate must be positive, got {}", self.update_rate));
        }
        if self.substeps < 1 {
            return Err("substeps must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(format!("restitution must be in [0, 1], got {}", self.restitution));
        }
        if !(self.grid_cell_size > 0.0) || !self.grid_cell_size.is_finite() {
            return Err(format!(
                "grid_cell_size must be positive, got {}",
                self.grid_cell_size
            ));
        }
        if !self.emitter_position.is_finite() {
            return Err("emitter_position must be finite".to_string());
        }
        match self.constraint {
            Constraint::Box { width, height } => {
                if !(width > 0.0) || !(height > 0.0) {
                    return Err(format!("box constraint must be positive, got {width}x{height}"));
                }
            }
            Constraint::Disc { radius, .. } => {
                if !(radius > 0.0) {
                    return Err(format!("disc constraint radius must be positive, got {radius}"));
                }
            }
        }
        let t = &self.thermal;
        if !(t.max_temperature > 0.0) {
            return Err("max_temperature must be positive".to_string());
        }
        if t.cooling_rate < 0.0 || t.convection_rate < 0.0 || t.contact_epsilon < 0.0 {
            return Err("thermal rates must be non-negative".to_string());
        }
        if !(0.0..=1.0).contains(&t.transmission_rate) {
            return Err(format!(
                "transmission_rate must be in [0, 1], got {}",
                t.transmission_rate
            ));
        }
        if t.floor_heat_min < 0.0 || t.floor_heat_max < t.floor_heat_min {
            return Err("floor heat range is invalid".to_string());
        }
        Ok(())
    }
}

/// Counters from the most recent `update` call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverStats {
    pub collision_checks: u32,
    pub collisions_resolved: u32,
    pub thermal_contacts: u32,
    pub links_solved: u32,
}

pub struct Solver {
    config: SolverConfig,
    dt: f32,
    grid: SpatialGrid,
    rng: XorShift32,
    pairs: Vec<(usize, usize)>,
    stats: SolverStats,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, String> {
        config.validate()?;
        let grid = SpatialGrid::new(config.grid_cell_size)?;
        let dt = 1.0 / config.update_rate;
        Ok(Self {
            config,
            dt,
            grid,
            rng: XorShift32::new(12345),
            pairs: Vec::new(),
            stats: SolverStats::default(),
        })
    }

    /// Reseed the floor-heating noise source.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = XorShift32::new(seed);
        self
    }

    /// Fixed tick duration in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    /// Advance one tick. Mutates particle state in place; the borrow ends
    /// when the call returns.
    pub fn update(&mut self, particles: &mut [Particle], links: &[Link]) {
        self.stats = SolverStats::default();
        let sub_dt = self.dt / self.config.substeps as f32;
        for _ in 0..self.config.substeps {
            self.apply_cooling_and_heating(particles);
            self.apply_gravity(particles);
            self.apply_convection(particles);
            self.apply_constraint(particles);
            self.solve_links(particles, links);
            self.solve_collisions_grid(particles);
            integrate(sub_dt, particles);
        }
    }

    /// Cooling high up, stochastic heating at the box floor. Both clamp to
    /// [0, max_temperature].
    fn apply_cooling_and_heating(&mut self, particles: &mut [Particle]) {
        let t = self.config.thermal;
        for p in particles.iter_mut() {
            if p.position.y < t.cooling_threshold {
                let d_temp = (t.cooling_reference - p.position.y) * t.cooling_rate;
                p.temperature = (p.temperature - d_temp).max(0.0);
            }
            if let Constraint::Box { height, .. } = self.config.constraint {
                if p.position.y + p.radius >= height {
                    let d_temp = self.rng.next_range(t.floor_heat_min, t.floor_heat_max);
                    p.temperature = (p.temperature + d_temp).min(t.max_temperature);
                }
            }
        }
    }

    fn apply_gravity(&self, particles: &mut [Particle]) {
        for p in particles.iter_mut() {
            p.accelerate(self.config.gravity);
        }
    }

    /// Hot particles rise: upward acceleration proportional to clamped
    /// temperature. This couples the thermal and mechanical subsystems.
    fn apply_convection(&self, particles: &mut [Particle]) {
        let t = self.config.thermal;
        for p in particles.iter_mut() {
            let force = p.temperature.min(t.max_temperature) * t.convection_rate;
            p.accelerate(Vec2::new(0.0, -force));
        }
    }

    fn apply_constraint(&self, particles: &mut [Particle]) {
        match self.config.constraint {
            Constraint::Box { width, height } => {
                apply_constraint_box(particles, width, height)
            }
            Constraint::Disc { center_x, center_y, radius } => {
                self.apply_constraint_disc(particles, Vec2::new(center_x, center_y), radius)
            }
        }
    }

    /// Project escapees back onto the disc rim. The rim doubles as a heat
    /// exchanger: the vertical extremes heat, the horizontal sides cool.
    fn apply_constraint_disc(&self, particles: &mut [Particle], center: Vec2, radius: f32) {
        let t = self.config.thermal;
        for p in particles.iter_mut() {
            if p.is_static {
                continue;
            }
            let to_obj = p.position - center;
            let distance = to_obj.length();
            if distance > radius - p.radius {
                let n = to_obj / distance.max(MIN_DISTANCE);
                p.position = center + n * (radius - p.radius);
                let angle = to_obj.x.atan2(to_obj.y);
                if angle.sin().abs() < 0.01 {
                    p.temperature = (p.temperature + 100.0).min(t.max_temperature);
                }
                if angle.sin().abs() > 0.95 {
                    p.temperature = (p.temperature - 10.0).max(0.0);
                }
            }
        }
    }

    fn solve_links(&mut self, particles: &mut [Particle], links: &[Link]) {
        for link in links {
            link.apply(particles);
        }
        self.stats.links_solved += links.len() as u32;
    }

    /// Broad phase: rebuild the disposable grid from current positions, then
    /// run the narrow phase over candidate pairs only.
    fn solve_collisions_grid(&mut self, particles: &mut [Particle]) {
        if particles.len() < 2 {
            return;
        }
        self.grid.rebuild(particles);
        let mut pairs = std::mem::take(&mut self.pairs);
        pairs.clear();
        self.grid
            .for_each_candidate_pair(particles, |i, j| pairs.push((i, j)));
        for &(i, j) in &pairs {
            self.solve_collision(particles, i, j);
        }
        self.pairs = pairs;
    }

    /// Narrow phase for one pair. Overlap resolves mechanically; a
    /// near-touching gap within `contact_epsilon` still exchanges heat.
    pub fn solve_collision(&mut self, particles: &mut [Particle], i: usize, j: usize) {
        if i == j {
            return;
        }
        self.stats.collision_checks += 1;
        let (pa, pb) = pair_mut(particles, i, j);
        let mut axis = pa.position - pb.position;
        if axis.x == 0.0 && axis.y == 0.0 {
            // Coincident centers: arbitrary but deterministic separation axis.
            axis = Vec2::new(1.0, 0.0);
        }
        let distance = axis.length().max(MIN_DISTANCE);
        let contact = pa.radius + pb.radius;
        if distance < contact {
            if pa.mass > 0.0 && pb.mass > 0.0 {
                solve_collision_inelastic(self.config.restitution, pa, pb, axis, distance);
            } else {
                solve_collision_simple(pa, pb, axis, distance);
            }
            self.stats.collisions_resolved += 1;
        } else if distance <= contact + self.config.thermal.contact_epsilon {
            transmit_temperature(self.config.thermal.transmission_rate, pa, pb);
            self.stats.thermal_contacts += 1;
        }
    }
}

fn integrate(dt: f32, particles: &mut [Particle]) {
    for p in particles.iter_mut() {
        p.update_position(dt);
    }
}

/// Clamp positions into the box, accounting for radius. Static particles are
/// left where the scene put them.
pub fn apply_constraint_box(particles: &mut [Particle], width: f32, height: f32) {
    for p in particles.iter_mut() {
        if p.is_static {
            continue;
        }
        if p.position.y + p.radius > height {
            p.position.y = height - p.radius;
        }
        if p.position.y - p.radius < 0.0 {
            p.position.y = p.radius;
        }
        if p.position.x - p.radius < 0.0 {
            p.position.x = p.radius;
        }
        if p.position.x + p.radius > width {
            p.position.x = width - p.radius;
        }
    }
}

/// Non-physical positional push-apart: each non-static particle moves half
/// the overlap along the axis. Used directly for massless fixtures and as
/// the positional half of the impulse response.
pub fn solve_collision_simple(a: &mut Particle, b: &mut Particle, axis: Vec2, distance: f32) {
    let delta = a.radius + b.radius - distance;
    let n = axis / distance;
    if !a.is_static {
        a.position = a.position + n * (delta * 0.5);
    }
    if !b.is_static {
        b.position = b.position - n * (delta * 0.5);
    }
}

/// Inelastic impulse response parameterized by the restitution coefficient.
///
/// Implicit velocities are decomposed along the collision normal, the 1-D
/// restitution formula produces the post-collision normal components, and
/// `position_prev` is rebuilt so the next Verlet step carries the new
/// velocity. Static particles keep both position and velocity.
pub fn solve_collision_inelastic(
    restitution: f32,
    a: &mut Particle,
    b: &mut Particle,
    axis: Vec2,
    distance: f32,
) {
    let vel_a = a.velocity();
    let vel_b = b.velocity();

    let un = axis / distance;
    let ut = Vec2::new(-un.y, un.x);

    let van = un.dot(vel_a);
    let vat = ut.dot(vel_a);
    let vbn = un.dot(vel_b);
    let vbt = ut.dot(vel_b);

    // Separate first so the pair no longer intersects.
    solve_collision_simple(a, b, axis, distance);

    let inv_total = 1.0 / (a.mass + b.mass);
    if !a.is_static {
        let van_next = (restitution * b.mass * (vbn - van) + a.mass * van + b.mass * vbn) * inv_total;
        let va = un * van_next + ut * vat;
        a.position_prev = a.position - va;
    }
    if !b.is_static {
        let vbn_next = (restitution * a.mass * (van - vbn) + a.mass * van + b.mass * vbn) * inv_total;
        let vb = un * vbn_next + ut * vbt;
        b.position_prev = b.position - vb;
    }
}

/// Rate-limited heat diffusion. `mass * temperature` is the conserved
/// quantity; each contact nudges both particles a fraction of the way toward
/// the fully-mixed equilibrium.
pub fn transmit_temperature(rate: f32, a: &mut Particle, b: &mut Particle) {
    let total_mass = a.mass + b.mass;
    if total_mass <= 0.0 {
        return;
    }
    let equilibrium = (a.mass * a.temperature + b.mass * b.temperature) / total_mass;
    a.temperature += (equilibrium - a.temperature) * rate;
    b.temperature += (equilibrium - b.temperature) * rate;
}
