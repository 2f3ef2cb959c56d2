//! Verlet Engine - 2D particle physics in WASM
//!
//! A position-based particle simulation: Verlet integration with fixed-dt
//! substepping, rigid distance links, box/disc boundary constraints, a
//! spatial-hash collision broad phase and a thermal subsystem (floor
//! heating, altitude cooling, convection, contact heat transfer).
//!
//! Architecture:
//! - `vec2`, `particle`, `link` - value types and the Verlet step
//! - `emitter`, `color`, `random` - stochastic particle factory
//! - `spatial`, `solver` - broad phase and the substep pipeline
//! - `simulation` - scene orchestration and the wasm facade
//!
//! The host drives everything: it calls `Simulation.advance` from its
//! animation loop and renders from the flat buffers this crate exposes.

pub mod color;
pub mod emitter;
pub mod link;
pub mod particle;
pub mod random;
pub mod simulation;
pub mod solver;
pub mod spatial;
pub mod vec2;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"verlet-engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use emitter::{ColorMode, Emitter};
pub use link::Link;
pub use particle::Particle;
pub use random::XorShift32;
pub use simulation::{PerfStats, Simulation, SimulationCore};
pub use solver::{Constraint, Solver, SolverConfig, SolverStats, ThermalConfig};
pub use vec2::Vec2;
