use wasm_bindgen::prelude::*;

use super::perf::PerfStats;
use super::SimulationCore;
use crate::vec2::Vec2;

/// JS-facing wrapper around `SimulationCore`.
///
/// The host owns pacing: it calls `advance` (or `step`) from its animation
/// loop, then `sync_render_buffers` and the pointer getters to draw straight
/// from wasm memory.
#[wasm_bindgen]
pub struct Simulation {
    core: SimulationCore,
}

#[wasm_bindgen]
impl Simulation {
    /// Build from a JSON solver config; rejects invalid configuration
    /// instead of simulating NaNs later.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: String) -> Result<Simulation, JsValue> {
        let core = SimulationCore::from_config_json(&config_json)
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(Self { core })
    }

    #[wasm_bindgen(js_name = newWithSeed)]
    pub fn new_with_seed(config_json: String, seed: u32) -> Result<Simulation, JsValue> {
        let config = crate::solver::SolverConfig::from_json(&config_json)
            .map_err(|e| JsValue::from_str(&e))?;
        let core = SimulationCore::with_seed(config, seed).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 {
        self.core.particle_count() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn link_count(&self) -> u32 {
        self.core.link_count() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.core.frame()
    }

    /// Fixed tick duration in seconds.
    #[wasm_bindgen(getter)]
    pub fn dt(&self) -> f32 {
        self.core.dt()
    }

    /// Advance exactly one fixed tick.
    pub fn step(&mut self) {
        self.core.step();
    }

    /// Feed elapsed wall-clock seconds; returns how many fixed ticks ran.
    /// Oversized elapsed values (backgrounded tab) are clamped.
    pub fn advance(&mut self, elapsed_s: f64) -> u32 {
        self.core.advance(elapsed_s)
    }

    /// Emit one particle at the emitter anchor; returns its index.
    pub fn spawn_emitted(&mut self, time_s: f64) -> u32 {
        self.core.spawn_emitted(time_s) as u32
    }

    /// Emit one particle at a random in-bounds position; returns its index.
    pub fn spawn_random(&mut self) -> u32 {
        self.core.spawn_random() as u32
    }

    /// Link two existing particles at the given rest distance.
    pub fn add_link(&mut self, a: u32, b: u32, target_distance: f32) -> Result<(), JsValue> {
        self.core
            .add_link(a as usize, b as usize, target_distance)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Spawn a linked chain with static endpoints between two points.
    pub fn spawn_chain(
        &mut self,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
        count: u32,
        target_distance: f32,
    ) -> Result<(), JsValue> {
        self.core
            .spawn_chain(
                Vec2::new(from_x, from_y),
                Vec2::new(to_x, to_y),
                count as usize,
                target_distance,
            )
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Scene reset: drops every particle and link.
    pub fn clear(&mut self) {
        self.core.clear();
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead).
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Snapshot of the last tick (zeros while perf is disabled).
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    /// Refresh the flat render buffers; returns the particle count.
    pub fn sync_render_buffers(&mut self) -> u32 {
        self.core.sync_render_buffers() as u32
    }

    /// Pointer to interleaved x,y position pairs (for JS rendering).
    pub fn positions_ptr(&self) -> *const f32 {
        self.core.positions_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.core.positions_len()
    }

    pub fn radii_ptr(&self) -> *const f32 {
        self.core.radii_ptr()
    }

    pub fn radii_len(&self) -> usize {
        self.core.radii_len()
    }

    /// Pointer to packed 0x00RRGGBB colors.
    pub fn colors_ptr(&self) -> *const u32 {
        self.core.colors_ptr()
    }

    pub fn colors_len(&self) -> usize {
        self.core.colors_len()
    }

    pub fn temperatures_ptr(&self) -> *const f32 {
        self.core.temperatures_ptr()
    }

    pub fn temperatures_len(&self) -> usize {
        self.core.temperatures_len()
    }
}
