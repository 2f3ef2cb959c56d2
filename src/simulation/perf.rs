use wasm_bindgen::prelude::*;

/// Millisecond clock reading for step timing. `std::time::Instant` is
/// unavailable on wasm32, so the wasm path goes through `js_sys`.
#[cfg(target_arch = "wasm32")]
pub(super) fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Snapshot of the last tick, for the host's debug overlay.
#[wasm_bindgen]
#[derive(Clone, Copy, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) particle_count: u32,
    pub(super) link_count: u32,
    pub(super) collision_checks: u32,
    pub(super) collisions_resolved: u32,
    pub(super) thermal_contacts: u32,
    pub(super) links_solved: u32,
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.particle_count }
    #[wasm_bindgen(getter)]
    pub fn link_count(&self) -> u32 { self.link_count }
    #[wasm_bindgen(getter)]
    pub fn collision_checks(&self) -> u32 { self.collision_checks }
    #[wasm_bindgen(getter)]
    pub fn collisions_resolved(&self) -> u32 { self.collisions_resolved }
    #[wasm_bindgen(getter)]
    pub fn thermal_contacts(&self) -> u32 { self.thermal_contacts }
    #[wasm_bindgen(getter)]
    pub fn links_solved(&self) -> u32 { self.links_solved }
}
