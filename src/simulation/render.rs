//! Render extraction: flat buffers the JS host reads by pointer.
//!
//! The host renders straight from wasm memory, so particle state is copied
//! into tightly-packed arrays once per frame instead of crossing the ABI per
//! particle.

use super::SimulationCore;

pub(super) struct RenderBuffers {
    /// Interleaved x,y pairs.
    pub positions: Vec<f32>,
    pub radii: Vec<f32>,
    pub colors: Vec<u32>,
    pub temperatures: Vec<f32>,
}

impl RenderBuffers {
    pub(super) fn new() -> Self {
        Self {
            positions: Vec::new(),
            radii: Vec::new(),
            colors: Vec::new(),
            temperatures: Vec::new(),
        }
    }

    pub(super) fn clear(&mut self) {
        self.positions.clear();
        self.radii.clear();
        self.colors.clear();
        self.temperatures.clear();
    }
}

impl SimulationCore {
    /// Copy particle state into the render buffers. Returns the particle
    /// count the buffers now describe.
    pub fn sync_render_buffers(&mut self) -> usize {
        self.render.clear();
        for p in &self.particles {
            self.render.positions.push(p.position.x);
            self.render.positions.push(p.position.y);
            self.render.radii.push(p.radius);
            self.render.colors.push(p.color);
            self.render.temperatures.push(p.temperature);
        }
        self.particles.len()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.render.positions.as_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.render.positions.len()
    }

    pub fn radii_ptr(&self) -> *const f32 {
        self.render.radii.as_ptr()
    }

    pub fn radii_len(&self) -> usize {
        self.render.radii.len()
    }

    pub fn colors_ptr(&self) -> *const u32 {
        self.render.colors.as_ptr()
    }

    pub fn colors_len(&self) -> usize {
        self.render.colors.len()
    }

    pub fn temperatures_ptr(&self) -> *const f32 {
        self.render.temperatures.as_ptr()
    }

    pub fn temperatures_len(&self) -> usize {
        self.render.temperatures.len()
    }
}
