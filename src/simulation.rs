// --- File: simulation.rs ---
use crate::config::{EffectConfig, ParticleConfig};
use crate::flow_field::{FlowField, FlowFieldError};
use crate::particle::Particle;
use crate::raster::Rasterizer;
use crate::surface::DrawingSurface;
use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::dpi::PhysicalSize;

pub type SimRng = StdRng;

/// Fixed-size population of particles steering through a shared field.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    count: usize,
    config: ParticleConfig,
    rng: SimRng,
}

impl ParticleSystem {
    /// Empty until the first field build is announced via [`Self::on_field_rebuilt`].
    pub fn new(count: usize, config: ParticleConfig, rng: SimRng) -> Self {
        Self {
            particles: Vec::with_capacity(count),
            count,
            config,
            rng,
        }
    }

    /// Called once a field has been (re)built. Recreates the whole population with fresh
    /// traits, then resets every particle onto the new field.
    pub fn on_field_rebuilt(&mut self, field: &FlowField) {
        self.particles.clear();
        for _ in 0..self.count {
            self.particles
                .push(Particle::spawn(&mut self.rng, field, &self.config));
        }

        let attempts = self.config.reset_attempts;
        let mut in_glyph = 0;
        for particle in &mut self.particles {
            if particle.reset(field, &mut self.rng, attempts) {
                in_glyph += 1;
            }
        }
        log::debug!("Seeded {} particles, {} inside the glyph", self.count, in_glyph);
        if in_glyph == 0 && self.count > 0 {
            log::warn!("No particle found a glyph cell; the glyph may not fit the canvas");
        }
    }

    /// Draws each trail, then advances that particle one step.
    pub fn draw_and_step(&mut self, field: &FlowField, surface: &mut dyn DrawingSurface) {
        let attempts = self.config.reset_attempts;
        for particle in &mut self.particles {
            particle.draw(surface);
            particle.step(field, &mut self.rng, attempts);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// The effect as a whole: canvas size, flow field, population and debug overlay.
pub struct SimulationState {
    config: EffectConfig,
    rasterizer: Box<dyn Rasterizer>,
    canvas_size: PhysicalSize<u32>,
    field: FlowField,
    particles: ParticleSystem,
    debug: bool,
    // Latest resize not yet applied; later requests replace earlier ones.
    pending_resize: Option<PhysicalSize<u32>>,
}

impl SimulationState {
    pub fn new(
        window_size: PhysicalSize<u32>,
        config: EffectConfig,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Result<Self, FlowFieldError> {
        Self::with_rng(window_size, config, rasterizer, SimRng::from_entropy())
    }

    pub fn with_rng(
        window_size: PhysicalSize<u32>,
        config: EffectConfig,
        rasterizer: Box<dyn Rasterizer>,
        rng: SimRng,
    ) -> Result<Self, FlowFieldError> {
        let field = FlowField::new(
            window_size.width,
            window_size.height,
            config.initial_cell_size,
            rasterizer.as_ref(),
            &config.glyph,
        )?;
        let mut particles = ParticleSystem::new(config.particle_count, config.particle.clone(), rng);
        particles.on_field_rebuilt(&field);

        Ok(Self {
            config,
            rasterizer,
            canvas_size: window_size,
            field,
            particles,
            debug: false,
            pending_resize: None,
        })
    }

    /// Queues a resize for the start of the next frame. Zero-sized windows are ignored.
    pub fn request_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.pending_resize = Some(new_size);
        }
    }

    /// Rebuilds the field for `new_size` and repopulates. On error nothing changes.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) -> Result<(), FlowFieldError> {
        self.field.resize(
            new_size.width,
            new_size.height,
            self.rasterizer.as_ref(),
            &self.config.glyph,
        )?;
        self.canvas_size = new_size;
        self.particles.on_field_rebuilt(&self.field);
        log::info!(
            "Resized canvas to {}x{} (effective {}x{}, cell size {})",
            new_size.width,
            new_size.height,
            self.field.width(),
            self.field.height(),
            self.field.cell_size()
        );
        Ok(())
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        log::info!("Debug overlay {}", if self.debug { "on" } else { "off" });
    }

    /// One animation frame: apply any pending resize, clear, overlay, draw and step.
    pub fn frame(&mut self, surface: &mut dyn DrawingSurface) -> Result<(), FlowFieldError> {
        if let Some(new_size) = self.pending_resize.take() {
            self.resize(new_size)?;
        }
        surface.clear_rect(
            0.0,
            0.0,
            self.canvas_size.width as f32,
            self.canvas_size.height as f32,
        );
        self.render(surface);
        Ok(())
    }

    pub fn render(&mut self, surface: &mut dyn DrawingSurface) {
        if self.debug {
            self.field.draw_grid(surface);
            self.field.draw_glyph(surface);
        }
        self.particles.draw_and_step(&self.field, surface);
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }

    pub fn canvas_size(&self) -> PhysicalSize<u32> {
        self.canvas_size
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BitmapTextRasterizer;
    use crate::test_support::{Op, RecordingSurface, SolidRasterizer};

    fn config(particle_count: usize) -> EffectConfig {
        EffectConfig {
            particle_count,
            ..EffectConfig::default()
        }
    }

    fn state(width: u32, height: u32, particle_count: usize) -> SimulationState {
        SimulationState::with_rng(
            PhysicalSize::new(width, height),
            config(particle_count),
            Box::new(SolidRasterizer([120, 60, 200, 255])),
            SimRng::seed_from_u64(11),
        )
        .expect("valid canvas")
    }

    #[test]
    fn startup_builds_field_and_seeds_population() {
        let state = state(800, 600, 1000);
        let field = state.field();
        assert_eq!((field.cols(), field.rows()), (160, 120));
        assert_eq!(field.cells().len(), 160 * 120);
        assert_eq!(state.particles().len(), 1000);
        for p in state.particles() {
            assert_eq!(p.trail.len(), 1);
            assert_eq!(p.life_timer, 2 * p.max_trail_length as i32);
            // Every cell is in the glyph, so every reset lands on a cell origin.
            assert_eq!(p.position, field.cell_at(p.position).unwrap().origin());
        }
    }

    #[test]
    fn startup_rejects_degenerate_canvas() {
        let result = SimulationState::with_rng(
            PhysicalSize::new(4, 4),
            config(10),
            Box::new(SolidRasterizer([0, 0, 0, 255])),
            SimRng::seed_from_u64(1),
        );
        assert!(matches!(
            result,
            Err(FlowFieldError::NoCommonCellSize { .. })
        ));
    }

    #[test]
    fn frame_clears_then_draws_every_particle() {
        let mut state = state(100, 50, 25);
        let mut surface = RecordingSurface::default();
        state.frame(&mut surface).unwrap();
        assert_eq!(surface.ops[0], Op::ClearRect(0.0, 0.0, 100.0, 50.0));
        assert_eq!(surface.count(|op| *op == Op::Stroke), 25);
        assert_eq!(surface.count(|op| matches!(op, Op::DrawRaster(..))), 0);
    }

    #[test]
    fn debug_overlay_draws_grid_and_glyph_before_particles() {
        let mut state = state(100, 50, 3);
        state.toggle_debug();
        assert!(state.is_debug());
        let mut surface = RecordingSurface::default();
        state.frame(&mut surface).unwrap();

        // 20 columns + 10 rows of grid, then one trail per particle.
        assert_eq!(surface.count(|op| *op == Op::Stroke), 30 + 3);
        let raster_at = surface
            .ops
            .iter()
            .position(|op| *op == Op::DrawRaster(100, 50))
            .expect("glyph overlay");
        let last_restore = surface.ops.iter().rposition(|op| *op == Op::Restore).unwrap();
        assert!(last_restore < raster_at);

        state.toggle_debug();
        let mut surface = RecordingSurface::default();
        state.frame(&mut surface).unwrap();
        assert_eq!(surface.count(|op| *op == Op::Save), 0);
    }

    #[test]
    fn resize_rebuilds_field_and_recreates_population() {
        let mut state = state(100, 50, 40);
        state.resize(PhysicalSize::new(60, 40)).unwrap();
        assert_eq!(state.canvas_size(), PhysicalSize::new(60, 40));
        let field = state.field();
        assert_eq!(field.cells().len(), (field.cols() * field.rows()) as usize);
        assert_eq!(state.particles().len(), 40);
        for p in state.particles() {
            assert_eq!(p.trail.len(), 1);
            assert!(p.position.x < 60.0 && p.position.y < 40.0);
        }
    }

    #[test]
    fn failed_resize_leaves_state_untouched() {
        let mut state = state(100, 50, 5);
        let before: Vec<_> = state.particles().iter().map(|p| p.position).collect();
        assert!(state.resize(PhysicalSize::new(3, 3)).is_err());
        assert_eq!(state.canvas_size(), PhysicalSize::new(100, 50));
        assert_eq!(state.field().cells().len(), 200);
        let after: Vec<_> = state.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn queued_resizes_coalesce_to_the_last() {
        let mut state = state(100, 50, 5);
        state.request_resize(PhysicalSize::new(300, 200));
        state.request_resize(PhysicalSize::new(0, 200));
        state.request_resize(PhysicalSize::new(80, 40));
        assert!(state.has_pending_resize());

        let mut surface = RecordingSurface::default();
        state.frame(&mut surface).unwrap();
        assert!(!state.has_pending_resize());
        assert_eq!(state.canvas_size(), PhysicalSize::new(80, 40));
        assert_eq!((state.field().width(), state.field().height()), (80, 40));
        assert_eq!(surface.ops[0], Op::ClearRect(0.0, 0.0, 80.0, 40.0));
    }

    #[test]
    fn zero_sized_resize_request_is_ignored() {
        let mut state = state(100, 50, 5);
        state.request_resize(PhysicalSize::new(0, 0));
        assert!(!state.has_pending_resize());
    }

    #[test]
    fn trails_stay_bounded_across_many_frames() {
        let mut state = SimulationState::with_rng(
            PhysicalSize::new(400, 200),
            config(200),
            Box::new(BitmapTextRasterizer),
            SimRng::seed_from_u64(3),
        )
        .unwrap();
        let mut surface = RecordingSurface::default();
        for _ in 0..300 {
            surface.ops.clear();
            state.frame(&mut surface).unwrap();
            for p in state.particles() {
                assert!(!p.trail.is_empty());
                assert!(p.trail.len() <= p.max_trail_length);
            }
        }
    }
}
// --- End of File: simulation.rs ---
