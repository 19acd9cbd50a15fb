// --- File: particle.rs ---
use crate::config::ParticleConfig;
use crate::constants::DEFAULT_STROKE_COLOR;
use crate::flow_field::FlowField;
use crate::surface::DrawingSurface;
use glam::{Vec2, Vec4};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// What a simulation step did, in priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifePhase {
    /// Timer still running: steered, moved, trail extended.
    Active,
    /// Timer expired: oldest trail point dropped, no movement.
    Draining,
    /// Timer expired with a single-point trail: particle was reset.
    Depleted,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub heading: f32,
    // Angle of the last cell sampled.
    pub target_heading: f32,
    pub heading_correction: f32,
    pub speed_scale: u32,
    pub max_trail_length: usize,
    // Oldest point first; never empty.
    pub trail: VecDeque<Vec2>,
    pub life_timer: i32,
    pub color: Vec4,
}

impl Particle {
    pub fn new(
        position: Vec2,
        speed_scale: u32,
        max_trail_length: usize,
        heading_correction: f32,
        color: Vec4,
    ) -> Self {
        let max_trail_length = max_trail_length.max(1);
        let mut trail = VecDeque::with_capacity(max_trail_length + 1);
        trail.push_back(position);
        Self {
            position,
            heading: 0.0,
            target_heading: 0.0,
            heading_correction,
            speed_scale,
            max_trail_length,
            trail,
            life_timer: Self::lifespan(max_trail_length),
            color,
        }
    }

    /// Random traits from `config`, random integer position on the field's canvas.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, field: &FlowField, config: &ParticleConfig) -> Self {
        let position = Vec2::new(
            rng.gen_range(0..field.width()) as f32,
            rng.gen_range(0..field.height()) as f32,
        );
        let speed_scale = rng.gen_range(config.speed_scale.clone());
        let max_trail_length = rng.gen_range(config.trail_length.clone());
        let heading_correction = rng.gen_range(config.heading_correction.clone());
        let color = config
            .palette
            .choose(rng)
            .copied()
            .unwrap_or(DEFAULT_STROKE_COLOR);
        Self::new(
            position,
            speed_scale,
            max_trail_length,
            heading_correction,
            color,
        )
    }

    #[inline]
    fn lifespan(max_trail_length: usize) -> i32 {
        (max_trail_length * 2) as i32
    }

    /// Advances one frame. Counts the timer down, then moves, drains or resets.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        field: &FlowField,
        rng: &mut R,
        reset_attempts: usize,
    ) -> LifePhase {
        self.life_timer -= 1;

        if self.life_timer >= 1 {
            if let Some(cell) = field.cell_at(self.position) {
                self.steer_toward(cell.angle);
            }
            self.position += Vec2::from_angle(self.heading) * self.speed_scale as f32;
            self.trail.push_back(self.position);
            if self.trail.len() > self.max_trail_length {
                self.trail.pop_front();
            }
            LifePhase::Active
        } else if self.trail.len() > 1 {
            self.trail.pop_front();
            LifePhase::Draining
        } else {
            self.reset(field, rng, reset_attempts);
            LifePhase::Depleted
        }
    }

    /// Nudges the heading one correction step toward `target`. Linear, so headings near
    /// the 0/TAU seam can sweep the long way round.
    pub fn steer_toward(&mut self, target: f32) {
        self.target_heading = target;
        if self.heading > target {
            self.heading -= self.heading_correction;
        } else if self.heading < target {
            self.heading += self.heading_correction;
        } else {
            self.heading = target;
        }
    }

    /// Moves to a random glyph cell, or anywhere on the canvas if `attempts` random cells
    /// all fall outside the glyph. Returns whether a glyph cell was found.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        field: &FlowField,
        rng: &mut R,
        attempts: usize,
    ) -> bool {
        let cells = field.cells();
        let landing = if cells.is_empty() {
            None
        } else {
            (0..attempts)
                .map(|_| &cells[rng.gen_range(0..cells.len())])
                .find(|cell| cell.alpha > 0)
        };

        let (position, in_glyph) = match landing {
            Some(cell) => (cell.origin(), true),
            None => (
                Vec2::new(
                    rng.gen_range(0.0..field.width() as f32),
                    rng.gen_range(0.0..field.height() as f32),
                ),
                false,
            ),
        };

        self.position = position;
        self.trail.clear();
        self.trail.push_back(position);
        self.life_timer = Self::lifespan(self.max_trail_length);
        in_glyph
    }

    /// Strokes the trail as one polyline in the particle's colour.
    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(&first) = self.trail.front() else {
            return;
        };
        surface.begin_path();
        surface.move_to(first);
        for &point in &self.trail {
            surface.line_to(point);
        }
        surface.set_stroke_color(self.color);
        surface.stroke();
    }
}

// --- End of File: particle.rs ---
