// --- File: config.rs ---
use crate::constants::*;
use glam::Vec4;
use std::ops::{Range, RangeInclusive};

#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub palette: Vec<Vec4>,
    // Upper bound exclusive; each particle keeps its drawn length for life.
    pub trail_length: Range<usize>,
    pub speed_scale: RangeInclusive<u32>,
    // Per-step heading adjustment, drawn once per particle.
    pub heading_correction: Range<f32>,
    // Random glyph cells tried before falling back to anywhere on the canvas.
    pub reset_attempts: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            palette: PALETTE.to_vec(),
            trail_length: MIN_TRAIL_LENGTH..MAX_TRAIL_LENGTH_EXCLUSIVE,
            speed_scale: MIN_SPEED_SCALE..=MAX_SPEED_SCALE,
            heading_correction: MIN_HEADING_CORRECTION..MAX_HEADING_CORRECTION,
            reset_attempts: RESET_ATTEMPTS,
        }
    }
}

/// How the source glyph is drawn before the field samples it.
#[derive(Debug, Clone)]
pub struct GlyphStyle {
    pub text: String,
    pub font_px: f32,
    // Rendered text never exceeds this share of the canvas width.
    pub max_width_fraction: f32,
    // (offset, colour) pairs along the diagonal from the canvas origin to the far corner.
    pub gradient: Vec<(f32, Vec4)>,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            text: GLYPH_TEXT.to_string(),
            font_px: GLYPH_FONT_PX,
            max_width_fraction: GLYPH_MAX_WIDTH_FRACTION,
            gradient: vec![
                (0.2, Vec4::new(1.0, 1.0, 0.0, 1.0)),
                (0.4, Vec4::new(200.0 / 255.0, 5.0 / 255.0, 50.0 / 255.0, 1.0)),
                (0.6, Vec4::new(150.0 / 255.0, 1.0, 1.0, 1.0)),
                (0.8, Vec4::new(1.0, 1.0, 150.0 / 255.0, 1.0)),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct EffectConfig {
    pub particle_count: usize,
    pub initial_cell_size: u32,
    pub particle: ParticleConfig,
    pub glyph: GlyphStyle,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            initial_cell_size: INITIAL_CELL_SIZE,
            particle: ParticleConfig::default(),
            glyph: GlyphStyle::default(),
        }
    }
}
// --- End of File: config.rs ---
