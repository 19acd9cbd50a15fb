// --- File: constants.rs ---
use crate::utils::rgb_hex;
use glam::Vec4;

// --- Window ---
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const TITLE_UPDATE_INTERVAL_SECS: f64 = 1.0;

// --- Flow field ---
pub const INITIAL_CELL_SIZE: u32 = 5;
// Smallest cell size reconciliation will accept, and the step used when truncating dimensions.
pub const MIN_CELL_SIZE: u32 = 5;
pub const GLYPH_TEXT: &str = "Malmi";
pub const GLYPH_FONT_PX: f32 = 300.0;
pub const GLYPH_MAX_WIDTH_FRACTION: f32 = 0.8;

// --- Particles ---
pub const PARTICLE_COUNT: usize = 1000;
pub const RESET_ATTEMPTS: usize = 10;
pub const MIN_TRAIL_LENGTH: usize = 20;
pub const MAX_TRAIL_LENGTH_EXCLUSIVE: usize = 100;
pub const MIN_SPEED_SCALE: u32 = 1;
pub const MAX_SPEED_SCALE: u32 = 2;
pub const MIN_HEADING_CORRECTION: f32 = 0.01;
pub const MAX_HEADING_CORRECTION: f32 = 0.51;

// Dark to light.
pub const PALETTE: [Vec4; 6] = [
    rgb_hex(0x3e0d4f),
    rgb_hex(0x39166e),
    rgb_hex(0x25259c),
    rgb_hex(0x335cb5),
    rgb_hex(0x4293c2),
    rgb_hex(0x5acedb),
];

// --- Drawing defaults ---
pub const DEFAULT_STROKE_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
pub const GRID_LINE_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
pub const GRID_LINE_WIDTH: f32 = 0.3;

// --- End of File: constants.rs ---
