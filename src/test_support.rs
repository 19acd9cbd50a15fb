// --- File: test_support.rs ---
// Shared fakes for unit tests.
use crate::config::GlyphStyle;
use crate::raster::{Raster, Rasterizer};
use crate::surface::DrawingSurface;
use glam::{Vec2, Vec4};
use image::Rgba;

/// Every pixel gets the same colour.
pub struct SolidRasterizer(pub [u8; 4]);

impl Rasterizer for SolidRasterizer {
    fn rasterize(&self, width: u32, height: u32, _style: &GlyphStyle) -> Raster {
        Raster::from_pixel(width, height, Rgba(self.0))
    }
}

/// Colours each pixel with a closure of its coordinates.
pub struct FnRasterizer<F>(pub F);

impl<F: Fn(u32, u32) -> [u8; 4]> Rasterizer for FnRasterizer<F> {
    fn rasterize(&self, width: u32, height: u32, _style: &GlyphStyle) -> Raster {
        Raster::from_fn(width, height, |x, y| Rgba((self.0)(x, y)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Stroke,
    StrokeColor(Vec4),
    LineWidth(f32),
    Save,
    Restore,
    ClearRect(f32, f32, f32, f32),
    DrawRaster(u32, u32),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn count(&self, matches: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| matches(op)).count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }
    fn move_to(&mut self, point: Vec2) {
        self.ops.push(Op::MoveTo(point));
    }
    fn line_to(&mut self, point: Vec2) {
        self.ops.push(Op::LineTo(point));
    }
    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }
    fn set_stroke_color(&mut self, color: Vec4) {
        self.ops.push(Op::StrokeColor(color));
    }
    fn set_line_width(&mut self, width: f32) {
        self.ops.push(Op::LineWidth(width));
    }
    fn save(&mut self) {
        self.ops.push(Op::Save);
    }
    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(Op::ClearRect(x, y, width, height));
    }
    fn draw_raster(&mut self, raster: &Raster) {
        self.ops.push(Op::DrawRaster(raster.width(), raster.height()));
    }
}
// --- End of File: test_support.rs ---
