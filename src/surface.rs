// --- File: surface.rs ---
// Drawing primitives the effect issues, and a CPU canvas that executes them.
use crate::constants::{DEFAULT_LINE_WIDTH, DEFAULT_STROKE_COLOR};
use crate::raster::Raster;
use crate::utils::to_rgba8;
use glam::{Vec2, Vec4};
use image::{Pixel, Rgba, imageops};

/// Path-stroking surface in the style of a 2D canvas context.
pub trait DrawingSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    fn stroke(&mut self);
    fn set_stroke_color(&mut self, color: Vec4);
    fn set_line_width(&mut self, width: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    /// Composites an image at the surface origin.
    fn draw_raster(&mut self, raster: &Raster);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StrokeState {
    color: Vec4,
    line_width: f32,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Software canvas backed by a [`Raster`]; cleared pixels are transparent.
pub struct PixelCanvas {
    target: Raster,
    state: StrokeState,
    saved: Vec<StrokeState>,
    subpaths: Vec<Vec<Vec2>>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Raster::new(width, height),
            state: StrokeState::default(),
            saved: Vec::new(),
            subpaths: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    pub fn pixels(&self) -> &Raster {
        &self.target
    }

    /// Reallocates the backing store; contents and path are discarded, stroke state is kept.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.target = Raster::new(width, height);
        self.subpaths.clear();
    }

    // Thin lines paint one pixel with reduced coverage; wider ones paint a square brush.
    fn stroke_segment(&mut self, from: Vec2, to: Vec2) {
        let coverage = self.state.line_width.min(1.0);
        let radius = ((self.state.line_width - 1.0) * 0.5).max(0.0).round() as i32;
        let paint = to_rgba8(self.state.color * Vec4::new(1.0, 1.0, 1.0, coverage));
        if paint[3] == 0 {
            return;
        }

        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as i32;
        let increment = delta / steps as f32;
        let mut point = from;
        // The segment start is shared with the previous segment's end.
        for _ in 0..steps {
            point += increment;
            let (cx, cy) = (point.x.floor() as i32, point.y.floor() as i32);
            for oy in -radius..=radius {
                for ox in -radius..=radius {
                    self.blend_at(cx + ox, cy + oy, &paint);
                }
            }
        }
    }

    fn blend_at(&mut self, x: i32, y: i32, paint: &Rgba<u8>) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if let Some(pixel) = self.target.get_pixel_mut_checked(x, y) {
            pixel.blend(paint);
        }
    }
}

impl DrawingSurface for PixelCanvas {
    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.subpaths.push(vec![point]);
    }

    fn line_to(&mut self, point: Vec2) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for pair in subpath.windows(2) {
                if pair[0] != pair[1] {
                    self.stroke_segment(pair[0], pair[1]);
                }
            }
        }
        // Stroking does not consume the path.
        self.subpaths = subpaths;
    }

    fn set_stroke_color(&mut self, color: Vec4) {
        self.state.color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn save(&mut self) {
        self.saved.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + width).max(0.0).ceil() as u32).min(self.target.width());
        let y1 = ((y + height).max(0.0).ceil() as u32).min(self.target.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.target.put_pixel(px, py, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn draw_raster(&mut self, raster: &Raster) {
        imageops::overlay(&mut self.target, raster, 0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

    fn painted(canvas: &PixelCanvas) -> usize {
        let raster = canvas.pixels();
        (0..raster.height())
            .flat_map(|y| (0..raster.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| raster.get_pixel(x, y)[3] > 0)
            .count()
    }

    #[test]
    fn horizontal_stroke_paints_each_pixel_once() {
        let mut canvas = PixelCanvas::new(20, 5);
        canvas.set_stroke_color(RED);
        canvas.begin_path();
        canvas.move_to(Vec2::new(2.5, 2.5));
        canvas.line_to(Vec2::new(12.5, 2.5));
        canvas.stroke();
        assert_eq!(painted(&canvas), 10);
        assert_eq!(canvas.pixels().get_pixel(12, 2), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn thin_lines_are_translucent() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.set_stroke_color(RED);
        canvas.set_line_width(0.3);
        canvas.begin_path();
        canvas.move_to(Vec2::new(0.5, 5.5));
        canvas.line_to(Vec2::new(5.5, 5.5));
        canvas.stroke();
        let alpha = canvas.pixels().get_pixel(3, 5)[3];
        assert!((76..=77).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn restore_returns_to_saved_state() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_stroke_color(RED);
        canvas.save();
        canvas.set_stroke_color(Vec4::ONE);
        canvas.set_line_width(3.0);
        canvas.restore();
        assert_eq!(canvas.state.color, RED);
        assert_eq!(canvas.state.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_stroke_color(RED);
        canvas.restore();
        assert_eq!(canvas.state.color, RED);
    }

    #[test]
    fn clear_rect_erases_to_transparent() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.begin_path();
        canvas.move_to(Vec2::new(0.0, 3.5));
        canvas.line_to(Vec2::new(8.0, 3.5));
        canvas.stroke();
        assert!(painted(&canvas) > 0);
        canvas.clear_rect(0.0, 0.0, 8.0, 8.0);
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn begin_path_discards_previous_subpaths() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.begin_path();
        canvas.move_to(Vec2::new(0.5, 0.5));
        canvas.line_to(Vec2::new(9.5, 0.5));
        canvas.begin_path();
        canvas.move_to(Vec2::new(0.5, 9.5));
        canvas.line_to(Vec2::new(3.5, 9.5));
        canvas.stroke();
        assert_eq!(painted(&canvas), 3);
    }

    #[test]
    fn resize_reallocates_blank_target() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.resize(6, 3);
        assert_eq!((canvas.width(), canvas.height()), (6, 3));
        assert_eq!(canvas.pixels(), &Raster::new(6, 3));
    }

    #[test]
    fn strokes_off_the_canvas_are_clipped() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.begin_path();
        canvas.move_to(Vec2::new(-3.5, 1.5));
        canvas.line_to(Vec2::new(6.5, 1.5));
        canvas.stroke();
        assert_eq!(painted(&canvas), 4);
    }

    #[test]
    fn draw_raster_composites_over_existing_pixels() {
        let mut canvas = PixelCanvas::new(2, 1);
        canvas.target.put_pixel(0, 0, Rgba([9, 9, 9, 255]));
        let mut glyph = Raster::new(2, 1);
        glyph.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        canvas.draw_raster(&glyph);
        // Transparent glyph pixels leave the canvas untouched.
        assert_eq!(canvas.pixels().get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.pixels().get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
    }
}
// --- End of File: surface.rs ---
