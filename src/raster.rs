// --- File: raster.rs ---
// Glyph images the flow field samples, and the rasterizer that draws them.
use crate::config::GlyphStyle;
use crate::utils::to_rgba8;
use glam::Vec4;
use image::RgbaImage;

/// RGBA8 image shared by the rasterizer, the canvas and the GPU upload.
pub type Raster = RgbaImage;

/// Reads the pixel at `(x, y)` as raw channels, `None` off the image.
#[inline]
pub fn sample(raster: &Raster, x: u32, y: u32) -> Option<[u8; 4]> {
    raster.get_pixel_checked(x, y).map(|pixel| pixel.0)
}

/// Produces the glyph image a flow field is derived from.
pub trait Rasterizer {
    fn rasterize(&self, width: u32, height: u32, style: &GlyphStyle) -> Raster;
}

const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;
// Glyph columns plus one column of spacing.
const GLYPH_ADVANCE: usize = GLYPH_COLUMNS + 1;

/// Draws text with a built-in 5x7 bitmap font, centred on the canvas and
/// filled with the style's diagonal gradient. Lowercase letters render as
/// capitals; unknown characters render blank.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapTextRasterizer;

impl Rasterizer for BitmapTextRasterizer {
    fn rasterize(&self, width: u32, height: u32, style: &GlyphStyle) -> Raster {
        let mut raster = Raster::new(width, height);
        let glyphs: Vec<[u8; GLYPH_ROWS]> = style
            .text
            .chars()
            .map(|c| glyph_5x7(c.to_ascii_uppercase()))
            .collect();
        if glyphs.is_empty() || width == 0 || height == 0 {
            return raster;
        }

        let dot_columns = glyphs.len() * GLYPH_ADVANCE - 1;
        let mut scale = style.font_px / GLYPH_ROWS as f32;
        let max_width = width as f32 * style.max_width_fraction;
        if dot_columns as f32 * scale > max_width {
            scale = max_width / dot_columns as f32;
        }
        if scale <= 0.0 {
            return raster;
        }

        let text_w = dot_columns as f32 * scale;
        let text_h = GLYPH_ROWS as f32 * scale;
        let x0 = (width as f32 - text_w) * 0.5;
        let y0 = (height as f32 - text_h) * 0.5;

        let px_start = x0.floor().max(0.0) as u32;
        let px_end = ((x0 + text_w).ceil().max(0.0) as u32).min(width);
        let py_start = y0.floor().max(0.0) as u32;
        let py_end = ((y0 + text_h).ceil().max(0.0) as u32).min(height);

        for py in py_start..py_end {
            let dy = (py as f32 + 0.5 - y0) / scale;
            if dy < 0.0 || dy >= GLYPH_ROWS as f32 {
                continue;
            }
            let row = dy as usize;
            for px in px_start..px_end {
                let dx = (px as f32 + 0.5 - x0) / scale;
                if dx < 0.0 || dx >= dot_columns as f32 {
                    continue;
                }
                let column = dx as usize;
                let within = column % GLYPH_ADVANCE;
                if within >= GLYPH_COLUMNS {
                    continue;
                }
                let bits = glyphs[column / GLYPH_ADVANCE][row];
                if (bits >> (GLYPH_COLUMNS - 1 - within)) & 1 == 0 {
                    continue;
                }
                let color = gradient_at(&style.gradient, width, height, px, py);
                raster.put_pixel(px, py, to_rgba8(color));
            }
        }
        raster
    }
}

/// Samples a linear gradient running from the canvas origin to `(width, height)`.
/// Offsets before the first stop or after the last take that stop's colour.
pub fn gradient_at(stops: &[(f32, Vec4)], width: u32, height: u32, x: u32, y: u32) -> Vec4 {
    let Some(&(first_offset, first_color)) = stops.first() else {
        return Vec4::ONE;
    };
    let (w, h) = (width as f32, height as f32);
    let length_sq = w * w + h * h;
    let t = if length_sq > 0.0 {
        ((x as f32 + 0.5) * w + (y as f32 + 0.5) * h) / length_sq
    } else {
        0.0
    };

    if t <= first_offset {
        return first_color;
    }
    for pair in stops.windows(2) {
        let (a_offset, a_color) = pair[0];
        let (b_offset, b_color) = pair[1];
        if t <= b_offset {
            let span = b_offset - a_offset;
            if span <= 0.0 {
                return b_color;
            }
            return a_color.lerp(b_color, (t - a_offset) / span);
        }
    }
    stops[stops.len() - 1].1
}

fn glyph_5x7(c: char) -> [u8; GLYPH_ROWS] {
    match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b11111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b10000, 0b11110, 0b00001, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        _ => [0; GLYPH_ROWS],
    }
}

// --- End of File: raster.rs ---
