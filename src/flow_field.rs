// --- File: flow_field.rs ---
// Grid of steering angles sampled from a rasterized glyph.
use crate::config::GlyphStyle;
use crate::constants::{GRID_LINE_COLOR, GRID_LINE_WIDTH, MIN_CELL_SIZE};
use crate::raster::{Raster, Rasterizer, sample};
use crate::surface::DrawingSurface;
use crate::utils::{gcd, round_to_hundredths};
use glam::Vec2;
use std::f32::consts::TAU;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowFieldError {
    #[error("canvas {width}x{height} has no area")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("no cell size of at least {min} tiles a {width}x{height} canvas", min = MIN_CELL_SIZE)]
    NoCommonCellSize { width: u32, height: u32 },
}

/// Effective canvas size and the cell size that tiles it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
}

impl Geometry {
    #[inline]
    pub fn cols(&self) -> u32 {
        self.width / self.cell_size
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.height / self.cell_size
    }
}

/// Picks a cell size (and if needed trims the canvas) so cells tile it with no remainder.
///
/// 1. Keep `cell_size` if it already divides both sides.
/// 2. Otherwise adopt the greatest common divisor of the sides, if it is at least [`MIN_CELL_SIZE`].
/// 3. Otherwise round both sides down to multiples of [`MIN_CELL_SIZE`] and retry step 2.
pub fn reconcile_dimensions(
    width: u32,
    height: u32,
    cell_size: u32,
) -> Result<Geometry, FlowFieldError> {
    if width == 0 || height == 0 {
        return Err(FlowFieldError::EmptyCanvas { width, height });
    }

    if cell_size >= MIN_CELL_SIZE && width % cell_size == 0 && height % cell_size == 0 {
        return Ok(Geometry {
            width,
            height,
            cell_size,
        });
    }

    let shared = gcd(width, height);
    if shared >= MIN_CELL_SIZE {
        log::debug!("Cell size {cell_size} does not tile {width}x{height}; using {shared}");
        return Ok(Geometry {
            width,
            height,
            cell_size: shared,
        });
    }

    let trimmed_width = width - width % MIN_CELL_SIZE;
    let trimmed_height = height - height % MIN_CELL_SIZE;
    if trimmed_width > 0 && trimmed_height > 0 {
        let shared = gcd(trimmed_width, trimmed_height);
        if shared >= MIN_CELL_SIZE {
            log::debug!(
                "Trimmed canvas {width}x{height} to {trimmed_width}x{trimmed_height}, cell size {shared}"
            );
            return Ok(Geometry {
                width: trimmed_width,
                height: trimmed_height,
                cell_size: shared,
            });
        }
    }

    Err(FlowFieldError::NoCommonCellSize { width, height })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    // Top-left pixel of the cell, where the glyph was sampled.
    pub origin_x: u32,
    pub origin_y: u32,
    // 0 outside the glyph.
    pub alpha: u8,
    // Radians in [0, TAU], two decimal places.
    pub angle: f32,
}

impl Cell {
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.origin_x as f32, self.origin_y as f32)
    }
}

/// Maps a glyph's grayscale intensity to a steering angle per grid cell.
/// Always rebuilt wholesale; never patched cell by cell.
pub struct FlowField {
    geometry: Geometry,
    cells: Vec<Cell>,
    glyph: Raster,
}

impl FlowField {
    pub fn new(
        width: u32,
        height: u32,
        cell_size: u32,
        rasterizer: &dyn Rasterizer,
        style: &GlyphStyle,
    ) -> Result<Self, FlowFieldError> {
        let geometry = reconcile_dimensions(width, height, cell_size)?;
        let (cells, glyph) = Self::build(geometry, rasterizer, style);
        Ok(Self {
            geometry,
            cells,
            glyph,
        })
    }

    /// Reconciles against the new canvas size using the current cell size, then rebuilds
    /// every cell. On error the previous field is left untouched.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        rasterizer: &dyn Rasterizer,
        style: &GlyphStyle,
    ) -> Result<(), FlowFieldError> {
        let geometry = reconcile_dimensions(width, height, self.geometry.cell_size)?;
        let (cells, glyph) = Self::build(geometry, rasterizer, style);
        self.geometry = geometry;
        self.cells = cells;
        self.glyph = glyph;
        Ok(())
    }

    fn build(
        geometry: Geometry,
        rasterizer: &dyn Rasterizer,
        style: &GlyphStyle,
    ) -> (Vec<Cell>, Raster) {
        let glyph = rasterizer.rasterize(geometry.width, geometry.height, style);
        let (cols, rows) = (geometry.cols(), geometry.rows());
        let mut cells = Vec::with_capacity(cols as usize * rows as usize);

        for row in 0..rows {
            for col in 0..cols {
                let origin_x = col * geometry.cell_size;
                let origin_y = row * geometry.cell_size;
                // One sample at the cell origin, not an area average.
                let [r, g, b, alpha] = sample(&glyph, origin_x, origin_y).unwrap_or([0; 4]);
                let grayscale = (r as f32 + g as f32 + b as f32) / 3.0;
                cells.push(Cell {
                    origin_x,
                    origin_y,
                    alpha,
                    angle: round_to_hundredths(grayscale / 255.0 * TAU),
                });
            }
        }

        log::info!(
            "Built flow field {}x{} ({} cells of {}px) for {}x{} canvas",
            cols,
            rows,
            cells.len(),
            geometry.cell_size,
            geometry.width,
            geometry.height
        );
        log::debug!(
            "{} cells inside the glyph",
            cells.iter().filter(|c| c.alpha > 0).count()
        );
        (cells, glyph)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    #[inline]
    pub fn cell_size(&self) -> u32 {
        self.geometry.cell_size
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.geometry.cols()
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.geometry.rows()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn glyph(&self) -> &Raster {
        &self.glyph
    }

    /// Row-major index of the cell containing `position`, or `None` off the grid.
    /// Only the flat index is bounds-checked, so a column past either side edge
    /// reads the neighbouring row's cell.
    pub fn cell_index_at(&self, position: Vec2) -> Option<usize> {
        let size = self.geometry.cell_size as f32;
        let col = (position.x / size).floor();
        let row = (position.y / size).floor();
        if !(col.is_finite() && row.is_finite()) {
            return None;
        }
        let index = row as i64 * self.cols() as i64 + col as i64;
        usize::try_from(index)
            .ok()
            .filter(|&index| index < self.cells.len())
    }

    pub fn cell_at(&self, position: Vec2) -> Option<&Cell> {
        self.cell_index_at(position).and_then(|i| self.cells.get(i))
    }

    /// Debug overlay: one line per column and per row.
    pub fn draw_grid(&self, surface: &mut dyn DrawingSurface) {
        let size = self.geometry.cell_size as f32;
        let (width, height) = (self.width() as f32, self.height() as f32);

        surface.save();
        surface.set_stroke_color(GRID_LINE_COLOR);
        surface.set_line_width(GRID_LINE_WIDTH);
        for c in 0..self.cols() {
            let x = size * c as f32;
            surface.begin_path();
            surface.move_to(Vec2::new(x, 0.0));
            surface.line_to(Vec2::new(x, height));
            surface.stroke();
        }
        for r in 0..self.rows() {
            let y = size * r as f32;
            surface.begin_path();
            surface.move_to(Vec2::new(0.0, y));
            surface.line_to(Vec2::new(width, y));
            surface.stroke();
        }
        surface.restore();
    }

    /// Debug overlay: the glyph image the field was sampled from.
    pub fn draw_glyph(&self, surface: &mut dyn DrawingSurface) {
        surface.draw_raster(&self.glyph);
    }
}

// --- End of File: flow_field.rs ---
