//! Render surface: the committed base layer and the selection overlay.
//!
//! Both layers are `size x size` surfaces injected by the host. The base
//! layer is the source of truth for committed grid state; the overlay only
//! ever carries the current selection highlight. Every write is validated
//! against the grid bounds here, before the backend sees it, so a rejected
//! write never reaches the pixels.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::error::GridError;
use crate::event::PixelWrite;
use crate::grid::{Cell, Grid, Rgba};
use crate::raster::Surface;

/// Base and overlay layers for a single grid.
pub struct RenderSurface<B, O> {
    grid: Grid,
    base: B,
    overlay: O,
}

impl<B: Surface, O: Surface> RenderSurface<B, O> {
    /// Pair two layers with their grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SurfaceSize`] when either layer is not
    /// `size x size` pixels.
    pub fn new(grid: Grid, base: B, overlay: O) -> Result<Self, GridError> {
        check_layer("base", &base, grid.size())?;
        check_layer("overlay", &overlay, grid.size())?;
        Ok(Self { grid, base, overlay })
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn base(&self) -> &B {
        &self.base
    }

    #[must_use]
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Write one committed pixel into the base layer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] without touching the layer when
    /// `(x, y)` is outside the grid, or the backend's error.
    pub fn write_pixel(&mut self, x: i64, y: i64, color: Rgba) -> Result<Cell, GridError> {
        let cell = self.grid.cell(x, y)?;
        self.base.put_pixel(cell, color)?;
        Ok(cell)
    }

    /// Apply a batch of writes in order; later entries win on the same cell.
    ///
    /// The batch is bounds-checked up front, so a bad entry rejects the whole
    /// batch and nothing is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::BatchEntry`] naming the first out-of-range entry.
    pub fn sync_pixels(&mut self, pixels: &[PixelWrite]) -> Result<Vec<Cell>, GridError> {
        let cells = pixels
            .iter()
            .enumerate()
            .map(|(index, px)| {
                self.grid
                    .cell(px.x, px.y)
                    .map_err(|e| GridError::BatchEntry { index, source: Box::new(e) })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (cell, px) in cells.iter().zip(pixels) {
            self.base.put_pixel(*cell, px.rgb)?;
        }
        Ok(cells)
    }

    /// Wipe the overlay back to transparent.
    ///
    /// # Errors
    ///
    /// Propagates the overlay backend's error.
    pub fn clear_overlay(&mut self) -> Result<(), GridError> {
        self.overlay.clear()
    }

    /// Paint one highlight cell into the overlay.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for a cell outside the grid, or the
    /// backend's error.
    pub fn paint_overlay(&mut self, cell: Cell, color: Rgba) -> Result<(), GridError> {
        if cell.x >= self.grid.size() || cell.y >= self.grid.size() {
            return Err(GridError::out_of_bounds(cell, self.grid.size()));
        }
        self.overlay.put_pixel(cell, color)
    }

    /// Replace the entire base layer with a row-major RGBA snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SnapshotLength`] when `data` is not exactly
    /// `4 * size * size` bytes; the base layer is left untouched.
    pub fn load_snapshot(&mut self, data: &[u8]) -> Result<(), GridError> {
        let expected = self.grid.byte_len();
        if data.len() != expected {
            return Err(GridError::SnapshotLength { expected, actual: data.len() });
        }
        self.base.put_image(self.grid.size(), data)
    }
}

fn check_layer(layer: &'static str, surface: &impl Surface, size: u32) -> Result<(), GridError> {
    match surface.dimensions() {
        (width, height) if width == size && height == size => Ok(()),
        (width, height) => Err(GridError::SurfaceSize { layer, width, height, size }),
    }
}
