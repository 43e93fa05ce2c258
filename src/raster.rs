//! Raster backends: the [`Surface`] seam and the in-memory [`Raster`].
//!
//! A surface is a square RGBA pixel target the render layer draws into. The
//! trait mirrors the three primitives a 2D canvas context offers for this
//! job (single-pixel put, whole-image put, clear), so a browser canvas and a
//! plain byte buffer are interchangeable behind it. Bounds and lengths are
//! validated by the caller ([`crate::surface::RenderSurface`]) before a
//! backend is touched.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use crate::error::GridError;
use crate::grid::{BYTES_PER_PIXEL, Cell, Grid, Rgba, raster_len};

/// A drawable square RGBA target.
pub trait Surface {
    /// Pixel dimensions as `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Write one pixel. `cell` is already known to be in bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] if the backend rejects the draw.
    fn put_pixel(&mut self, cell: Cell, color: Rgba) -> Result<(), GridError>;

    /// Replace the whole image with a row-major RGBA buffer of `size x size`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] if the backend rejects the draw.
    fn put_image(&mut self, size: u32, data: &[u8]) -> Result<(), GridError>;

    /// Reset every pixel to transparent.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] if the backend rejects the draw.
    fn clear(&mut self) -> Result<(), GridError>;
}

/// In-memory row-major RGBA buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    size: u32,
    data: Vec<u8>,
}

impl Raster {
    /// A fully transparent `size x size` raster.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::TooLarge`] when the buffer length overflows.
    pub fn new(size: u32) -> Result<Self, GridError> {
        let len = raster_len(size).ok_or(GridError::TooLarge { size })?;
        Ok(Self { size, data: vec![0; len] })
    }

    /// A fully transparent raster matching `grid`.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        Self { size: grid.size(), data: vec![0; grid.byte_len()] }
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw row-major bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let offset = self.offset(x, y)?;
        let bytes = self.data.get(offset..offset + BYTES_PER_PIXEL)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(bytes);
        Some(Rgba(rgba))
    }

    /// Cells whose alpha is non-zero, in row-major order.
    #[must_use]
    pub fn painted_cells(&self) -> Vec<Cell> {
        (0..self.size)
            .flat_map(|y| (0..self.size).map(move |x| Cell::new(x, y)))
            .filter(|cell| self.pixel(cell.x, cell.y).is_some_and(|px| px.0[3] != 0))
            .collect()
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some((y as usize * self.size as usize + x as usize) * BYTES_PER_PIXEL)
    }
}

impl Surface for Raster {
    fn dimensions(&self) -> (u32, u32) {
        (self.size, self.size)
    }

    fn put_pixel(&mut self, cell: Cell, color: Rgba) -> Result<(), GridError> {
        let offset = self
            .offset(cell.x, cell.y)
            .ok_or_else(|| GridError::out_of_bounds(cell, self.size))?;
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.bytes());
        Ok(())
    }

    fn put_image(&mut self, size: u32, data: &[u8]) -> Result<(), GridError> {
        if size != self.size {
            return Err(GridError::SurfaceSize { layer: "raster", width: self.size, height: self.size, size });
        }
        if data.len() != self.data.len() {
            return Err(GridError::SnapshotLength { expected: self.data.len(), actual: data.len() });
        }
        self.data.copy_from_slice(data);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), GridError> {
        self.data.fill(0);
        Ok(())
    }
}
