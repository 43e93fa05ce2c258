//! Grid identity, cell coordinates and colors.
//!
//! A [`Grid`] is the fixed logical raster a view renders: square, `size`
//! cells on a side, named by an opaque `id`. [`Cell`] is a validated
//! in-bounds coordinate and [`Rgba`] a single 4-byte color. Colors decoded
//! from the wire follow clamped-byte semantics: components are rounded
//! half-to-even and clamped into `[0, 255]`, with `NaN` mapping to zero.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GridError;

/// Bytes per pixel in every raster buffer and snapshot.
pub const BYTES_PER_PIXEL: usize = 4;

/// The logical pixel canvas a view is bound to. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    id: String,
    size: u32,
    byte_len: usize,
}

impl Grid {
    /// Build a grid descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyId`] for a blank id,
    /// [`GridError::EmptyGrid`] when `size` is zero and
    /// [`GridError::TooLarge`] when a full raster would not fit in memory.
    pub fn new(id: impl Into<String>, size: u32) -> Result<Self, GridError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GridError::EmptyId);
        }
        if size == 0 {
            return Err(GridError::EmptyGrid);
        }
        let byte_len = raster_len(size).ok_or(GridError::TooLarge { size })?;
        Ok(Self { id, size, byte_len })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Side length in cells.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Byte length of a full row-major RGBA raster for this grid.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Validate a signed coordinate pair against the grid bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when either axis falls outside `[0, size)`.
    pub fn cell(&self, x: i64, y: i64) -> Result<Cell, GridError> {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(cx), Ok(cy)) if cx < self.size && cy < self.size => Ok(Cell::new(cx, cy)),
            _ => Err(GridError::OutOfBounds { x, y, size: self.size }),
        }
    }
}

/// Byte length of a `size x size` RGBA raster, or `None` when it exceeds
/// the largest possible allocation.
#[must_use]
pub fn raster_len(size: u32) -> Option<usize> {
    let side = size as usize;
    side.checked_mul(side)?
        .checked_mul(BYTES_PER_PIXEL)
        .filter(|len| *len <= isize::MAX.unsigned_abs())
}

/// An in-bounds cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A single RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Fully transparent black; the cleared overlay value.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);

    /// Opaque white; the initial selected color.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    #[must_use]
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Build a color from arbitrary numeric components using clamped-byte rules.
    #[must_use]
    pub fn clamped(components: [f64; 4]) -> Self {
        Self(components.map(clamp_component))
    }

    #[must_use]
    pub fn bytes(self) -> [u8; 4] {
        self.0
    }
}

/// Round half-to-even and clamp into a byte, `NaN` becomes zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_component(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<f64>::deserialize(deserializer)?;
        let components: [f64; 4] = raw.as_slice().try_into().map_err(|_| {
            <D::Error as serde::de::Error>::invalid_length(raw.len(), &"exactly 4 color components")
        })?;
        Ok(Self::clamped(components))
    }
}
