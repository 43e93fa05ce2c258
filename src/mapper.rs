//! Pointer-to-grid coordinate mapping under the pan/zoom transform.
//!
//! The pan/zoom host scales the canvas element uniformly about its own
//! origin, so the canvas's on-screen bounding box already accounts for pan.
//! Mapping therefore only needs the pointer position relative to that box and
//! the current scale factor.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use crate::grid::Cell;

/// Stroke inset, in device pixels per unit of scale, subtracted before
/// dividing by the scale.
///
/// The rendered canvas carries a one-pixel border that is scaled along with
/// the content, so at scale `s` the first cell starts `s` viewport pixels in.
/// Without this, clicking the visual center of a cell near a boundary lands
/// on its neighbour.
pub const STROKE_INSET: f64 = 1.0;

/// A point in viewport space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A mapped grid coordinate, not yet bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    /// The in-bounds cell this point names, if any.
    #[must_use]
    pub fn cell(self, size: u32) -> Option<Cell> {
        match (u32::try_from(self.x), u32::try_from(self.y)) {
            (Ok(x), Ok(y)) if x < size && y < size => Some(Cell::new(x, y)),
            _ => None,
        }
    }
}

/// Source of the pan/zoom host's current scale factor.
pub trait ScaleProvider {
    fn scale(&self) -> f64;
}

impl ScaleProvider for f64 {
    fn scale(&self) -> f64 {
        *self
    }
}

impl<T: ScaleProvider + ?Sized> ScaleProvider for std::rc::Rc<T> {
    fn scale(&self) -> f64 {
        (**self).scale()
    }
}

impl<T: ScaleProvider + Copy> ScaleProvider for std::cell::Cell<T> {
    fn scale(&self) -> f64 {
        self.get().scale()
    }
}

/// Map a pointer position to grid coordinates.
///
/// `canvas_origin` is the top-left of the canvas's on-screen bounding box.
/// Returns `None` when `scale` is not a finite positive number.
#[must_use]
pub fn map_pointer_to_grid(pointer: Point, canvas_origin: Point, scale: f64) -> Option<GridPoint> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    Some(GridPoint {
        x: axis(pointer.x - canvas_origin.x, scale)?,
        y: axis(pointer.y - canvas_origin.y, scale)?,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn axis(local: f64, scale: f64) -> Option<i64> {
    let mapped = ((local - STROKE_INSET * scale) / scale).floor();
    // A saturating cast would pin a wild pointer to an edge cell.
    if !mapped.is_finite() || mapped < i64::MIN as f64 || mapped >= i64::MAX as f64 {
        return None;
    }
    Some(mapped as i64)
}

/// Display text for the pan/zoom scale, refreshed on every scale change.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomReadout {
    scale: f64,
    text: String,
}

impl Default for ZoomReadout {
    fn default() -> Self {
        Self { scale: 1.0, text: format_scale(1.0) }
    }
}

impl ZoomReadout {
    /// Record a scale-changed event and return the new readout text.
    pub fn on_scale_changed(&mut self, scale: f64) -> &str {
        self.scale = scale;
        self.text = format_scale(scale);
        &self.text
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Two decimal places with an `x` suffix, e.g. `2.50x`.
#[must_use]
pub fn format_scale(scale: f64) -> String {
    format!("{scale:.2}x")
}
