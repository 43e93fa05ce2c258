//! Error types shared by the grid view and its collaborators.

use crate::grid::Cell;

/// Errors produced while mutating or constructing the grid view.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Grid side length must be positive.
    #[error("grid size must be positive")]
    EmptyGrid,

    /// A `size x size` RGBA raster would overflow addressable memory.
    #[error("grid size {size} is too large for an RGBA raster")]
    TooLarge { size: u32 },

    /// Grid identifier must be non-empty.
    #[error("grid id must not be empty")]
    EmptyId,

    /// A write or read addressed a cell outside `[0, size)`.
    #[error("cell ({x}, {y}) is outside a {size}x{size} grid")]
    OutOfBounds { x: i64, y: i64, size: u32 },

    /// An entry of a pixel batch addressed a cell outside the grid.
    #[error("sync entry {index} is out of bounds: {source}")]
    BatchEntry {
        index: usize,
        #[source]
        source: Box<GridError>,
    },

    /// A render layer's pixel dimensions do not match the grid.
    #[error("{layer} surface is {width}x{height}, grid is {size}x{size}")]
    SurfaceSize { layer: &'static str, width: u32, height: u32, size: u32 },

    /// A snapshot buffer did not hold exactly `4 * size * size` bytes.
    #[error("snapshot length {actual} does not match expected {expected}")]
    SnapshotLength { expected: usize, actual: usize },

    /// The event name is not one the view subscribes to.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The payload shape did not match the named event.
    #[error("malformed {event} payload: {reason}")]
    Payload { event: &'static str, reason: String },

    /// A snapshot load was started while another is still outstanding.
    #[error("snapshot load already in progress")]
    LoadInProgress,

    /// A snapshot result was delivered for a load the view is not waiting on.
    #[error("no snapshot load is outstanding")]
    NoLoadPending,

    /// The outbound channel has no receiver any more.
    #[error("event channel closed")]
    ChannelClosed,

    /// The underlying raster backend rejected a draw call.
    #[error("surface backend failed: {0}")]
    Surface(String),
}

impl GridError {
    #[must_use]
    pub fn out_of_bounds(cell: Cell, size: u32) -> Self {
        Self::OutOfBounds { x: i64::from(cell.x), y: i64::from(cell.y), size }
    }
}
