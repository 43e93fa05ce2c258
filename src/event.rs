//! Channel events: the closed inbound set and the outbound selection event.
//!
//! The realtime channel names events by string and carries JSON payloads.
//! [`Inbound::decode`] is the boundary where a `(name, payload)` pair is
//! turned into a typed variant; unknown names and malformed payloads stop
//! here and never reach the render surface.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GridError;
use crate::grid::{Cell, Rgba};

pub const SET_PIXEL: &str = "set_pixel";
pub const SYNC_PIXELS: &str = "sync_pixels";
pub const SELECT_COLOR: &str = "select_color";
pub const CLEAR_OVERLAY: &str = "clear_overlay";
pub const SELECT_PIXEL: &str = "select_pixel";

/// One pixel write as carried on the wire.
///
/// Coordinates are signed so an out-of-range value from the server decodes
/// and is then rejected by the bounds check, rather than failing as a type
/// error with a less useful message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelWrite {
    pub x: i64,
    pub y: i64,
    #[serde(alias = "rgba")]
    pub rgb: Rgba,
}

impl PixelWrite {
    #[must_use]
    pub fn new(x: i64, y: i64, rgb: Rgba) -> Self {
        Self { x, y, rgb }
    }
}

#[derive(Deserialize)]
struct SyncPayload {
    pixels: Vec<PixelWrite>,
}

#[derive(Deserialize)]
struct SelectColorPayload {
    color: Rgba,
}

/// Events the view subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Commit a single pixel to the base layer.
    SetPixel(PixelWrite),
    /// Commit a batch of pixels, last write wins.
    SyncPixels(Vec<PixelWrite>),
    /// Change the highlight color and repaint it at the selected cell.
    SelectColor(Rgba),
    /// Drop the current highlight.
    ClearOverlay,
}

impl Inbound {
    /// Channel name of this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPixel(_) => SET_PIXEL,
            Self::SyncPixels(_) => SYNC_PIXELS,
            Self::SelectColor(_) => SELECT_COLOR,
            Self::ClearOverlay => CLEAR_OVERLAY,
        }
    }

    /// Decode a named channel event.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownEvent`] for names outside the inbound set
    /// and [`GridError::Payload`] when the payload does not have the shape the
    /// event requires.
    pub fn decode(name: &str, payload: Value) -> Result<Self, GridError> {
        match name {
            SET_PIXEL => parse(SET_PIXEL, payload).map(Self::SetPixel),
            SYNC_PIXELS => parse::<SyncPayload>(SYNC_PIXELS, payload).map(|p| Self::SyncPixels(p.pixels)),
            SELECT_COLOR => parse::<SelectColorPayload>(SELECT_COLOR, payload).map(|p| Self::SelectColor(p.color)),
            CLEAR_OVERLAY => match payload {
                Value::Null | Value::Object(_) => Ok(Self::ClearOverlay),
                other => Err(GridError::Payload {
                    event: CLEAR_OVERLAY,
                    reason: format!("expected no payload, got {other}"),
                }),
            },
            other => Err(GridError::UnknownEvent(other.to_owned())),
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(event: &'static str, payload: Value) -> Result<T, GridError> {
    serde_json::from_value(payload).map_err(|e| GridError::Payload { event, reason: e.to_string() })
}

/// Events the view emits to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outbound {
    /// The user picked a cell.
    SelectPixel { x: u32, y: u32 },
}

impl Outbound {
    #[must_use]
    pub fn select_pixel(cell: Cell) -> Self {
        Self::SelectPixel { x: cell.x, y: cell.y }
    }

    /// Channel name of this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectPixel { .. } => SELECT_PIXEL,
        }
    }

    /// JSON payload as pushed to the channel.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::SelectPixel { x, y } => serde_json::json!({ "x": x, "y": y }),
        }
    }

    /// The `{event, payload}` envelope used on line-oriented transports.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope { event: self.name().to_owned(), payload: self.payload() }
    }
}

/// A named event with an untyped payload, as framed by the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}
