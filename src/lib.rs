//! Pixel-grid view for a collaborative "place" canvas.
//!
//! The crate owns everything between the realtime channel and the pixels on
//! screen: applying pixel events to a committed base layer, keeping a single
//! selection highlight on an overlay layer, turning pointer clicks under the
//! pan/zoom transform into grid cells, and loading the initial snapshot.
//! Transport, pan/zoom gestures and persistence live outside; the host wires
//! them in through [`raster::Surface`], [`mapper::ScaleProvider`] and
//! [`channel::EventSink`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`view`] | [`view::GridView`]: event bridge, selection, snapshot ordering |
//! | [`surface`] | Base + overlay render layers with bounds checking |
//! | [`raster`] | The `Surface` seam and the in-memory [`raster::Raster`] |
//! | [`mapper`] | Pointer-to-cell mapping and the zoom readout |
//! | [`event`] | Typed inbound/outbound channel events |
//! | [`channel`] | Outbound event sinks |
//! | [`loader`] | One-shot HTTP snapshot fetch |
//! | [`grid`] | Grid identity, cells, colors |
//! | [`config`] | Environment configuration |
//! | [`error`] | Shared error type |
//! | `web` | Canvas 2D backend (feature `web`) |

pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod loader;
pub mod mapper;
pub mod raster;
pub mod surface;
pub mod view;
#[cfg(feature = "web")]
pub mod web;
