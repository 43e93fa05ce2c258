//! The grid view: event bridge between the channel and the render surface.
//!
//! `GridView` owns the two render layers, the selection state and the load
//! journal. It is purely reactive: every inbound handler runs to completion
//! and is independent of the others, so a rejected event never stops the
//! next one from being applied.
//!
//! SNAPSHOT ORDERING
//! =================
//! The snapshot fetch runs outside the view. While it is in flight, live
//! writes are applied immediately and also journaled; when the snapshot
//! lands it replaces the base layer and the journal is replayed on top, so a
//! pixel written after the fetch was issued is never rolled back by older
//! snapshot data.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde_json::Value;

use crate::channel::EventSink;
use crate::error::GridError;
use crate::event::{Inbound, Outbound, PixelWrite};
use crate::grid::{Cell, Grid, Rgba};
use crate::loader::{LoadError, Snapshot};
use crate::mapper::{self, Point, ScaleProvider, ZoomReadout};
use crate::raster::Surface;
use crate::surface::RenderSurface;

/// Handle for one outstanding snapshot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket(u64);

#[derive(Debug, Default)]
enum LoadState {
    #[default]
    Idle,
    Pending {
        ticket: LoadTicket,
        journal: Vec<(Cell, Rgba)>,
    },
}

pub struct GridView<B, O, Z, C> {
    surface: RenderSurface<B, O>,
    zoom: Z,
    channel: C,
    selected: Cell,
    selected_color: Rgba,
    readout: ZoomReadout,
    strict: bool,
    load: LoadState,
    next_ticket: u64,
}

impl<B, O, Z, C> GridView<B, O, Z, C>
where
    B: Surface,
    O: Surface,
    Z: ScaleProvider,
    C: EventSink,
{
    /// Bind a view to its grid, render layers, scale source and outbound channel.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SurfaceSize`] when a layer does not match the grid.
    pub fn new(grid: Grid, base: B, overlay: O, zoom: Z, channel: C) -> Result<Self, GridError> {
        tracing::debug!(grid = grid.id(), size = grid.size(), "grid view created");
        Ok(Self {
            surface: RenderSurface::new(grid, base, overlay)?,
            zoom,
            channel,
            selected: Cell::default(),
            selected_color: Rgba::WHITE,
            readout: ZoomReadout::default(),
            strict: false,
            load: LoadState::Idle,
            next_ticket: 0,
        })
    }

    /// Surface malformed inbound events to the caller instead of logging them.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    // --- Inbound events ---

    /// `set_pixel`: commit one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for a pixel outside the grid.
    pub fn set_pixel(&mut self, pixel: PixelWrite) -> Result<(), GridError> {
        let cell = self.surface.write_pixel(pixel.x, pixel.y, pixel.rgb)?;
        self.journal(cell, pixel.rgb);
        Ok(())
    }

    /// `sync_pixels`: commit a batch in order, last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::BatchEntry`] if any entry is out of bounds; the
    /// batch is then not applied at all.
    pub fn sync_pixels(&mut self, pixels: &[PixelWrite]) -> Result<(), GridError> {
        let cells = self.surface.sync_pixels(pixels)?;
        for (cell, px) in cells.into_iter().zip(pixels) {
            self.journal(cell, px.rgb);
        }
        Ok(())
    }

    /// `select_color`: change the highlight color and repaint the selected cell.
    ///
    /// # Errors
    ///
    /// Propagates the overlay backend's error.
    pub fn select_color(&mut self, color: Rgba) -> Result<(), GridError> {
        self.selected_color = color;
        self.surface.paint_overlay(self.selected, color)
    }

    /// `clear_overlay`: drop the highlight.
    ///
    /// # Errors
    ///
    /// Propagates the overlay backend's error.
    pub fn clear_overlay(&mut self) -> Result<(), GridError> {
        self.surface.clear_overlay()
    }

    /// Apply a decoded inbound event.
    ///
    /// # Errors
    ///
    /// Returns whatever the matching handler returns.
    pub fn dispatch(&mut self, event: Inbound) -> Result<(), GridError> {
        match event {
            Inbound::SetPixel(pixel) => self.set_pixel(pixel),
            Inbound::SyncPixels(pixels) => self.sync_pixels(&pixels),
            Inbound::SelectColor(color) => self.select_color(color),
            Inbound::ClearOverlay => self.clear_overlay(),
        }
    }

    /// Decode and apply a named channel event.
    ///
    /// In strict mode a rejected event is returned to the caller; otherwise
    /// it is logged and dropped so the channel keeps flowing.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the decode or handler error.
    pub fn handle_event(&mut self, name: &str, payload: Value) -> Result<(), GridError> {
        let result = Inbound::decode(name, payload).and_then(|event| self.dispatch(event));
        match result {
            Err(e) if !self.strict => {
                tracing::warn!(event = name, error = %e, "dropping inbound event");
                Ok(())
            }
            other => other,
        }
    }

    // --- Pointer / zoom ---

    /// Select the cell under the pointer.
    ///
    /// Clears the overlay, maps the pointer through the current scale,
    /// repaints the highlight and only then pushes `select_pixel`. A pointer
    /// outside the grid leaves the overlay cleared, keeps the previous
    /// selection and emits nothing.
    ///
    /// # Errors
    ///
    /// Returns the overlay backend's error or [`GridError::ChannelClosed`]
    /// if the event could not be pushed.
    pub fn on_click(&mut self, pointer: Point, canvas_origin: Point) -> Result<Option<Cell>, GridError> {
        self.surface.clear_overlay()?;

        let scale = self.zoom.scale();
        let size = self.surface.grid().size();
        let Some(cell) = mapper::map_pointer_to_grid(pointer, canvas_origin, scale).and_then(|p| p.cell(size))
        else {
            tracing::debug!(x = pointer.x, y = pointer.y, scale, "click outside grid ignored");
            return Ok(None);
        };

        self.selected = cell;
        self.surface.paint_overlay(cell, self.selected_color)?;
        self.channel.push(Outbound::select_pixel(cell))?;
        Ok(Some(cell))
    }

    /// Record a scale-changed event from the pan/zoom host; returns the readout.
    pub fn on_scale_changed(&mut self, scale: f64) -> &str {
        self.readout.on_scale_changed(scale)
    }

    // --- Snapshot ---

    /// Mark a snapshot fetch as issued. Live writes are journaled from here on.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LoadInProgress`] if a previous load has not finished.
    pub fn begin_load(&mut self) -> Result<LoadTicket, GridError> {
        if matches!(self.load, LoadState::Pending { .. }) {
            return Err(GridError::LoadInProgress);
        }
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.load = LoadState::Pending { ticket, journal: Vec::new() };
        Ok(ticket)
    }

    /// Complete a fetch started with [`Self::begin_load`].
    ///
    /// On success the snapshot replaces the base layer and writes received
    /// during the fetch are replayed on top. On failure the base layer keeps
    /// whatever it already holds.
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged, or [`LoadError::Grid`] if the
    /// ticket is stale or the snapshot does not fit the grid.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Snapshot, LoadError>) -> Result<(), LoadError> {
        let journal = match std::mem::take(&mut self.load) {
            LoadState::Pending { ticket: pending, journal } if pending == ticket => journal,
            other => {
                self.load = other;
                return Err(GridError::NoLoadPending.into());
            }
        };

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(grid = self.grid().id(), error = %e, "snapshot load failed");
                return Err(e);
            }
        };

        self.surface.load_snapshot(snapshot.as_bytes())?;
        let replayed = journal.len();
        for (cell, color) in journal {
            self.surface.write_pixel(i64::from(cell.x), i64::from(cell.y), color)?;
        }
        tracing::info!(grid = self.grid().id(), replayed, "snapshot loaded");
        Ok(())
    }

    fn journal(&mut self, cell: Cell, color: Rgba) {
        if let LoadState::Pending { journal, .. } = &mut self.load {
            journal.push((cell, color));
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.surface.grid()
    }

    #[must_use]
    pub fn surface(&self) -> &RenderSurface<B, O> {
        &self.surface
    }

    #[must_use]
    pub fn selected_cell(&self) -> Cell {
        self.selected
    }

    #[must_use]
    pub fn selected_color(&self) -> Rgba {
        self.selected_color
    }

    #[must_use]
    pub fn zoom_text(&self) -> &str {
        self.readout.text()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Pending { .. })
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }
}
