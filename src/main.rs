//! Headless host for a grid view.
//!
//! Fetches the grid snapshot while reading newline-delimited JSON from stdin:
//!
//! - `{"event": "set_pixel", "payload": {...}}`: an inbound channel event
//! - `{"click": {"x": 54, "y": 74, "origin_x": 10, "origin_y": 10}}`: a pointer click
//! - `{"scale": 2.0}`: a scale-changed event from the pan/zoom host
//!
//! Outbound channel events are written to stdout as `{"event", "payload"}` lines.

use std::cell::Cell;
use std::rc::Rc;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use place::channel::EventSink;
use place::config::{self, Config};
use place::event::{Envelope, Outbound};
use place::loader::SnapshotLoader;
use place::mapper::{Point, ScaleProvider};
use place::raster::{Raster, Surface};
use place::view::GridView;

#[derive(Debug, Deserialize)]
struct ClickInput {
    x: f64,
    y: f64,
    #[serde(default)]
    origin_x: f64,
    #[serde(default)]
    origin_y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostInput {
    Event(Envelope),
    Click { click: ClickInput },
    Scale { scale: f64 },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = Config::from_env()?;
    let grid = config::grid_from_lookup(config::env_var)?;
    let loader = SnapshotLoader::new(&config)?;

    let zoom = Rc::new(Cell::new(1.0));
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
    let (base, overlay) = (Raster::for_grid(&grid), Raster::for_grid(&grid));
    let mut view = GridView::new(grid.clone(), base, overlay, Rc::clone(&zoom), tx)?.strict(config.strict_events);

    tracing::info!(grid = grid.id(), size = grid.size(), url = %loader.endpoint(&grid), "place view starting");

    let mut pending = Some(view.begin_load()?);
    let fetch = loader.fetch(&grid);
    tokio::pin!(fetch);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            result = &mut fetch, if pending.is_some() => {
                if let Some(ticket) = pending.take() {
                    if let Err(e) = view.finish_load(ticket, result) {
                        tracing::error!(error = %e, "snapshot unavailable, continuing with live updates only");
                    }
                }
            }
            Some(event) = rx.recv() => print_outbound(&event)?,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                apply_line(&mut view, &zoom, &line);
            }
        }
    }

    if let Some(ticket) = pending.take() {
        if let Err(e) = view.finish_load(ticket, fetch.await) {
            tracing::error!(error = %e, "snapshot unavailable");
        }
    }
    while let Ok(event) = rx.try_recv() {
        print_outbound(&event)?;
    }

    tracing::info!(
        painted = view.surface().base().painted_cells().len(),
        selected_x = view.selected_cell().x,
        selected_y = view.selected_cell().y,
        "input closed"
    );
    Ok(())
}

fn apply_line<B, O, C>(view: &mut GridView<B, O, Rc<Cell<f64>>, C>, zoom: &Cell<f64>, line: &str)
where
    B: Surface,
    O: Surface,
    C: EventSink,
{
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    let input = match serde_json::from_str::<HostInput>(line) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "unrecognised host input");
            return;
        }
    };

    match input {
        HostInput::Event(Envelope { event, payload }) => {
            if let Err(e) = view.handle_event(&event, payload) {
                tracing::error!(event = %event, error = %e, "inbound event rejected");
            }
        }
        HostInput::Click { click } => {
            let pointer = Point::new(click.x, click.y);
            let origin = Point::new(click.origin_x, click.origin_y);
            match view.on_click(pointer, origin) {
                Ok(Some(cell)) => tracing::debug!(x = cell.x, y = cell.y, "cell selected"),
                Ok(None) => tracing::debug!(scale = zoom.scale(), "click outside grid"),
                Err(e) => tracing::error!(error = %e, "selection failed"),
            }
        }
        HostInput::Scale { scale } => {
            zoom.set(scale);
            let text = view.on_scale_changed(scale);
            tracing::info!(zoom = text, "scale changed");
        }
    }
}

fn print_outbound(event: &Outbound) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(&event.envelope())?);
    Ok(())
}
