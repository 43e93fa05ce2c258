use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use tokio::sync::Notify;

use super::*;
use crate::event::{Outbound, PixelWrite};
use crate::grid::Rgba;
use crate::raster::Raster;
use crate::view::GridView;

// =============================================================
// Helpers
// =============================================================

const SIZE: u32 = 8;

fn pattern(size: u32) -> Vec<u8> {
    (0..crate::grid::raster_len(size).unwrap()).map(|i| (i % 251) as u8).collect()
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config_for(base_url: String, cookie: Option<&str>) -> Config {
    Config { base_url, session_cookie: cookie.map(str::to_owned), ..Config::default() }
}

async fn pixels(Path(id): Path<String>, headers: HeaderMap) -> (StatusCode, Vec<u8>) {
    if id != "place-7" {
        return (StatusCode::NOT_FOUND, Vec::new());
    }
    let authed = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("_place_key=s3cret"));
    if !authed {
        return (StatusCode::UNAUTHORIZED, Vec::new());
    }
    (StatusCode::OK, pattern(SIZE))
}

fn grid() -> Grid {
    Grid::new("place-7", SIZE).unwrap()
}

// =============================================================
// Snapshot
// =============================================================

#[test]
fn snapshot_new_checks_length() {
    let grid = grid();
    assert!(Snapshot::new(&grid, pattern(SIZE)).is_ok());
    let err = Snapshot::new(&grid, vec![0; 255]).unwrap_err();
    assert!(matches!(err, LoadError::Length { expected: 256, actual: 255 }));
}

#[test]
fn endpoint_formats_path() {
    let loader = SnapshotLoader::new(&config_for("https://place.example/".into(), None)).unwrap();
    assert_eq!(loader.endpoint(&grid()), "https://place.example/api/places/place-7/pixels");
}

// =============================================================
// fetch
// =============================================================

#[tokio::test]
async fn fetch_returns_snapshot_bytes() {
    let base = serve(Router::new().route("/api/places/{id}/pixels", get(pixels))).await;
    let loader = SnapshotLoader::new(&config_for(base, Some("_place_key=s3cret"))).unwrap();

    let snapshot = loader.fetch(&grid()).await.unwrap();
    assert_eq!(snapshot.size(), SIZE);
    assert_eq!(snapshot.as_bytes(), pattern(SIZE).as_slice());
}

#[tokio::test]
async fn fetch_without_session_is_status_error() {
    let base = serve(Router::new().route("/api/places/{id}/pixels", get(pixels))).await;
    let loader = SnapshotLoader::new(&config_for(base, None)).unwrap();

    let err = loader.fetch(&grid()).await.unwrap_err();
    assert!(matches!(err, LoadError::Status { status: 401 }));
}

#[tokio::test]
async fn fetch_unknown_grid_is_status_error() {
    let base = serve(Router::new().route("/api/places/{id}/pixels", get(pixels))).await;
    let loader = SnapshotLoader::new(&config_for(base, Some("_place_key=s3cret"))).unwrap();

    let other = Grid::new("nope", SIZE).unwrap();
    let err = loader.fetch(&other).await.unwrap_err();
    assert!(matches!(err, LoadError::Status { status: 404 }));
}

#[tokio::test]
async fn fetch_short_body_is_length_error() {
    let app = Router::new().route("/api/places/{id}/pixels", get(|| async { vec![1u8; 10] }));
    let base = serve(app).await;
    let loader = SnapshotLoader::new(&config_for(base, None)).unwrap();

    let err = loader.fetch(&grid()).await.unwrap_err();
    assert!(matches!(err, LoadError::Length { expected: 256, actual: 10 }));
}

#[tokio::test]
async fn fetch_unreachable_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let loader = SnapshotLoader::new(&config_for(format!("http://{addr}"), None)).unwrap();

    let err = loader.fetch(&grid()).await.unwrap_err();
    assert!(matches!(err, LoadError::Request(_)));
}

// =============================================================
// Live events during an outstanding fetch
// =============================================================

async fn gated_pixels(State(gate): State<Arc<Notify>>) -> Vec<u8> {
    gate.notified().await;
    Rgba::new(0, 0, 255, 255).bytes().repeat((SIZE * SIZE) as usize)
}

#[tokio::test]
async fn set_pixel_applies_while_fetch_is_outstanding() {
    let gate = Arc::new(Notify::new());
    let app = Router::new()
        .route("/api/places/{id}/pixels", get(gated_pixels))
        .with_state(Arc::clone(&gate));
    let base = serve(app).await;
    let loader = SnapshotLoader::new(&config_for(base, None)).unwrap();

    let grid = grid();
    let mut view =
        GridView::new(grid.clone(), Raster::for_grid(&grid), Raster::for_grid(&grid), 1.0, Vec::<Outbound>::new()).unwrap();
    let ticket = view.begin_load().unwrap();

    let fetch = loader.fetch(&grid);
    tokio::pin!(fetch);
    tokio::select! {
        biased;
        _ = &mut fetch => panic!("fetch resolved before the server released it"),
        () = tokio::time::sleep(Duration::from_millis(50)) => {}
    }

    let red = Rgba::new(255, 0, 0, 255);
    view.set_pixel(PixelWrite::new(5, 5, red)).unwrap();
    assert_eq!(view.surface().base().pixel(5, 5), Some(red));
    assert!(view.is_loading());

    gate.notify_one();
    let result = fetch.await;
    view.finish_load(ticket, result).unwrap();

    assert_eq!(view.surface().base().pixel(5, 5), Some(red));
    assert_eq!(view.surface().base().pixel(0, 0), Some(Rgba::new(0, 0, 255, 255)));
}
