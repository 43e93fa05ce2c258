#![allow(clippy::float_cmp)]

use super::*;

fn map(px: f64, py: f64, ox: f64, oy: f64, scale: f64) -> GridPoint {
    map_pointer_to_grid(Point::new(px, py), Point::new(ox, oy), scale).unwrap()
}

// --- map_pointer_to_grid ---

#[test]
fn maps_reference_example() {
    assert_eq!(map(54.0, 74.0, 10.0, 10.0, 2.0), GridPoint { x: 21, y: 31 });
}

#[test]
fn unit_scale_subtracts_one_pixel_inset() {
    assert_eq!(map(1.0, 1.0, 0.0, 0.0, 1.0), GridPoint { x: 0, y: 0 });
    assert_eq!(map(0.5, 0.5, 0.0, 0.0, 1.0), GridPoint { x: -1, y: -1 });
    assert_eq!(map(5.0, 8.0, 0.0, 0.0, 1.0), GridPoint { x: 4, y: 7 });
}

#[test]
fn visual_cell_center_maps_to_that_cell() {
    // Cell k spans [(k + 1) * s, (k + 2) * s) once the inset is applied.
    let s = 8.0;
    for k in 0..10 {
        let center = (f64::from(k) + 1.5) * s;
        assert_eq!(map(center, center, 0.0, 0.0, s), GridPoint { x: i64::from(k), y: i64::from(k) });
    }
}

#[test]
fn fractional_scale_floors() {
    // ((13 - 1.5) / 1.5) = 7.66..
    assert_eq!(map(13.0, 13.0, 0.0, 0.0, 1.5), GridPoint { x: 7, y: 7 });
}

#[test]
fn pointer_left_of_canvas_is_negative() {
    assert_eq!(map(0.0, 0.0, 10.0, 10.0, 2.0), GridPoint { x: -6, y: -6 });
}

#[test]
fn rejects_non_positive_or_non_finite_scale() {
    let p = Point::new(5.0, 5.0);
    let o = Point::new(0.0, 0.0);
    assert!(map_pointer_to_grid(p, o, 0.0).is_none());
    assert!(map_pointer_to_grid(p, o, -2.0).is_none());
    assert!(map_pointer_to_grid(p, o, f64::NAN).is_none());
    assert!(map_pointer_to_grid(p, o, f64::INFINITY).is_none());
}

#[test]
fn rejects_non_finite_pointer() {
    assert!(map_pointer_to_grid(Point::new(f64::INFINITY, 0.0), Point::new(0.0, 0.0), 1.0).is_none());
}

// --- GridPoint::cell ---

#[test]
fn cell_inside_bounds() {
    assert_eq!(GridPoint { x: 3, y: 4 }.cell(10), Some(Cell::new(3, 4)));
}

#[test]
fn cell_outside_bounds_is_none() {
    assert_eq!(GridPoint { x: -1, y: 4 }.cell(10), None);
    assert_eq!(GridPoint { x: 3, y: 10 }.cell(10), None);
    assert_eq!(GridPoint { x: i64::MAX, y: 0 }.cell(10), None);
}

// --- ScaleProvider ---

#[test]
fn shared_cell_scale_tracks_updates() {
    let shared = std::rc::Rc::new(std::cell::Cell::new(2.0));
    let provider = std::rc::Rc::clone(&shared);
    assert_eq!(provider.scale(), 2.0);
    shared.set(4.5);
    assert_eq!(provider.scale(), 4.5);
}

// --- ZoomReadout ---

#[test]
fn readout_defaults_to_identity() {
    let readout = ZoomReadout::default();
    assert_eq!(readout.text(), "1.00x");
    assert_eq!(readout.scale(), 1.0);
}

#[test]
fn readout_formats_two_decimals() {
    let mut readout = ZoomReadout::default();
    assert_eq!(readout.on_scale_changed(2.346), "2.35x");
    assert_eq!(readout.on_scale_changed(40.0), "40.00x");
    assert_eq!(readout.scale(), 40.0);
}
