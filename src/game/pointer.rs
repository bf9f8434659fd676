//! Input normalization: mouse, pointer and touch events all reduce to a
//! single client-space point so the drag logic is device-agnostic.

use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent};

use super::geometry::Point;

/// Prefer the first active touch point; fall back to mouse/pointer
/// coordinates. Returns None for events carrying neither (e.g. touchend with
/// an empty touch list).
pub fn event_point(evt: &Event) -> Option<Point> {
    if let Some(touch_evt) = evt.dyn_ref::<TouchEvent>() {
        if let Some(touch) = touch_evt.touches().get(0) {
            return Some(Point {
                x: touch.client_x() as f64,
                y: touch.client_y() as f64,
            });
        }
    }
    evt.dyn_ref::<MouseEvent>().map(|mouse| Point {
        x: mouse.client_x() as f64,
        y: mouse.client_y() as f64,
    })
}
