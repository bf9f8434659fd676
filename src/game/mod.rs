//! Interaction core for the dress-up / bubble-pop session.
//!
//! The game has two phases. While dressing, clothing elements are dragged
//! onto matching drop zones; once every zone is occupied the session flips to
//! the bubble phase, where a fixed-interval spawner and a frame loop float
//! bubbles up through the play area and the player drags the doll's arm to
//! pop them on contact.
//!
//! All mutable state lives in a single `GameSession` stored in a thread-local
//! cell; browser dispatch is single-threaded, so each event closure borrows
//! it for the duration of one callback and no further locking is needed.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, console, window};

pub mod bubbles;
pub mod geometry;
pub mod pointer;
pub mod rng;
pub mod wardrobe;

use bubbles::BubbleBody;
use geometry::{Point, Rect, clamp_axis};
use rng::FrameRng;
use wardrobe::{ItemKind, Outfit};

// --- Status Messages ---------------------------------------------------------
// Single text region, last write wins. Mismatches and premature arm drags are
// expected player states, not errors.

const MSG_MISMATCH: &str = "Try dropping it on the matching spot!";
const MSG_KEEP_GOING: &str = "Great! Keep dressing the doll.";
const MSG_BUBBLES: &str = "Bubbles are here! Drag the arm to pop them!";
const MSG_DRESS_FIRST: &str = "Dress the doll first so you can pop bubbles!";

// --- Session State -----------------------------------------------------------

/// Game phase. One-way: dressing until every zone is occupied, then bubbles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Dressing,
    BubblesActive,
}

/// A draggable clothing element, tagged with its kind at construction.
struct ClothingItem {
    kind: ItemKind,
    el: HtmlElement,
}

/// A drop target accepting exactly one clothing kind.
struct DropZone {
    kind: ItemKind,
    el: Element,
    occupied: bool,
}

/// A live bubble: numeric body plus its DOM element. The id resolves the
/// deferred pop removal against the live set.
struct Bubble {
    id: u64,
    body: BubbleBody,
    el: HtmlElement,
}

#[derive(Default)]
struct ArmDrag {
    dragging: bool,
    /// Offset between the initial press point and the arm's top-left corner.
    offset: Point,
}

/// Owns the recurring activities of the bubble phase so they can be halted
/// deterministically. `begin` is only reached once (guarded by the mode flag).
struct Lifecycle {
    running: bool,
    spawn_timer: Option<i32>,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            running: false,
            spawn_timer: None,
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn begin(&mut self, spawn_timer: Option<i32>) {
        self.running = true;
        self.spawn_timer = spawn_timer;
    }

    fn halt(&mut self) {
        self.running = false;
        if let Some(handle) = self.spawn_timer.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(handle);
            }
        }
    }
}

/// All per-page game state, constructed once by [`start`].
struct GameSession {
    doc: Document,
    status: Element,
    layer: HtmlElement,
    doll: HtmlElement,
    arm: HtmlElement,
    items: Vec<ClothingItem>,
    zones: Vec<DropZone>,
    outfit: Outfit,
    mode: GameMode,
    bubbles: Vec<Bubble>,
    next_bubble_id: u64,
    rng: FrameRng,
    arm_drag: ArmDrag,
    lifecycle: Lifecycle,
}

impl GameSession {
    fn set_status(&self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    /// Visual side of a successful attach: freeze the clothing element and
    /// append the labeled marker into the zone.
    fn render_attachment(&mut self, kind: ItemKind) {
        if let Some(item) = self.items.iter().find(|item| item.kind == kind) {
            item.el.set_attribute("draggable", "false").ok();
            let style = item.el.style();
            style.set_property("opacity", "0.6").ok();
            style.set_property("cursor", "default").ok();
        }
        if let Some(zone) = self
            .zones
            .iter_mut()
            .find(|zone| zone.kind == kind && !zone.occupied)
        {
            zone.occupied = true;
            if let Ok(marker) = self.doc.create_element("div") {
                marker.set_class_name(&format!("dressed-item {}", kind.tag()));
                marker.set_text_content(Some(kind.label()));
                zone.el.append_child(&marker).ok();
            }
        }
    }
}

thread_local! {
    static SESSION: RefCell<Option<GameSession>> = RefCell::new(None);
}

// --- Setup -------------------------------------------------------------------

/// Build the session from the page surface and wire all listeners. Fails when
/// the surface is missing or carries a tag outside the clothing catalogue.
pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let status = doc
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("missing #status"))?;
    let layer: HtmlElement = doc
        .get_element_by_id("bubble-layer")
        .ok_or_else(|| JsValue::from_str("missing #bubble-layer"))?
        .dyn_into()?;
    let doll: HtmlElement = doc
        .get_element_by_id("doll")
        .ok_or_else(|| JsValue::from_str("missing #doll"))?
        .dyn_into()?;
    let arm: HtmlElement = doc
        .get_element_by_id("doll-arm")
        .ok_or_else(|| JsValue::from_str("missing #doll-arm"))?
        .dyn_into()?;

    let items = collect_clothing(&doc)?;
    let zones = collect_zones(&doc)?;

    for item in &items {
        wire_clothing_item(item)?;
    }
    for zone in &zones {
        wire_zone(zone.kind, &zone.el)?;
    }
    wire_arm(&win, &arm)?;

    let rng = FrameRng::from_entropy()
        .map_err(|e| JsValue::from_str(&format!("rng init failed: {e}")))?;

    let session = GameSession {
        doc,
        status,
        layer,
        doll,
        arm,
        items,
        zones,
        outfit: Outfit::new(),
        mode: GameMode::Dressing,
        bubbles: Vec::new(),
        next_bubble_id: 0,
        rng,
        arm_drag: ArmDrag::default(),
        lifecycle: Lifecycle::new(),
    };
    SESSION.with(|cell| cell.replace(Some(session)));

    console::log_1(&JsValue::from_str("dress-up session ready"));
    Ok(())
}

/// Halt the spawner interval and stop the frame loop from rescheduling. The
/// mode stays `BubblesActive`; there is no reverse phase transition.
pub fn shutdown() {
    SESSION.with(|cell| {
        if let Some(session) = cell.borrow_mut().as_mut() {
            if session.lifecycle.is_running() {
                session.lifecycle.halt();
                console::log_1(&JsValue::from_str("bubble phase halted"));
            }
        }
    });
}

fn collect_clothing(doc: &Document) -> Result<Vec<ClothingItem>, JsValue> {
    let list = doc.query_selector_all(".clothing")?;
    let mut items = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        let node = match list.get(i) {
            Some(node) => node,
            None => continue,
        };
        let el: HtmlElement = node.dyn_into()?;
        let tag = el
            .get_attribute("data-item")
            .ok_or_else(|| JsValue::from_str("clothing element without data-item tag"))?;
        let kind = ItemKind::from_tag(&tag)
            .ok_or_else(|| JsValue::from_str(&format!("unknown clothing tag: {tag}")))?;
        items.push(ClothingItem { kind, el });
    }
    Ok(items)
}

fn collect_zones(doc: &Document) -> Result<Vec<DropZone>, JsValue> {
    let list = doc.query_selector_all(".drop-zone")?;
    let mut zones = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        let node = match list.get(i) {
            Some(node) => node,
            None => continue,
        };
        let el: Element = node.dyn_into()?;
        let tag = el
            .get_attribute("data-zone")
            .ok_or_else(|| JsValue::from_str("drop zone without data-zone tag"))?;
        let kind = ItemKind::from_tag(&tag)
            .ok_or_else(|| JsValue::from_str(&format!("unknown zone tag: {tag}")))?;
        zones.push(DropZone {
            kind,
            el,
            occupied: false,
        });
    }
    Ok(zones)
}

// --- Drag-and-Drop Matcher ---------------------------------------------------

fn wire_clothing_item(item: &ClothingItem) -> Result<(), JsValue> {
    let tag = item.kind.tag();
    let closure = Closure::wrap(Box::new(move |evt: web_sys::DragEvent| {
        if let Some(transfer) = evt.data_transfer() {
            transfer.set_data("text/plain", tag).ok();
        }
    }) as Box<dyn FnMut(_)>);
    item.el
        .add_event_listener_with_callback("dragstart", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_zone(zone_kind: ItemKind, zone_el: &Element) -> Result<(), JsValue> {
    // Hover highlight is presentation only; no session state involved.
    {
        let el = zone_el.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::DragEvent| {
            evt.prevent_default();
            el.class_list().add_1("active").ok();
        }) as Box<dyn FnMut(_)>);
        zone_el.add_event_listener_with_callback("dragover", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let el = zone_el.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::DragEvent| {
            el.class_list().remove_1("active").ok();
        }) as Box<dyn FnMut(_)>);
        zone_el.add_event_listener_with_callback("dragleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let el = zone_el.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::DragEvent| {
            evt.prevent_default();
            el.class_list().remove_1("active").ok();
            let payload = evt
                .data_transfer()
                .and_then(|transfer| transfer.get_data("text/plain").ok());
            SESSION.with(|cell| {
                if let Some(session) = cell.borrow_mut().as_mut() {
                    handle_drop(session, zone_kind, payload.as_deref());
                }
            });
        }) as Box<dyn FnMut(_)>);
        zone_el.add_event_listener_with_callback("drop", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Outcome of a drop gesture over a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Payload missing, unknown, or not the kind this zone accepts.
    Mismatch,
    /// Matching kind but already worn; the drop is silently ignored.
    AlreadyAttached,
    Attached { wardrobe_complete: bool },
}

/// Pure matcher rule: validate the payload against the zone and record the
/// attachment. `wardrobe_complete` becomes true on the drop that occupies the
/// final zone.
pub fn evaluate_drop(
    outfit: &mut Outfit,
    zone_kind: ItemKind,
    payload: Option<&str>,
    zone_count: usize,
) -> DropOutcome {
    match payload.and_then(ItemKind::from_tag) {
        Some(kind) if kind == zone_kind => {
            if outfit.attach(kind) {
                DropOutcome::Attached {
                    wardrobe_complete: outfit.attached_count() == zone_count,
                }
            } else {
                DropOutcome::AlreadyAttached
            }
        }
        _ => DropOutcome::Mismatch,
    }
}

fn handle_drop(session: &mut GameSession, zone_kind: ItemKind, payload: Option<&str>) {
    let zone_count = session.zones.len();
    match evaluate_drop(&mut session.outfit, zone_kind, payload, zone_count) {
        DropOutcome::Mismatch => session.set_status(MSG_MISMATCH),
        DropOutcome::AlreadyAttached => {}
        DropOutcome::Attached { wardrobe_complete } => {
            session.render_attachment(zone_kind);
            if wardrobe_complete {
                start_bubbles(session);
            } else {
                session.set_status(MSG_KEEP_GOING);
            }
        }
    }
}

// --- Bubble Spawner & Animation Loop -----------------------------------------

/// Enter the bubble phase: start the spawn interval and the frame loop.
/// Idempotent; the mode flag guards against a second startup.
fn start_bubbles(session: &mut GameSession) {
    if session.mode == GameMode::BubblesActive {
        return;
    }
    session.mode = GameMode::BubblesActive;
    session.set_status(MSG_BUBBLES);
    console::log_1(&JsValue::from_str("bubble phase started"));

    let closure = Closure::wrap(Box::new(move || {
        SESSION.with(|cell| {
            if let Some(session) = cell.borrow_mut().as_mut() {
                spawn_bubble(session);
            }
        });
    }) as Box<dyn FnMut()>);
    let timer = window().and_then(|win| {
        win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            bubbles::SPAWN_INTERVAL_MS,
        )
        .ok()
    });
    closure.forget();

    session.lifecycle.begin(timer);
    start_frame_loop();
}

fn spawn_bubble(session: &mut GameSession) {
    if !session.lifecycle.is_running() {
        return;
    }
    let body = BubbleBody::spawn(&mut session.rng);
    let el = match session.doc.create_element("div") {
        Ok(el) => el,
        Err(_) => return,
    };
    el.set_class_name("bubble");
    el.set_attribute(
        "style",
        &format!(
            "width:{size}px; height:{size}px; left:{left}%; top:{top}px;",
            size = body.size,
            left = body.left_pct,
            top = body.top
        ),
    )
    .ok();
    let el: HtmlElement = match el.dyn_into() {
        Ok(el) => el,
        Err(_) => return,
    };
    if session.layer.append_child(&el).is_err() {
        return;
    }
    let id = session.next_bubble_id;
    session.next_bubble_id += 1;
    session.bubbles.push(Bubble { id, body, el });
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let keep_going = SESSION.with(|cell| match cell.borrow_mut().as_mut() {
            Some(session) if session.lifecycle.is_running() => {
                tick(session);
                true
            }
            _ => false,
        });
        if keep_going {
            if let Some(win) = window() {
                let _ = win
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(win) = window() {
        let _ = win.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// One animation frame: advance every bubble, cull the ones that left through
/// the bottom, then run the pop detector against the arm's current box.
fn tick(session: &mut GameSession) {
    let area_height = session.layer.offset_height() as f64;
    for bubble in session.bubbles.iter_mut() {
        bubble.body.advance();
        bubble
            .el
            .style()
            .set_property("top", &format!("{}px", bubble.body.top))
            .ok();
    }
    session.bubbles.retain(|bubble| {
        if bubble.body.has_exited(area_height) {
            bubble.el.remove();
            false
        } else {
            true
        }
    });
    check_pops(session);
}

// --- Collision / Pop Detector ------------------------------------------------

fn client_rect(el: &Element) -> Rect {
    let rect = el.get_bounding_client_rect();
    Rect {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

fn check_pops(session: &mut GameSession) {
    let arm_box = client_rect(&session.arm);
    for bubble in session.bubbles.iter_mut() {
        if bubble.body.popped {
            continue;
        }
        if arm_box.overlaps(&client_rect(&bubble.el)) {
            bubble.body.popped = true;
            bubble.el.class_list().add_1("pop").ok();
            schedule_pop_removal(bubble.id);
        }
    }
}

/// Fire-and-forget removal once the pop effect has played. The popped flag
/// keeps the detector from scheduling this twice; a timeout firing after the
/// bubble already left the live set is a no-op.
fn schedule_pop_removal(id: u64) {
    let callback = Closure::once_into_js(move || {
        SESSION.with(|cell| {
            if let Some(session) = cell.borrow_mut().as_mut() {
                if let Some(pos) = session.bubbles.iter().position(|bubble| bubble.id == id) {
                    let bubble = session.bubbles.remove(pos);
                    bubble.el.remove();
                }
            }
        });
    });
    if let Some(win) = window() {
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            bubbles::POP_DELAY_MS,
        );
    }
}

// --- Arm Drag Controller -----------------------------------------------------

fn wire_arm(win: &web_sys::Window, arm: &HtmlElement) -> Result<(), JsValue> {
    {
        let closure = Closure::wrap(Box::new(on_arm_press) as Box<dyn FnMut(web_sys::Event)>);
        arm.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // One move handler serves both pointer and touch streams; the adapter in
    // `pointer` hides the difference.
    {
        let closure = Closure::wrap(Box::new(on_arm_move) as Box<dyn FnMut(web_sys::Event)>);
        win.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        win.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(on_arm_release) as Box<dyn FnMut(web_sys::Event)>);
        win.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        win.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn on_arm_press(evt: web_sys::Event) {
    SESSION.with(|cell| {
        if let Some(session) = cell.borrow_mut().as_mut() {
            if session.mode != GameMode::BubblesActive {
                session.set_status(MSG_DRESS_FIRST);
                return;
            }
            let point = match pointer::event_point(&evt) {
                Some(point) => point,
                None => return,
            };
            let arm_box = client_rect(&session.arm);
            session.arm_drag.dragging = true;
            session.arm_drag.offset = Point {
                x: point.x - arm_box.left,
                y: point.y - arm_box.top,
            };
            if let Some(pointer_evt) = evt.dyn_ref::<web_sys::PointerEvent>() {
                session.arm.set_pointer_capture(pointer_evt.pointer_id()).ok();
            }
        }
    });
}

fn on_arm_move(evt: web_sys::Event) {
    SESSION.with(|cell| {
        if let Some(session) = cell.borrow_mut().as_mut() {
            if !session.arm_drag.dragging {
                return;
            }
            let point = match pointer::event_point(&evt) {
                Some(point) => point,
                None => return,
            };
            let doll_box = client_rect(&session.doll);
            let layer_box = client_rect(&session.layer);
            let arm_width = session.arm.offset_width() as f64;
            let arm_height = session.arm.offset_height() as f64;
            // Position is doll-local; bounds come from the bubble layer so the
            // arm stays fully inside the play area.
            let left = clamp_axis(
                point.x - doll_box.left - session.arm_drag.offset.x,
                layer_box.left - doll_box.left,
                layer_box.right - doll_box.left - arm_width,
            );
            let top = clamp_axis(
                point.y - doll_box.top - session.arm_drag.offset.y,
                layer_box.top - doll_box.top,
                layer_box.bottom - doll_box.top - arm_height,
            );
            let style = session.arm.style();
            style.set_property("left", &format!("{left}px")).ok();
            style.set_property("top", &format!("{top}px")).ok();
        }
    });
}

fn on_arm_release(_evt: web_sys::Event) {
    SESSION.with(|cell| {
        if let Some(session) = cell.borrow_mut().as_mut() {
            session.arm_drag.dragging = false;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_payload_changes_nothing() {
        let mut outfit = Outfit::new();
        let outcome = evaluate_drop(&mut outfit, ItemKind::Hat, Some("shirt"), 2);
        assert_eq!(outcome, DropOutcome::Mismatch);
        assert_eq!(outfit.attached_count(), 0);
    }

    #[test]
    fn empty_payload_is_a_mismatch() {
        let mut outfit = Outfit::new();
        assert_eq!(
            evaluate_drop(&mut outfit, ItemKind::Hat, Some(""), 2),
            DropOutcome::Mismatch
        );
        assert_eq!(
            evaluate_drop(&mut outfit, ItemKind::Hat, None, 2),
            DropOutcome::Mismatch
        );
    }

    #[test]
    fn duplicate_attach_is_silent() {
        let mut outfit = Outfit::new();
        assert_eq!(
            evaluate_drop(&mut outfit, ItemKind::Hat, Some("hat"), 2),
            DropOutcome::Attached {
                wardrobe_complete: false
            }
        );
        assert_eq!(
            evaluate_drop(&mut outfit, ItemKind::Hat, Some("hat"), 2),
            DropOutcome::AlreadyAttached
        );
        assert_eq!(outfit.attached_count(), 1);
    }

    #[test]
    fn final_zone_completes_the_wardrobe() {
        let mut outfit = Outfit::new();
        assert_eq!(
            evaluate_drop(&mut outfit, ItemKind::Hat, Some("hat"), 2),
            DropOutcome::Attached {
                wardrobe_complete: false
            }
        );
        assert_eq!(
            evaluate_drop(&mut outfit, ItemKind::Shirt, Some("shirt"), 2),
            DropOutcome::Attached {
                wardrobe_complete: true
            }
        );
    }
}
