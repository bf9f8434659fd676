// Gameplay-rule tests over the pure interaction logic: drop matching, phase
// completion, bubble motion and culling, collision overlap, and drag clamping.
// Native-friendly; no browser APIs involved.

use bubble_doll::game::bubbles::{BubbleBody, EXIT_MARGIN};
use bubble_doll::game::geometry::{Rect, clamp_axis};
use bubble_doll::game::rng::FrameRng;
use bubble_doll::game::wardrobe::{ItemKind, Outfit};
use bubble_doll::game::{DropOutcome, evaluate_drop};

const ZONES: [ItemKind; 2] = [ItemKind::Hat, ItemKind::Shirt];

#[test]
fn dressing_scenario_hat_and_shirt() {
    let mut outfit = Outfit::new();

    // Wrong zone first: rejected, nothing dressed.
    assert_eq!(
        evaluate_drop(&mut outfit, ItemKind::Hat, Some("shirt"), ZONES.len()),
        DropOutcome::Mismatch
    );
    assert_eq!(outfit.attached_count(), 0);

    // Matching drop: dressed count 1, wardrobe not yet complete.
    assert_eq!(
        evaluate_drop(&mut outfit, ItemKind::Hat, Some("hat"), ZONES.len()),
        DropOutcome::Attached {
            wardrobe_complete: false
        }
    );
    assert_eq!(outfit.attached_count(), 1);

    // Final zone: completion fires on this drop.
    assert_eq!(
        evaluate_drop(&mut outfit, ItemKind::Shirt, Some("shirt"), ZONES.len()),
        DropOutcome::Attached {
            wardrobe_complete: true
        }
    );
    assert_eq!(outfit.attached_count(), 2);
}

#[test]
fn completion_cannot_fire_twice() {
    let mut outfit = Outfit::new();
    for zone in ZONES {
        evaluate_drop(&mut outfit, zone, Some(zone.tag()), ZONES.len());
    }
    // Any further drop, duplicate or mismatched, never reports Attached again.
    assert_eq!(
        evaluate_drop(&mut outfit, ItemKind::Hat, Some("hat"), ZONES.len()),
        DropOutcome::AlreadyAttached
    );
    assert_eq!(
        evaluate_drop(&mut outfit, ItemKind::Shirt, Some("hat"), ZONES.len()),
        DropOutcome::Mismatch
    );
    assert_eq!(outfit.attached_count(), 2);
}

#[test]
fn bubbles_enter_above_the_top_edge_and_only_float_up() {
    let mut rng = FrameRng::seeded(2024);
    for _ in 0..100 {
        let mut body = BubbleBody::spawn(&mut rng);
        assert_eq!(body.top, -body.size);
        let mut previous = body.top;
        while !body.has_exited(240.0) {
            body.advance();
            assert!(body.top > previous);
            previous = body.top;
        }
        // Exit only happens past the bottom edge plus the fixed margin.
        assert!(body.top > 240.0 + EXIT_MARGIN);
    }
}

#[test]
fn arm_overlap_uses_strict_bounds() {
    let arm = Rect::from_size(100.0, 100.0, 120.0, 40.0);
    let touching = Rect::from_size(220.0, 100.0, 30.0, 30.0);
    assert!(!arm.overlaps(&touching));
    let grazing = Rect::from_size(219.9, 100.0, 30.0, 30.0);
    assert!(arm.overlaps(&grazing));
    let above = Rect::from_size(100.0, 30.0, 30.0, 70.0);
    assert!(!arm.overlaps(&above));
}

#[test]
fn dragged_arm_stays_inside_the_play_area() {
    // Screen-space layout: play area and the doll's positioning origin.
    let layer = Rect::from_size(100.0, 50.0, 400.0, 300.0);
    let (doll_left, doll_top) = (80.0, 40.0);
    let (arm_width, arm_height) = (120.0, 40.0);
    let offset = (25.0, 10.0);

    for pointer_x in [-1000.0, 0.0, 120.0, 300.0, 499.0, 5000.0] {
        for pointer_y in [-1000.0, 0.0, 60.0, 200.0, 349.0, 5000.0] {
            let left = clamp_axis(
                pointer_x - doll_left - offset.0,
                layer.left - doll_left,
                layer.right - doll_left - arm_width,
            );
            let top = clamp_axis(
                pointer_y - doll_top - offset.1,
                layer.top - doll_top,
                layer.bottom - doll_top - arm_height,
            );
            // Back to screen space: the arm box must sit fully inside the layer.
            assert!(doll_left + left >= layer.left);
            assert!(doll_left + left + arm_width <= layer.right);
            assert!(doll_top + top >= layer.top);
            assert!(doll_top + top + arm_height <= layer.bottom);
        }
    }
}
