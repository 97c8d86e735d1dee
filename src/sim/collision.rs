//! Bounding-box collision
//!
//! Rectangles are half-open, so boxes that only share an edge do not collide.

use super::entity::{Collidable, Rect};

/// True when the two rectangles overlap by at least one pixel on both axes
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left < b.right && b.left < a.right && a.top < b.bottom && b.top < a.bottom
}

pub fn collides(a: &impl Collidable, b: &impl Collidable) -> bool {
    intersects(&a.bounds(), &b.bounds())
}

/// Check `target` against a run of entities ordered by left edge.
///
/// Entities entirely left of the target are skipped and the scan stops at the
/// first one starting at or beyond the target's right edge. Returns the index
/// of the first hit.
pub fn first_hit_in_ordered<T: Collidable>(target: &Rect, ordered: &[T]) -> Option<usize> {
    ordered
        .iter()
        .enumerate()
        .take_while(|(_, e)| e.bounds().left < target.right)
        .filter(|(_, e)| e.bounds().right > target.left)
        .find(|(_, e)| intersects(target, &e.bounds()))
        .map(|(i, _)| i)
}

/// Unordered variant: every entity is tested
pub fn first_hit<T: Collidable>(target: &Rect, entities: &[T]) -> Option<usize> {
    entities
        .iter()
        .position(|e| intersects(target, &e.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Body;
    use glam::IVec2;
    use proptest::prelude::*;

    fn body(x: i32, y: i32, w: i32, h: i32) -> Body {
        Body::new(IVec2::new(x, y), IVec2::new(w, h)).unwrap()
    }

    #[test]
    fn test_shared_edge_is_not_a_collision() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        assert!(!intersects(&a, &b));
        assert!(!intersects(&b, &a));

        let below = Rect::new(0, 10, 10, 20);
        assert!(!intersects(&a, &below));
    }

    #[test]
    fn test_one_pixel_overlap_collides() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 20, 20);
        assert!(intersects(&a, &b));
        assert!(collides(&body(0, 0, 10, 10), &body(9, 0, 10, 10)));
    }

    #[test]
    fn test_containment_collides() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 50, 50);
        assert!(intersects(&outer, &inner));
        assert!(intersects(&inner, &outer));
    }

    #[test]
    fn test_ordered_scan_finds_hit() {
        let walls: Vec<Body> = (0..10).map(|i| body(i * 20, 0, 20, 30 + i)).collect();
        let player = Rect::new(100, 35, 164, 60);
        // Segment 5 spans x 100..120 with height 35: touches only the top edge
        assert_eq!(first_hit_in_ordered(&player, &walls), Some(6));
        assert_eq!(first_hit(&player, &walls), Some(6));
    }

    #[test]
    fn test_ordered_scan_miss() {
        let walls: Vec<Body> = (0..10).map(|i| body(i * 20, 0, 20, 10)).collect();
        let player = Rect::new(100, 50, 164, 75);
        assert_eq!(first_hit_in_ordered(&player, &walls), None);
    }

    proptest! {
        #[test]
        fn prop_intersects_symmetric(
            ax in -50i32..50, ay in -50i32..50, aw in 1i32..40, ah in 1i32..40,
            bx in -50i32..50, by in -50i32..50, bw in 1i32..40, bh in 1i32..40,
        ) {
            let a = Rect::new(ax, ay, ax + aw, ay + ah);
            let b = Rect::new(bx, by, bx + bw, by + bh);
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn prop_ordered_scan_matches_full_scan(
            heights in proptest::collection::vec(1i32..200, 1..60),
            px in -40i32..1200, py in 0i32..400,
        ) {
            let walls: Vec<Body> = heights
                .iter()
                .enumerate()
                .map(|(i, h)| body(i as i32 * 20 - 20, 0, 20, *h))
                .collect();
            let player = Rect::new(px, py, px + 64, py + 25);
            prop_assert_eq!(
                first_hit_in_ordered(&player, &walls).is_some(),
                first_hit(&player, &walls).is_some()
            );
        }
    }
}
