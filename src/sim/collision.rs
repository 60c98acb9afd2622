//! Collision predicates for the ground plane
//!
//! Everything here is a pure function of its arguments. Boxes are axis-aligned
//! and given as center + full extents; nothing is swept, so a fast enough pair
//! can tunnel through each other within one tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle on the ground plane (center + full extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub length: f32,
}

impl Rect {
    pub const fn new(x: f32, z: f32, width: f32, length: f32) -> Self {
        Self { x, z, width, length }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.length) * 0.5
    }

    /// Does this rectangle overlap a box of the given size centered at (x, z)?
    pub fn overlaps(&self, x: f32, z: f32, width: f32, length: f32) -> bool {
        box_overlap(self.x, self.z, self.width, self.length, x, z, width, length)
    }
}

/// The target rectangle in the parking lot
pub type ParkingSpot = Rect;

/// Strict half-extent overlap test between two axis-aligned boxes.
///
/// True iff `|ax-bx| < (aw+bw)/2` and `|az-bz| < (al+bl)/2`. Touching edges
/// do not count.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn box_overlap(ax: f32, az: f32, aw: f32, al: f32, bx: f32, bz: f32, bw: f32, bl: f32) -> bool {
    let gap = (Vec2::new(ax, az) - Vec2::new(bx, bz)).abs();
    let reach = (Vec2::new(aw, al) + Vec2::new(bw, bl)) * 0.5;
    gap.cmplt(reach).all()
}

/// Box test against scenery that repeats every `period` along z on both
/// sides of the road, centered at `|x| = axis_offset`.
///
/// `tolerance` is the hit distance per axis (feature half-extent plus player
/// half-extent). The features are never materialized: the nearest one is found
/// from `k = round((z - phase) / period)`. Anything within
/// `axis_offset - tolerance.x` of the centerline is on the clear side.
pub fn periodic_overlap(x: f32, z: f32, axis_offset: f32, period: f32, phase: f32, tolerance: Vec2) -> bool {
    let clearance = axis_offset - tolerance.x;
    let side = x.abs();
    if side <= clearance {
        return false;
    }

    let k = ((z - phase) / period).round();
    let feature_z = phase + k * period;

    let d = Vec2::new(side - axis_offset, z - feature_z).abs();
    d.cmplt(tolerance).all()
}

/// Point-in-rectangle test (edges inclusive)
#[inline]
pub fn zone_contains(x: f32, z: f32, spot: &ParkingSpot) -> bool {
    let d = (Vec2::new(x, z) - spot.center()).abs();
    d.cmple(spot.half_extents()).all()
}

/// Is a box of the given size centered at (x, z) entirely inside `spot`?
///
/// Both the min and max corners must be in the zone; the zone is convex so the
/// rest of the box follows.
pub fn zone_contains_box(x: f32, z: f32, width: f32, length: f32, spot: &ParkingSpot) -> bool {
    let half = Vec2::new(width, length) * 0.5;
    let lo = Vec2::new(x, z) - half;
    let hi = Vec2::new(x, z) + half;
    zone_contains(lo.x, lo.y, spot) && zone_contains(hi.x, hi.y, spot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_overlap_full() {
        assert!(box_overlap(0.0, 5.0, 2.0, 2.0, 0.0, 5.0, 2.0, 4.0));
    }

    #[test]
    fn test_box_overlap_per_axis() {
        // Overlapping in x only
        assert!(!box_overlap(0.0, 0.0, 2.0, 2.0, 1.0, 10.0, 2.0, 4.0));
        // Overlapping in z only
        assert!(!box_overlap(0.0, 0.0, 2.0, 2.0, 5.0, 1.0, 2.0, 4.0));
        // Both
        assert!(box_overlap(0.0, 0.0, 2.0, 2.0, 1.5, 2.5, 2.0, 4.0));
    }

    #[test]
    fn test_box_overlap_touching_edges_miss() {
        // |dx| == (2 + 2) / 2 exactly
        assert!(!box_overlap(0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0));
    }

    const POST: Vec2 = Vec2::new(1.2, 1.2);
    // 10 x 20 building plus the 2 x 2 crash box
    const BUILDING: Vec2 = Vec2::new(6.0, 11.0);

    #[test]
    fn test_periodic_overlap_hits_nearest_feature() {
        // Lamp posts at |x| = 11 every 20 along z
        assert!(periodic_overlap(11.0, 40.3, 11.0, 20.0, 0.0, POST));
        assert!(periodic_overlap(-10.5, 59.5, 11.0, 20.0, 0.0, POST));
        // Between posts
        assert!(!periodic_overlap(11.0, 50.0, 11.0, 20.0, 0.0, POST));
    }

    #[test]
    fn test_periodic_overlap_respects_clearance() {
        // On the road, level with a post
        assert!(!periodic_overlap(0.0, 40.0, 11.0, 20.0, 0.0, POST));
        assert!(!periodic_overlap(9.8, 40.0, 11.0, 20.0, 0.0, POST));
    }

    #[test]
    fn test_periodic_overlap_building_footprint() {
        // Building at |x| = 20, z = 30 spans x 15..25 and z 20..40
        assert!(periodic_overlap(18.0, 38.0, 20.0, 30.0, 0.0, BUILDING));
        assert!(periodic_overlap(16.0, 23.0, 20.0, 30.0, 0.0, BUILDING));
        assert!(periodic_overlap(-14.5, 30.0, 20.0, 30.0, 0.0, BUILDING));
        // Crash box edge touches the wall exactly
        assert!(!periodic_overlap(14.0, 30.0, 20.0, 30.0, 0.0, BUILDING));
        // Gap between buildings
        assert!(!periodic_overlap(18.0, 45.0, 20.0, 30.0, 0.0, BUILDING));
    }

    #[test]
    fn test_periodic_overlap_phase_shift() {
        assert!(periodic_overlap(20.0, 15.0, 20.0, 30.0, 15.0, BUILDING));
        assert!(!periodic_overlap(20.0, 0.0, 20.0, 30.0, 15.0, BUILDING));
    }

    #[test]
    fn test_zone_contains_edges_inclusive() {
        let spot = ParkingSpot::new(10.0, 20.0, 2.5, 4.0);
        assert!(zone_contains(10.0, 20.0, &spot));
        assert!(zone_contains(11.25, 22.0, &spot));
        assert!(!zone_contains(11.3, 20.0, &spot));
    }

    #[test]
    fn test_zone_contains_box() {
        let spot = ParkingSpot::new(10.0, 20.0, 2.5, 4.0);
        assert!(zone_contains_box(10.0, 20.0, 1.0, 2.0, &spot));
        assert!(zone_contains_box(10.7, 21.0, 1.0, 2.0, &spot));
        // Sticking out the front
        assert!(!zone_contains_box(10.0, 21.5, 1.0, 2.0, &spot));
        // Bigger than the spot
        assert!(!zone_contains_box(10.0, 20.0, 3.0, 2.0, &spot));
    }
}
