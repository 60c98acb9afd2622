//! Level 2: the parking lot
//!
//! A static lot with cones and a pedestrian. The level is won by stopping
//! fully inside the marked spot and staying there for the dwell time.

use serde::{Deserialize, Serialize};

use super::collision::{ParkingSpot, Rect, zone_contains_box};
use super::vehicle::Vehicle;
use crate::consts::SIM_DT;
use crate::tuning::{ParkingTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    Cone,
    Pedestrian,
}

/// Something standing in the lot that the car must not touch
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Prop {
    pub kind: PropKind,
    pub rect: Rect,
}

/// Parking lot level state
#[derive(Debug, Clone)]
pub struct ParkingLevel {
    pub spot: ParkingSpot,
    pub props: Vec<Prop>,
    /// Seconds spent stopped inside the spot in the current attempt
    pub parking_timer: f32,
    /// The stopped-inside condition held on the last check
    pub is_parking: bool,
    /// Latched once the dwell completes
    pub parked: bool,
    tuning: ParkingTuning,
}

impl ParkingLevel {
    pub fn new(tuning: &Tuning) -> Self {
        let t = &tuning.parking;
        let mut props: Vec<Prop> = t
            .cones
            .iter()
            .map(|&rect| Prop {
                kind: PropKind::Cone,
                rect,
            })
            .collect();
        props.push(Prop {
            kind: PropKind::Pedestrian,
            rect: t.pedestrian,
        });
        log::info!(
            "parking lot ready: spot at ({}, {}), {} props",
            t.spot.x,
            t.spot.z,
            props.len()
        );

        Self {
            spot: t.spot,
            props,
            parking_timer: 0.0,
            is_parking: false,
            parked: false,
            tuning: t.clone(),
        }
    }

    /// Is the car stopped with its whole parking box inside the spot?
    pub fn is_stopped_in_spot(&self, player: &Vehicle) -> bool {
        let t = &self.tuning;
        zone_contains_box(player.x, player.z, t.park_width, t.park_length, &self.spot)
            && player.speed.abs() < t.still_epsilon
    }

    /// Test the props, then run the dwell timer. Returns true on a prop hit.
    pub fn check_collisions(&mut self, player: &Vehicle) -> bool {
        let (w, l) = (self.tuning.player_width, self.tuning.player_length);
        let hit = self.props.iter().find(|p| p.rect.overlaps(player.x, player.z, w, l));
        if let Some(prop) = hit {
            log::debug!("hit a {:?} at ({:.1}, {:.1})", prop.kind, prop.rect.x, prop.rect.z);
        }
        let collided = hit.is_some();

        if self.is_stopped_in_spot(player) {
            self.is_parking = true;
            self.parking_timer += SIM_DT;
            if !self.parked && self.parking_timer >= self.tuning.dwell_seconds {
                self.parked = true;
                log::info!("parked after {:.2}s", self.parking_timer);
            }
        } else {
            // No partial credit
            self.is_parking = false;
            self.parking_timer = 0.0;
        }

        collided
    }

    pub fn is_finished(&self) -> bool {
        self.parked
    }

    /// Countdown for the HUD while an attempt is in progress
    pub fn parking_remaining(&self) -> Option<f32> {
        (self.is_parking && !self.parked)
            .then(|| (self.tuning.dwell_seconds - self.parking_timer).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> ParkingLevel {
        ParkingLevel::new(&Tuning::default())
    }

    fn in_spot() -> Vehicle {
        let mut car = Vehicle::default();
        car.x = 10.0;
        car.z = 20.0;
        car
    }

    #[test]
    fn test_props_are_built() {
        let level = lot();
        assert_eq!(level.props.len(), 5);
        assert_eq!(
            level.props.iter().filter(|p| p.kind == PropKind::Pedestrian).count(),
            1
        );
    }

    #[test]
    fn test_start_position_is_clear() {
        let mut level = lot();
        assert!(!level.check_collisions(&Vehicle::default()));
        assert!(!level.is_parking);
    }

    #[test]
    fn test_cone_collision() {
        let mut level = lot();
        let mut car = Vehicle::default();
        car.x = 5.5;
        car.z = 15.5;
        assert!(level.check_collisions(&car));
    }

    #[test]
    fn test_pedestrian_collision() {
        let mut level = lot();
        let mut car = Vehicle::default();
        car.x = 8.0;
        car.z = 23.0;
        assert!(level.check_collisions(&car));
    }

    #[test]
    fn test_parks_after_dwell() {
        let mut level = lot();
        let car = in_spot();
        for _ in 0..180 {
            assert!(!level.check_collisions(&car));
        }
        assert!(!level.is_finished());
        assert!(level.parking_remaining().is_some());
        for _ in 0..10 {
            level.check_collisions(&car);
        }
        assert!(level.is_finished());
        assert_eq!(level.parking_remaining(), None);
    }

    #[test]
    fn test_rolling_car_does_not_park() {
        let mut level = lot();
        let mut car = in_spot();
        car.speed = 0.02;
        for _ in 0..300 {
            level.check_collisions(&car);
        }
        assert!(!level.is_finished());
        assert_eq!(level.parking_timer, 0.0);
    }

    #[test]
    fn test_box_must_be_fully_inside() {
        let level = lot();
        let mut car = in_spot();
        assert!(level.is_stopped_in_spot(&car));
        // Nose past the line
        car.z = 21.2;
        assert!(!level.is_stopped_in_spot(&car));
    }

    #[test]
    fn test_dwell_resets_on_leaving() {
        let mut level = lot();
        let mut car = in_spot();

        // ~2.9 s
        for _ in 0..181 {
            level.check_collisions(&car);
        }
        assert!(!level.is_finished());

        // One tick outside
        car.x = 13.0;
        level.check_collisions(&car);
        assert_eq!(level.parking_timer, 0.0);

        // Back in: carried-over time would finish within a few ticks
        car.x = 10.0;
        for _ in 0..10 {
            level.check_collisions(&car);
        }
        assert!(!level.is_finished());

        // A full 3 s from zero completes it
        for _ in 0..180 {
            level.check_collisions(&car);
        }
        assert!(level.is_finished());
    }

    #[test]
    fn test_parked_is_permanent() {
        let mut level = lot();
        let mut car = in_spot();
        for _ in 0..200 {
            level.check_collisions(&car);
        }
        assert!(level.is_finished());
        car.x = 0.0;
        car.z = 0.0;
        level.check_collisions(&car);
        assert!(level.is_finished());
    }
}
