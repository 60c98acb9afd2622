//! The player's car
//!
//! Kinematic only: speed is a signed scalar along the heading, there is no
//! mass, slip or torque. `update` runs once per fixed tick and every step is a
//! per-tick constant, so a different tick rate changes the feel of the car.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading_to_dir;
use crate::tuning::VehicleTuning;

/// Held driving inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInput {
    pub accelerating: bool,
    pub braking: bool,
    pub turning_left: bool,
    pub turning_right: bool,
}

/// Player vehicle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub x: f32,
    pub z: f32,
    /// Degrees, 0 = +z; steering left increases it
    pub heading: f32,
    /// Signed, forward positive (world units per tick)
    pub speed: f32,
    /// Cosmetic roll in degrees
    pub tilt_angle: f32,
    pub input: DriveInput,
    pub lights_on: bool,
    /// 1.0 normally, `boost_multiplier` from tuning while boosted
    pub boost_multiplier: f32,
    #[serde(skip)]
    tuning: VehicleTuning,
}

impl Vehicle {
    pub fn new(tuning: VehicleTuning) -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            heading: 0.0,
            speed: 0.0,
            tilt_angle: 0.0,
            input: DriveInput::default(),
            lights_on: true,
            boost_multiplier: 1.0,
            tuning,
        }
    }

    /// Put the car back at a start point: stopped, straight, level, lights on,
    /// no held inputs and no boost.
    pub fn reset(&mut self, x: f32, z: f32) {
        self.x = x;
        self.z = z;
        self.heading = 0.0;
        self.speed = 0.0;
        self.tilt_angle = 0.0;
        self.input = DriveInput::default();
        self.lights_on = true;
        self.boost_multiplier = 1.0;
    }

    pub fn set_accelerating(&mut self, on: bool) {
        self.input.accelerating = on;
    }

    pub fn set_braking(&mut self, on: bool) {
        self.input.braking = on;
    }

    pub fn set_turning_left(&mut self, on: bool) {
        self.input.turning_left = on;
    }

    pub fn set_turning_right(&mut self, on: bool) {
        self.input.turning_right = on;
    }

    pub fn toggle_lights(&mut self) {
        self.lights_on = !self.lights_on;
    }

    /// Switch the speed boost on or off. Idempotent: boosting twice never stacks.
    pub fn set_boost(&mut self, on: bool) {
        self.boost_multiplier = if on { self.tuning.boost_multiplier } else { 1.0 };
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_multiplier > 1.0
    }

    /// Forward speed cap at the current boost level
    pub fn effective_max_speed(&self) -> f32 {
        self.tuning.max_speed * self.boost_multiplier
    }

    pub fn max_tilt(&self) -> f32 {
        self.tuning.max_tilt
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// Advance one tick
    pub fn update(&mut self) {
        let t = &self.tuning;
        let accel = t.acceleration * self.boost_multiplier;
        let max = t.max_speed * self.boost_multiplier;

        if self.input.accelerating {
            self.speed += accel;
        } else if self.input.braking {
            self.speed -= accel;
        } else {
            if self.speed > 0.0 {
                self.speed -= t.friction;
            } else if self.speed < 0.0 {
                self.speed += t.friction;
            }
            // Snap so coasting never oscillates around zero
            if self.speed.abs() < t.friction {
                self.speed = 0.0;
            }
        }

        // Reverse is capped at half the forward speed
        self.speed = self.speed.clamp(-max / 2.0, max);

        // Wheels only steer while rolling; steering flips in reverse
        if self.speed.abs() > t.steer_epsilon {
            let dir = self.speed.signum();
            if self.input.turning_left {
                self.heading += t.turn_speed * dir;
            }
            if self.input.turning_right {
                self.heading -= t.turn_speed * dir;
            }
        }

        let mut target_tilt = 0.0;
        if self.input.turning_left {
            target_tilt = -t.max_tilt;
        }
        if self.input.turning_right {
            target_tilt = t.max_tilt;
        }
        // Fixed step, no overshoot correction
        if self.tilt_angle < target_tilt {
            self.tilt_angle += t.tilt_step;
        }
        if self.tilt_angle > target_tilt {
            self.tilt_angle -= t.tilt_step;
        }

        let dir = heading_to_dir(self.heading);
        self.x += dir.x * self.speed;
        self.z += dir.y * self.speed;
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new(VehicleTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accelerate_then_coast() {
        let mut car = Vehicle::default();
        car.set_accelerating(true);
        for _ in 0..100 {
            car.update();
        }
        assert!((car.speed - 0.3).abs() < 1e-6, "should hit the cap, got {}", car.speed);
        let z_at_release = car.z;
        assert!(z_at_release > 0.0);

        car.set_accelerating(false);
        for _ in 0..10 {
            car.update();
        }
        assert!(car.speed < 0.3);
        assert!(car.speed > 0.0);
        assert!(car.z > z_at_release);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let mut car = Vehicle::default();
        car.speed = 0.0071;
        let mut last = car.speed;
        for _ in 0..10 {
            car.update();
            assert!(car.speed >= 0.0, "coasting crossed zero: {}", car.speed);
            assert!(car.speed <= last);
            last = car.speed;
        }
        assert_eq!(car.speed, 0.0);
    }

    #[test]
    fn test_reverse_capped_at_half() {
        let mut car = Vehicle::default();
        car.set_braking(true);
        for _ in 0..200 {
            car.update();
        }
        assert!((car.speed + 0.15).abs() < 1e-6);
        assert!(car.z < 0.0);
    }

    #[test]
    fn test_accelerate_wins_over_brake() {
        let mut car = Vehicle::default();
        car.set_accelerating(true);
        car.set_braking(true);
        car.update();
        assert!(car.speed > 0.0);
    }

    #[test]
    fn test_no_steering_while_stationary() {
        let mut car = Vehicle::default();
        car.set_turning_left(true);
        car.set_turning_right(true);
        car.update();
        assert_eq!(car.heading, 0.0);
        assert_eq!(car.speed, 0.0);
    }

    #[test]
    fn test_steering_inverts_in_reverse() {
        let mut forward = Vehicle::default();
        forward.speed = 0.1;
        forward.set_accelerating(true);
        forward.set_turning_left(true);
        forward.update();
        assert!(forward.heading > 0.0);

        let mut reverse = Vehicle::default();
        reverse.speed = -0.1;
        reverse.set_braking(true);
        reverse.set_turning_left(true);
        reverse.update();
        assert!(reverse.heading < 0.0);
    }

    #[test]
    fn test_tilt_steps_one_degree() {
        let mut car = Vehicle::default();
        car.set_turning_right(true);
        car.update();
        assert_eq!(car.tilt_angle, 1.0);
        for _ in 0..30 {
            car.update();
        }
        assert_eq!(car.tilt_angle, 10.0);

        car.set_turning_right(false);
        car.set_turning_left(true);
        car.update();
        assert_eq!(car.tilt_angle, 9.0);
    }

    #[test]
    fn test_boost_does_not_stack() {
        let mut car = Vehicle::default();
        car.set_boost(true);
        car.set_boost(true);
        assert_eq!(car.boost_multiplier, 2.0);
        assert!((car.effective_max_speed() - 0.6).abs() < 1e-6);
        car.set_boost(false);
        assert_eq!(car.boost_multiplier, 1.0);
    }

    #[test]
    fn test_heading_drives_position() {
        let mut car = Vehicle::default();
        car.heading = 90.0;
        car.speed = 0.2;
        car.set_accelerating(true);
        car.update();
        assert!(car.x > 0.2);
        assert!(car.z.abs() < 1e-5);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut car = Vehicle::default();
        car.set_accelerating(true);
        car.set_turning_left(true);
        car.set_boost(true);
        car.toggle_lights();
        for _ in 0..20 {
            car.update();
        }
        car.reset(0.0, 0.0);
        assert_eq!(car.position(), Vec2::ZERO);
        assert_eq!(car.speed, 0.0);
        assert_eq!(car.tilt_angle, 0.0);
        assert_eq!(car.heading, 0.0);
        assert_eq!(car.input, DriveInput::default());
        assert!(car.lights_on);
        assert!(!car.is_boosted());
    }

    fn arb_input() -> impl Strategy<Value = (DriveInput, bool)> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(accelerating, braking, turning_left, turning_right, boost)| {
                (
                    DriveInput {
                        accelerating,
                        braking,
                        turning_left,
                        turning_right,
                    },
                    boost,
                )
            },
        )
    }

    proptest! {
        #[test]
        fn prop_speed_and_tilt_stay_bounded(inputs in prop::collection::vec(arb_input(), 1..300)) {
            let mut car = Vehicle::default();
            for (input, boost) in inputs {
                car.input = input;
                car.set_boost(boost);
                car.update();
                let max = car.effective_max_speed();
                prop_assert!(car.speed <= max + 1e-6);
                prop_assert!(car.speed >= -max / 2.0 - 1e-6);
                prop_assert!(car.tilt_angle.abs() <= car.max_tilt() + 1e-6);
            }
        }

        #[test]
        fn prop_coasting_converges_to_exact_zero(start in -0.3f32..0.6) {
            let mut car = Vehicle::default();
            car.speed = start;
            let sign = start.signum();
            for _ in 0..400 {
                car.update();
                // Never crosses zero
                prop_assert!(car.speed == 0.0 || car.speed.signum() == sign);
            }
            prop_assert_eq!(car.speed, 0.0);
        }
    }
}
