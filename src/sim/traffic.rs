//! One-way NPC traffic on the highway
//!
//! A fixed pool of cars is recycled as the player drives: idle slots spawn
//! ahead of the player, active cars creep forward at their own speed, pull
//! over when flashed or when the traffic-clear effect is running, and go idle
//! again once they fall behind or leave the road.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::box_overlap;
use super::pool::{Pool, Pooled};
use crate::tuning::TrafficTuning;

/// An NPC car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub length: f32,
    /// Forward speed, world units per tick
    pub speed: f32,
    pub active: bool,
    /// Lateral position the car is pulling over toward
    pub target_x: f32,
    /// Lateral position when it started pulling over
    pub original_x: f32,
    pub is_moving_aside: bool,
}

impl Obstacle {
    fn idle(width: f32, length: f32) -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            width,
            length,
            speed: 0.0,
            active: false,
            target_x: 0.0,
            original_x: 0.0,
            is_moving_aside: false,
        }
    }

    /// Put this slot on the road at (x, z)
    pub fn activate(&mut self, x: f32, z: f32, speed: f32) {
        self.x = x;
        self.z = z;
        self.speed = speed;
        self.active = true;
        self.target_x = x;
        self.original_x = x;
        self.is_moving_aside = false;
    }

    /// Start pulling over, away from the centerline
    fn move_aside(&mut self, offset: f32) {
        self.original_x = self.x;
        self.target_x = if self.x >= 0.0 { self.x + offset } else { self.x - offset };
        self.is_moving_aside = true;
    }
}

impl Pooled for Obstacle {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.is_moving_aside = false;
    }
}

/// What the traffic needs to know about the player this tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficStep {
    pub player_x: f32,
    pub player_z: f32,
    /// Headlights went from off to on this tick
    pub flash: bool,
    /// Traffic-clear effect is running: no spawns, everything ahead pulls over
    pub clearing: bool,
}

/// Counts from one traffic tick, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficReport {
    pub spawned: usize,
    pub moved_aside: usize,
    pub despawned: usize,
}

/// Pool of NPC cars and the rules that move them
#[derive(Debug, Clone)]
pub struct TrafficSim {
    pool: Pool<Obstacle>,
    tuning: TrafficTuning,
}

impl TrafficSim {
    pub fn new(tuning: TrafficTuning) -> Self {
        let (w, l) = (tuning.obstacle_width, tuning.obstacle_length);
        Self {
            pool: Pool::new(tuning.pool_size, || Obstacle::idle(w, l)),
            tuning,
        }
    }

    pub fn obstacles(&self) -> &Pool<Obstacle> {
        &self.pool
    }

    pub fn obstacles_mut(&mut self) -> &mut Pool<Obstacle> {
        &mut self.pool
    }

    /// Half the road width; active cars stay within `|x| <= half_road()`
    pub fn half_road(&self) -> f32 {
        self.tuning.road_width / 2.0
    }

    /// Run one tick: spawn, advance, react, pull over, despawn
    pub fn step<R: Rng>(&mut self, step: TrafficStep, rng: &mut R) -> TrafficReport {
        let mut report = TrafficReport::default();
        if !step.clearing {
            report.spawned = self.spawn(step.player_z, rng);
        }
        self.advance();
        if step.flash {
            report.moved_aside += self.flash(step.player_x, step.player_z);
        }
        if step.clearing {
            report.moved_aside += self.clear_ahead(step.player_z);
        }
        self.pull_over();
        report.despawned = self.despawn(step.player_z);
        report
    }

    /// Give every idle slot a chance to appear ahead of the player.
    ///
    /// A proposal that would crowd another active car is dropped; the slot
    /// simply tries again on a later tick.
    pub fn spawn<R: Rng>(&mut self, player_z: f32, rng: &mut R) -> usize {
        let t = &self.tuning;
        let lane_max = self.half_road() - t.obstacle_width / 2.0;
        let mut spawned = 0;

        for slot in self.pool.inactive_slots() {
            if !rng.random_bool(t.spawn_chance) {
                continue;
            }
            let x = rng.random_range(-lane_max..=lane_max);
            let z = player_z + t.spawn_ahead_min + rng.random::<f32>() * t.spawn_ahead_span;

            if self.is_crowded(x, z, slot) {
                log::debug!("traffic slot {slot}: spawn at ({x:.1}, {z:.1}) rejected, too close");
                continue;
            }

            let speed = rng.random_range(t.min_speed..=t.max_speed);
            if let Some(obs) = self.pool.get_mut(slot) {
                obs.activate(x, z, speed);
                spawned += 1;
                log::debug!("traffic slot {slot}: spawned at ({x:.1}, {z:.1}) speed {speed:.3}");
            }
        }
        spawned
    }

    /// Would a car at (x, z) sit inside another active car's clearance box?
    pub fn is_crowded(&self, x: f32, z: f32, skip: usize) -> bool {
        let (cw, cl) = (self.tuning.clearance_width, self.tuning.clearance_length);
        self.pool
            .others_active(skip)
            .any(|o| box_overlap(x, z, cw, cl, o.x, o.z, cw, cl))
    }

    /// Traffic only flows one way, with the player
    pub fn advance(&mut self) {
        for obs in self.pool.iter_active_mut() {
            obs.z += obs.speed;
        }
    }

    /// Headlight flash: cars just ahead in the player's lane pull over
    pub fn flash(&mut self, player_x: f32, player_z: f32) -> usize {
        let t = &self.tuning;
        let mut count = 0;
        for obs in self.pool.iter_active_mut() {
            let dz = obs.z - player_z;
            let in_window = dz > 0.0 && dz <= t.flash_window;
            let in_lane = (obs.x - player_x).abs() < t.flash_lane_half_width;
            if in_window && in_lane && !obs.is_moving_aside {
                obs.move_aside(t.aside_offset);
                count += 1;
            }
        }
        if count > 0 {
            log::debug!("headlight flash: {count} car(s) pulling over");
        }
        count
    }

    /// Traffic-clear effect: everything in the long window ahead pulls over
    pub fn clear_ahead(&mut self, player_z: f32) -> usize {
        let t = &self.tuning;
        let mut count = 0;
        for obs in self.pool.iter_active_mut() {
            let dz = obs.z - player_z;
            if dz > 0.0 && dz <= t.clear_window && !obs.is_moving_aside {
                obs.move_aside(t.aside_offset);
                count += 1;
            }
        }
        count
    }

    /// Slow lateral lerp toward `target_x`
    pub fn pull_over(&mut self) {
        let lerp = self.tuning.aside_lerp;
        for obs in self.pool.iter_active_mut() {
            if obs.is_moving_aside {
                obs.x += (obs.target_x - obs.x) * lerp;
            }
        }
    }

    /// Retire cars that fell behind or drifted off the road
    pub fn despawn(&mut self, player_z: f32) -> usize {
        let behind = player_z - self.tuning.despawn_behind;
        let half_road = self.half_road();
        let mut count = 0;
        for obs in self.pool.iter_active_mut() {
            if obs.z < behind || obs.x.abs() > half_road {
                obs.deactivate();
                count += 1;
            }
        }
        count
    }

    /// Remove every car at once (traffic-clear pickup)
    pub fn clear_all(&mut self) {
        self.pool.deactivate_all();
    }

    /// Does a box centered at (x, z) hit any active car?
    pub fn hits(&self, x: f32, z: f32, width: f32, length: f32) -> bool {
        self.pool
            .iter_active()
            .any(|o| box_overlap(x, z, width, length, o.x, o.z, o.width, o.length))
    }
}
