//! Game balance constants
//!
//! Read once when a `GameState` is built and never mutated afterwards. The
//! defaults are the shipped balance; a JSON override only needs the fields it
//! changes.

use anyhow::{Result, ensure};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::sim::collision::Rect;

/// Player car handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Forward speed cap (world units per tick) before boost
    pub max_speed: f32,
    /// Speed gained per tick while accelerating or braking
    pub acceleration: f32,
    /// Speed lost per tick while coasting
    pub friction: f32,
    /// Heading change per tick while steering (degrees)
    pub turn_speed: f32,
    /// Cosmetic body lean limit (degrees)
    pub max_tilt: f32,
    /// Lean change per tick (degrees)
    pub tilt_step: f32,
    /// Below this |speed| the wheels do not steer
    pub steer_epsilon: f32,
    /// Multiplier applied to acceleration and max speed while boosted
    pub boost_multiplier: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 0.3,
            acceleration: 0.005,
            friction: 0.002,
            turn_speed: 2.5,
            max_tilt: 10.0,
            tilt_step: 1.0,
            steer_epsilon: 0.001,
            boost_multiplier: 2.0,
        }
    }
}

/// NPC traffic on the highway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficTuning {
    /// Full road width; the lane band is `|x| <= road_width / 2`
    pub road_width: f32,
    pub pool_size: usize,
    pub obstacle_width: f32,
    pub obstacle_length: f32,
    /// NPC forward speed range (inclusive), world units per tick
    pub min_speed: f32,
    pub max_speed: f32,
    /// Per-tick chance that an idle slot tries to spawn
    pub spawn_chance: f64,
    /// Spawn z = player z + ahead_min + [0, ahead_span)
    pub spawn_ahead_min: f32,
    pub spawn_ahead_span: f32,
    /// Widened box used to reject spawns on top of other traffic
    pub clearance_width: f32,
    pub clearance_length: f32,
    /// Deactivate once this far behind the player
    pub despawn_behind: f32,

    // === Avoidance ===
    /// Headlight flash reaches NPCs up to this far ahead
    pub flash_window: f32,
    /// ...and within this lateral distance of the player
    pub flash_lane_half_width: f32,
    /// Traffic-clear effect reaches NPCs up to this far ahead
    pub clear_window: f32,
    /// Lateral distance an NPC pulls over by
    pub aside_offset: f32,
    /// Fraction of the remaining lateral gap closed per tick
    pub aside_lerp: f32,
}

impl Default for TrafficTuning {
    fn default() -> Self {
        Self {
            road_width: 20.0,
            pool_size: 10,
            obstacle_width: 2.0,
            obstacle_length: 4.0,
            min_speed: 0.05,
            max_speed: 0.09,
            spawn_chance: 0.02,
            spawn_ahead_min: 100.0,
            spawn_ahead_span: 50.0,
            clearance_width: 4.0,
            clearance_length: 12.0,
            despawn_behind: 20.0,
            flash_window: 30.0,
            flash_lane_half_width: 4.0,
            clear_window: 80.0,
            aside_offset: 4.0,
            aside_lerp: 0.05,
        }
    }
}

/// Collectibles and the timed effects they grant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub pool_size: usize,
    pub spawn_chance: f64,
    pub spawn_ahead_min: f32,
    pub spawn_ahead_span: f32,
    pub clearance_width: f32,
    pub clearance_length: f32,
    pub despawn_behind: f32,
    /// Pickup succeeds when both |dx| and |dz| are below this
    pub pickup_half_extent: f32,
    /// Probability a spawned collectible is TrafficClear (else SpeedBoost)
    pub traffic_clear_weight: f64,
    /// Effect lengths in seconds
    pub no_traffic_duration: f32,
    pub speed_boost_duration: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            pool_size: 5,
            spawn_chance: 0.005,
            spawn_ahead_min: 150.0,
            spawn_ahead_span: 50.0,
            clearance_width: 3.0,
            clearance_length: 6.0,
            despawn_behind: 20.0,
            pickup_half_extent: 1.5,
            traffic_clear_weight: 0.4,
            no_traffic_duration: 5.0,
            speed_boost_duration: 3.0,
        }
    }
}

/// A row of identical roadside features repeated along z on both sides of the road
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneryRow {
    /// |x| of the feature centers
    pub axis_offset: f32,
    /// Spacing along z
    pub period: f32,
    /// z of the feature with index 0
    pub phase: f32,
    /// Hit distance per axis, (x, z): feature half-extent + player half-extent
    pub tolerance: Vec2,
}

/// Level 1: the endless highway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighwayTuning {
    /// Level ends once the player passes this z
    pub finish_distance: f32,
    /// Player crash box (full extents)
    pub player_width: f32,
    pub player_length: f32,
    pub lamp_posts: SceneryRow,
    pub buildings: SceneryRow,
    /// Day/night clock advance per tick (1.0 = full day)
    pub day_step: f32,
}

impl Default for HighwayTuning {
    fn default() -> Self {
        Self {
            finish_distance: 1000.0,
            player_width: 2.0,
            player_length: 2.0,
            lamp_posts: SceneryRow {
                axis_offset: 11.0,
                period: 20.0,
                phase: 0.0,
                tolerance: Vec2::new(1.2, 1.2),
            },
            buildings: SceneryRow {
                axis_offset: 20.0,
                period: 30.0,
                phase: 0.0,
                // 10 wide, 20 long
                tolerance: Vec2::new(6.0, 11.0),
            },
            day_step: 0.0005,
        }
    }
}

/// Level 2: the parking lot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingTuning {
    pub spot: Rect,
    pub cones: Vec<Rect>,
    pub pedestrian: Rect,
    /// Player crash box (full extents)
    pub player_width: f32,
    pub player_length: f32,
    /// Box that must fit inside the spot to count as parked
    pub park_width: f32,
    pub park_length: f32,
    /// |speed| below this counts as stopped
    pub still_epsilon: f32,
    /// Seconds the car must stay stopped inside the spot
    pub dwell_seconds: f32,
}

impl Default for ParkingTuning {
    fn default() -> Self {
        let cone = |x, z| Rect::new(x, z, 0.5, 0.5);
        Self {
            spot: Rect::new(10.0, 20.0, 2.5, 4.0),
            cones: vec![cone(5.0, 15.0), cone(15.0, 15.0), cone(5.0, 25.0), cone(15.0, 25.0)],
            pedestrian: Rect::new(8.0, 22.0, 0.8, 0.8),
            player_width: 2.0,
            player_length: 2.0,
            park_width: 1.0,
            park_length: 2.0,
            still_epsilon: 0.01,
            dwell_seconds: 3.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub vehicle: VehicleTuning,
    pub traffic: TrafficTuning,
    pub powerups: PowerupTuning,
    pub highway: HighwayTuning,
    pub parking: ParkingTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject balance sheets that would make a level unplayable or unwinnable
    pub fn validate(&self) -> Result<()> {
        let v = &self.vehicle;
        ensure!(v.max_speed > 0.0, "vehicle.max_speed must be positive");
        ensure!(v.acceleration > 0.0, "vehicle.acceleration must be positive");
        ensure!(v.friction > 0.0, "vehicle.friction must be positive");
        ensure!(v.max_tilt >= 0.0, "vehicle.max_tilt must not be negative");
        ensure!(v.boost_multiplier >= 1.0, "vehicle.boost_multiplier must be at least 1");

        let t = &self.traffic;
        ensure!(t.road_width > 0.0, "traffic.road_width must be positive");
        ensure!(t.pool_size > 0, "traffic.pool_size must be at least 1");
        ensure!(
            t.obstacle_width < t.road_width,
            "traffic.obstacle_width {} does not fit on a {} wide road",
            t.obstacle_width,
            t.road_width
        );
        ensure!(
            t.min_speed <= t.max_speed,
            "traffic speed range is empty ({} > {})",
            t.min_speed,
            t.max_speed
        );
        ensure!((0.0..=1.0).contains(&t.spawn_chance), "traffic.spawn_chance must be in [0, 1]");
        ensure!(t.spawn_ahead_span > 0.0, "traffic.spawn_ahead_span must be positive");
        ensure!(
            (0.0..=1.0).contains(&t.aside_lerp),
            "traffic.aside_lerp must be in [0, 1]"
        );

        let p = &self.powerups;
        ensure!((0.0..=1.0).contains(&p.spawn_chance), "powerups.spawn_chance must be in [0, 1]");
        ensure!(
            (0.0..=1.0).contains(&p.traffic_clear_weight),
            "powerups.traffic_clear_weight must be in [0, 1]"
        );
        ensure!(p.spawn_ahead_span > 0.0, "powerups.spawn_ahead_span must be positive");
        ensure!(
            p.no_traffic_duration > 0.0 && p.speed_boost_duration > 0.0,
            "effect durations must be positive"
        );

        let h = &self.highway;
        ensure!(
            h.lamp_posts.period > 0.0 && h.buildings.period > 0.0,
            "scenery periods must be positive"
        );
        ensure!(
            h.lamp_posts.tolerance.cmpge(Vec2::ZERO).all() && h.buildings.tolerance.cmpge(Vec2::ZERO).all(),
            "scenery tolerances must not be negative"
        );

        let k = &self.parking;
        ensure!(
            k.spot.width >= k.park_width && k.spot.length >= k.park_length,
            "parking spot {}x{} cannot hold a {}x{} car",
            k.spot.width,
            k.spot.length,
            k.park_width,
            k.park_length
        );
        ensure!(
            k.dwell_seconds >= SIM_DT,
            "parking.dwell_seconds must cover at least one tick"
        );
        ensure!(k.still_epsilon > 0.0, "parking.still_epsilon must be positive");

        Ok(())
    }
}
