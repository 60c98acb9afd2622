//! Level 1: the endless highway
//!
//! One-way traffic, roadside lamp posts and buildings, power-ups, and a
//! finish line far down the road. Roadside scenery is never materialized; it
//! is tested formulaically from the player's position.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::periodic_overlap;
use super::powerup::{EffectKind, Effects, PowerupSystem};
use super::state::GameEvent;
use super::traffic::{TrafficSim, TrafficStep};
use super::vehicle::Vehicle;
use crate::tuning::{HighwayTuning, SceneryRow, Tuning};

/// Collectibles already on the road when the level starts: z in [20, 220)
const INITIAL_COLLECTIBLES_FROM: f32 = 20.0;
const INITIAL_COLLECTIBLES_SPAN: f32 = 200.0;

/// Highway level state
#[derive(Debug, Clone)]
pub struct HighwayLevel {
    pub traffic: TrafficSim,
    pub powerups: PowerupSystem,
    /// Player's headlights on the previous tick (flash edge detection)
    pub was_lights_on: bool,
    tuning: HighwayTuning,
    rng: Pcg32,
}

impl HighwayLevel {
    /// Build the pools and scatter the opening collectibles
    pub fn new(tuning: &Tuning, seed: u64, player: &Vehicle) -> Self {
        let mut level = Self {
            traffic: TrafficSim::new(tuning.traffic.clone()),
            powerups: PowerupSystem::new(tuning.powerups.clone()),
            was_lights_on: player.lights_on,
            tuning: tuning.highway.clone(),
            rng: Pcg32::seed_from_u64(seed),
        };
        let placed = level.powerups.scatter(
            player.z + INITIAL_COLLECTIBLES_FROM,
            INITIAL_COLLECTIBLES_SPAN,
            &level.traffic,
            &mut level.rng,
        );
        log::info!(
            "highway ready: {} traffic slots, {placed} collectibles on the road",
            level.traffic.obstacles().capacity()
        );
        level
    }

    pub fn effects(&self) -> &Effects {
        self.powerups.effects()
    }

    pub fn finish_distance(&self) -> f32 {
        self.tuning.finish_distance
    }

    /// Distance driven, for the HUD
    pub fn distance(&self, player: &Vehicle) -> f32 {
        player.z.max(0.0)
    }

    /// Advance the world one tick: effect timers, traffic, collectibles
    pub fn tick(&mut self, player: &mut Vehicle, events: &mut Vec<GameEvent>) {
        for kind in self.powerups.tick_effects(player) {
            events.push(GameEvent::EffectExpired(kind));
        }
        // Effect state is authoritative (a crash reset drops the multiplier)
        if self.powerups.is_active(EffectKind::SpeedBoost) {
            player.set_boost(true);
        }

        let flash = player.lights_on && !self.was_lights_on;
        self.was_lights_on = player.lights_on;

        let report = self.traffic.step(
            TrafficStep {
                player_x: player.x,
                player_z: player.z,
                flash,
                clearing: self.powerups.is_active(EffectKind::NoTraffic),
            },
            &mut self.rng,
        );
        if report.moved_aside > 0 {
            log::debug!("{} car(s) started pulling over", report.moved_aside);
        }

        self.powerups.spawn(player.z, &self.traffic, &mut self.rng);
        for kind in self.powerups.collect(player, &mut self.traffic) {
            events.push(GameEvent::PowerupCollected(kind));
        }
    }

    /// Does the player's crash box touch traffic or roadside scenery?
    pub fn check_collisions(&self, player: &Vehicle) -> bool {
        let (w, l) = (self.tuning.player_width, self.tuning.player_length);
        if self.traffic.hits(player.x, player.z, w, l) {
            log::debug!("hit traffic at ({:.1}, {:.1})", player.x, player.z);
            return true;
        }
        if hits_row(player, &self.tuning.lamp_posts) {
            log::debug!("hit a lamp post at ({:.1}, {:.1})", player.x, player.z);
            return true;
        }
        if hits_row(player, &self.tuning.buildings) {
            log::debug!("hit a building at ({:.1}, {:.1})", player.x, player.z);
            return true;
        }
        false
    }

    pub fn is_finished(&self, player: &Vehicle) -> bool {
        player.z > self.tuning.finish_distance
    }
}

fn hits_row(player: &Vehicle, row: &SceneryRow) -> bool {
    periodic_overlap(player.x, player.z, row.axis_offset, row.period, row.phase, row.tolerance)
}
