//! The active level
//!
//! Two variants behind one four-call contract: `init`, `tick`,
//! `check_collisions`, `is_finished`.

use serde::{Deserialize, Serialize};

use super::highway::HighwayLevel;
use super::parking::ParkingLevel;
use super::state::GameEvent;
use super::vehicle::Vehicle;
use crate::tuning::Tuning;

/// Which level to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelId {
    Highway,
    ParkingLot,
}

#[derive(Debug, Clone)]
pub enum Level {
    Highway(HighwayLevel),
    ParkingLot(ParkingLevel),
}

impl Level {
    /// Build a fresh level. `player` must already be at the start point.
    pub fn init(id: LevelId, tuning: &Tuning, seed: u64, player: &Vehicle) -> Self {
        match id {
            LevelId::Highway => Level::Highway(HighwayLevel::new(tuning, seed, player)),
            LevelId::ParkingLot => Level::ParkingLot(ParkingLevel::new(tuning)),
        }
    }

    pub fn id(&self) -> LevelId {
        match self {
            Level::Highway(_) => LevelId::Highway,
            Level::ParkingLot(_) => LevelId::ParkingLot,
        }
    }

    /// Advance the level's own entities one tick
    pub fn tick(&mut self, player: &mut Vehicle, events: &mut Vec<GameEvent>) {
        match self {
            Level::Highway(level) => level.tick(player, events),
            // Nothing in the lot moves
            Level::ParkingLot(_) => {}
        }
    }

    /// Did the player hit something this tick?
    pub fn check_collisions(&mut self, player: &Vehicle) -> bool {
        match self {
            Level::Highway(level) => level.check_collisions(player),
            Level::ParkingLot(level) => level.check_collisions(player),
        }
    }

    pub fn is_finished(&self, player: &Vehicle) -> bool {
        match self {
            Level::Highway(level) => level.is_finished(player),
            Level::ParkingLot(level) => level.is_finished(),
        }
    }

    pub fn as_highway(&self) -> Option<&HighwayLevel> {
        match self {
            Level::Highway(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_highway_mut(&mut self) -> Option<&mut HighwayLevel> {
        match self {
            Level::Highway(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_parking(&self) -> Option<&ParkingLevel> {
        match self {
            Level::ParkingLot(level) => Some(level),
            _ => None,
        }
    }
}
