//! Game state machine
//!
//! `GameState` is the one owned context object: it holds the player car, the
//! live level (at most one) and the current phase. Menu -> Level1 -> Level2 ->
//! Win, with Win terminal.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::level::{Level, LevelId};
use super::powerup::{CollectibleKind, EffectKind};
use super::vehicle::Vehicle;
use crate::consts::{START_X, START_Z};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start command
    Menu,
    /// The highway
    Level1,
    /// The parking lot
    Level2,
    /// Parked, then made contact. Terminal.
    Win,
}

impl GamePhase {
    /// The level that runs in this phase, if any
    pub fn level_id(self) -> Option<LevelId> {
        match self {
            GamePhase::Level1 => Some(LevelId::Highway),
            GamePhase::Level2 => Some(LevelId::ParkingLot),
            GamePhase::Menu | GamePhase::Win => None,
        }
    }
}

/// Something that happened during a tick, for audio/HUD layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted(GamePhase),
    /// Player crashed and was sent back to the start
    Collision,
    PowerupCollected(CollectibleKind),
    EffectExpired(EffectKind),
    /// Highway finish line crossed
    LevelComplete,
    /// Parking dwell completed (the lot still needs a contact to win)
    Parked,
    Won,
}

/// Day/night clock: fraction of a day, 0.5 = noon
const DAY_START: f32 = 0.5;

/// Complete game context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed; each level derives its own RNG stream from it
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Vehicle,
    /// Simulation ticks run inside levels
    pub time_ticks: u64,
    /// Day/night clock in [0, 1); advances on the highway only
    pub day_time: f32,
    /// Crash resets so far
    pub resets: u32,
    level: Option<Level>,
    tuning: Tuning,
}

impl GameState {
    /// Create a game at the menu. Fails if the tuning is malformed.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self> {
        tuning.validate()?;
        Ok(Self::at_menu(tuning, seed))
    }

    /// Default balance with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::at_menu(Tuning::default(), seed)
    }

    fn at_menu(tuning: Tuning, seed: u64) -> Self {
        let mut player = Vehicle::new(tuning.vehicle.clone());
        player.reset(START_X, START_Z);
        Self {
            seed,
            phase: GamePhase::Menu,
            player,
            time_ticks: 0,
            day_time: DAY_START,
            resets: 0,
            level: None,
            tuning,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    /// Split borrow for the tick pipeline
    pub(crate) fn player_and_level(&mut self) -> (&mut Vehicle, Option<&mut Level>) {
        (&mut self.player, self.level.as_mut())
    }

    /// Start command. Only does anything from the menu.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            log::warn!("start ignored in {:?}", self.phase);
            return false;
        }
        self.enter(GamePhase::Level1);
        true
    }

    /// Tear down the current level and build the one for `phase`
    pub(crate) fn enter(&mut self, phase: GamePhase) {
        log::info!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.level = None;
        self.player.reset(START_X, START_Z);
        if let Some(id) = phase.level_id() {
            let seed = level_seed(self.seed, id);
            self.level = Some(Level::init(id, &self.tuning, seed, &self.player));
        }
    }

    /// Crash: back to the start, level keeps running
    pub(crate) fn reset_player(&mut self) {
        self.player.reset(START_X, START_Z);
        self.resets += 1;
        log::info!("crash #{} in {:?}, back to start", self.resets, self.phase);
    }

    pub(crate) fn advance_clock(&mut self) {
        self.day_time += self.tuning.highway.day_step;
        if self.day_time >= 1.0 {
            self.day_time -= 1.0;
        }
    }

    pub fn is_night(&self) -> bool {
        self.day_time > 0.75 || self.day_time < 0.25
    }

    /// Has the current level met its goal?
    pub fn is_level_finished(&self) -> bool {
        self.level
            .as_ref()
            .is_some_and(|level| level.is_finished(&self.player))
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Win
    }

    /// Seconds left on an effect, for the on-screen countdown
    pub fn effect_remaining(&self, kind: EffectKind) -> Option<f32> {
        self.level
            .as_ref()
            .and_then(Level::as_highway)
            .and_then(|h| h.effects().get(kind).remaining())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

/// Independent RNG stream per level
fn level_seed(seed: u64, id: LevelId) -> u64 {
    let salt = match id {
        LevelId::Highway => 1,
        LevelId::ParkingLot => 2,
    };
    seed.wrapping_mul(6364136223846793005).wrapping_add(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_menu() {
        let state = GameState::new(Tuning::default(), 7).unwrap();
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.level().is_none());
        assert!(!state.is_level_finished());
        assert_eq!(state.player.position(), glam::Vec2::ZERO);
    }

    #[test]
    fn test_with_seed_matches_new() {
        let a = GameState::with_seed(11);
        let b = GameState::new(Tuning::default(), 11).unwrap();
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.day_time, b.day_time);
        assert_eq!(a.player.position(), b.player.position());
        assert_eq!(a.player.lights_on, b.player.lights_on);
        assert_eq!(a.player.boost_multiplier, b.player.boost_multiplier);
    }

    #[test]
    fn test_new_rejects_bad_tuning() {
        let mut tuning = Tuning::default();
        tuning.parking.spot.length = 1.0;
        assert!(GameState::new(tuning, 7).is_err());
    }

    #[test]
    fn test_start_builds_highway() {
        let mut state = GameState::with_seed(7);
        state.player.x = 3.0;
        assert!(state.start());
        assert_eq!(state.phase, GamePhase::Level1);
        assert!(state.level().and_then(Level::as_highway).is_some());
        assert_eq!(state.player.x, 0.0);

        // Only from the menu
        assert!(!state.start());
        assert_eq!(state.phase, GamePhase::Level1);
    }

    #[test]
    fn test_enter_replaces_level() {
        let mut state = GameState::with_seed(7);
        state.start();
        state.enter(GamePhase::Level2);
        assert_eq!(state.level().map(Level::id), Some(LevelId::ParkingLot));
        state.enter(GamePhase::Win);
        assert!(state.level().is_none());
    }

    #[test]
    fn test_day_clock_wraps() {
        let mut state = GameState::with_seed(7);
        assert!(!state.is_night());
        for _ in 0..600 {
            state.advance_clock();
        }
        assert!(state.is_night());
        for _ in 0..1400 {
            state.advance_clock();
        }
        assert!(state.day_time < 1.0);
        assert!((state.day_time - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_level_seeds_differ() {
        assert_ne!(level_seed(5, LevelId::Highway), level_seed(5, LevelId::ParkingLot));
    }
}
