//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, one stream per level
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod highway;
pub mod level;
pub mod parking;
pub mod pool;
pub mod powerup;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod traffic;
pub mod vehicle;

pub use collision::{ParkingSpot, Rect, box_overlap, periodic_overlap, zone_contains};
pub use highway::HighwayLevel;
pub use level::{Level, LevelId};
pub use parking::{ParkingLevel, Prop, PropKind};
pub use powerup::{Collectible, CollectibleKind, EffectKind, PowerupSystem, TimedEffect};
pub use snapshot::{CarView, CollectibleView, Hud, ObstacleView, Snapshot};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use traffic::{Obstacle, TrafficSim};
pub use vehicle::{DriveInput, Vehicle};
