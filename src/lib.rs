//! Cairo Drive - simulation core for a highway-then-parking arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (vehicle, traffic, power-ups, levels, game state)
//! - `tuning`: Data-driven game balance, validated once at startup
//!
//! Rendering, model loading, cameras and input binding live outside this crate
//! and only read `sim::Snapshot` / call the `TickInput` setters.

pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (~60 Hz). All per-tick steps are tuned for it.
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player spawn point for every level entry and collision reset
    pub const START_X: f32 = 0.0;
    pub const START_Z: f32 = 0.0;
}

/// Unit direction on the ground plane for a heading in degrees (0 = +z).
///
/// The returned vector is `(x, z)`.
#[inline]
pub fn heading_to_dir(heading_deg: f32) -> Vec2 {
    let rad = heading_deg.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}
