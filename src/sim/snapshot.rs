//! Read-only view of the world for renderers and tooling
//!
//! Everything a frontend needs to draw one frame, as plain serializable data.

use serde::{Deserialize, Serialize};

use super::collision::ParkingSpot;
use super::level::Level;
use super::parking::Prop;
use super::powerup::{CollectibleKind, EffectKind};
use super::state::{GamePhase, GameState};
use super::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarView {
    pub x: f32,
    pub z: f32,
    pub heading: f32,
    pub speed: f32,
    pub tilt_angle: f32,
    pub lights_on: bool,
    pub boosted: bool,
}

impl From<&Vehicle> for CarView {
    fn from(v: &Vehicle) -> Self {
        Self {
            x: v.x,
            z: v.z,
            heading: v.heading,
            speed: v.speed,
            tilt_angle: v.tilt_angle,
            lights_on: v.lights_on,
            boosted: v.is_boosted(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub length: f32,
    pub moving_aside: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollectibleView {
    pub x: f32,
    pub z: f32,
    pub kind: CollectibleKind,
    pub rotation: f32,
}

/// HUD values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hud {
    /// Distance driven on the highway
    pub distance: Option<f32>,
    pub finish_distance: Option<f32>,
    pub effects: Vec<(EffectKind, f32)>,
    /// Seconds left before the car counts as parked
    pub parking_remaining: Option<f32>,
    pub is_night: bool,
    pub resets: u32,
}

/// One frame of world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub day_time: f32,
    pub player: CarView,
    pub obstacles: Vec<ObstacleView>,
    pub collectibles: Vec<CollectibleView>,
    pub props: Vec<Prop>,
    pub spot: Option<ParkingSpot>,
    pub hud: Hud,
}

impl GameState {
    /// Capture the current frame
    pub fn snapshot(&self) -> Snapshot {
        let mut snap = Snapshot {
            phase: self.phase,
            tick: self.time_ticks,
            day_time: self.day_time,
            player: CarView::from(&self.player),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            props: Vec::new(),
            spot: None,
            hud: Hud {
                is_night: self.is_night(),
                resets: self.resets,
                ..Default::default()
            },
        };

        match self.level() {
            Some(Level::Highway(h)) => {
                snap.obstacles = h
                    .traffic
                    .obstacles()
                    .iter_active()
                    .map(|o| ObstacleView {
                        x: o.x,
                        z: o.z,
                        width: o.width,
                        length: o.length,
                        moving_aside: o.is_moving_aside,
                    })
                    .collect();
                snap.collectibles = h
                    .powerups
                    .collectibles()
                    .iter_active()
                    .map(|c| CollectibleView {
                        x: c.x,
                        z: c.z,
                        kind: c.kind,
                        rotation: c.rotation,
                    })
                    .collect();
                snap.hud.distance = Some(h.distance(&self.player));
                snap.hud.finish_distance = Some(h.finish_distance());
                snap.hud.effects = [EffectKind::NoTraffic, EffectKind::SpeedBoost]
                    .into_iter()
                    .filter_map(|kind| h.effects().get(kind).remaining().map(|left| (kind, left)))
                    .collect();
            }
            Some(Level::ParkingLot(p)) => {
                snap.props = p.props.clone();
                snap.spot = Some(p.spot);
                snap.hud.parking_remaining = p.parking_remaining();
            }
            None => {}
        }

        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_snapshot_is_empty() {
        let state = GameState::with_seed(1);
        let snap = state.snapshot();
        assert_eq!(snap.phase, GamePhase::Menu);
        assert!(snap.obstacles.is_empty());
        assert!(snap.spot.is_none());
        assert!(snap.hud.distance.is_none());
    }

    #[test]
    fn test_highway_snapshot() {
        let mut state = GameState::with_seed(1);
        state.start();
        let mut player = state.player.clone();
        if let Some(h) = state.level_mut().and_then(Level::as_highway_mut) {
            h.traffic.obstacles_mut().get_mut(2).unwrap().activate(1.0, 60.0, 0.05);
            h.powerups
                .apply(CollectibleKind::SpeedBoost, &mut player, &mut h.traffic);
        }

        let snap = state.snapshot();
        assert_eq!(snap.obstacles.len(), 1);
        assert_eq!(snap.obstacles[0].z, 60.0);
        assert!(!snap.collectibles.is_empty());
        assert_eq!(snap.hud.finish_distance, Some(1000.0));
        assert_eq!(snap.hud.effects, vec![(EffectKind::SpeedBoost, 3.0)]);
        assert!(snap.props.is_empty());
    }

    #[test]
    fn test_parking_snapshot_serializes() {
        let mut state = GameState::with_seed(1);
        state.start();
        state.enter(GamePhase::Level2);
        let snap = state.snapshot();
        assert_eq!(snap.props.len(), 5);
        assert!(snap.spot.is_some());
        assert!(snap.obstacles.is_empty());

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Level2\""));
        assert!(json.contains("Pedestrian"));
    }
}
