//! Collectibles and the timed effects they grant
//!
//! Two independent single-slot effects: NoTraffic (from a TrafficClear pickup)
//! and SpeedBoost. Picking up an effect that is already running restarts its
//! countdown; nothing stacks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::box_overlap;
use super::pool::{Pool, Pooled};
use super::traffic::TrafficSim;
use super::vehicle::Vehicle;
use crate::consts::SIM_DT;
use crate::tuning::PowerupTuning;

/// Cosmetic spin applied to collectibles each tick (degrees)
const SPIN_PER_TICK: f32 = 2.0;

/// What a collectible grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    TrafficClear,
    SpeedBoost,
}

impl CollectibleKind {
    /// The effect this pickup starts
    pub fn effect(self) -> EffectKind {
        match self {
            CollectibleKind::TrafficClear => EffectKind::NoTraffic,
            CollectibleKind::SpeedBoost => EffectKind::SpeedBoost,
        }
    }
}

/// A pickup floating over the road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub x: f32,
    pub z: f32,
    pub kind: CollectibleKind,
    pub active: bool,
    /// Renderer-only spin angle (degrees)
    pub rotation: f32,
}

impl Collectible {
    fn idle() -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            kind: CollectibleKind::SpeedBoost,
            active: false,
            rotation: 0.0,
        }
    }
}

impl Pooled for Collectible {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Timed effect identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    NoTraffic,
    SpeedBoost,
}

/// A countdown that is either running or not
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub active: bool,
    /// Seconds left while active
    pub remaining: f32,
}

impl TimedEffect {
    /// Start, or restart, the countdown
    pub fn activate(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    /// Count down one tick. Returns true on the tick the effect expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }

    /// Remaining seconds, if running
    pub fn remaining(&self) -> Option<f32> {
        self.active.then_some(self.remaining)
    }
}

/// Both effect slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub no_traffic: TimedEffect,
    pub speed_boost: TimedEffect,
}

impl Effects {
    pub fn get(&self, kind: EffectKind) -> &TimedEffect {
        match kind {
            EffectKind::NoTraffic => &self.no_traffic,
            EffectKind::SpeedBoost => &self.speed_boost,
        }
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> &mut TimedEffect {
        match kind {
            EffectKind::NoTraffic => &mut self.no_traffic,
            EffectKind::SpeedBoost => &mut self.speed_boost,
        }
    }
}

/// Collectible pool plus effect state
#[derive(Debug, Clone)]
pub struct PowerupSystem {
    pool: Pool<Collectible>,
    effects: Effects,
    tuning: PowerupTuning,
}

impl PowerupSystem {
    pub fn new(tuning: PowerupTuning) -> Self {
        Self {
            pool: Pool::new(tuning.pool_size, Collectible::idle),
            effects: Effects::default(),
            tuning,
        }
    }

    pub fn collectibles(&self) -> &Pool<Collectible> {
        &self.pool
    }

    pub fn collectibles_mut(&mut self) -> &mut Pool<Collectible> {
        &mut self.pool
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.effects.get(kind).active
    }

    /// Count both effects down one tick and undo whatever expired
    pub fn tick_effects(&mut self, player: &mut Vehicle) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in [EffectKind::NoTraffic, EffectKind::SpeedBoost] {
            if self.effects.get_mut(kind).tick(SIM_DT) {
                if kind == EffectKind::SpeedBoost {
                    player.set_boost(false);
                }
                log::info!("{kind:?} expired");
                expired.push(kind);
            }
        }
        expired
    }

    /// Start an effect and apply its immediate consequences
    pub fn apply(&mut self, kind: CollectibleKind, player: &mut Vehicle, traffic: &mut TrafficSim) {
        let effect = kind.effect();
        let duration = match effect {
            EffectKind::NoTraffic => self.tuning.no_traffic_duration,
            EffectKind::SpeedBoost => self.tuning.speed_boost_duration,
        };
        self.effects.get_mut(effect).activate(duration);

        match kind {
            CollectibleKind::TrafficClear => traffic.clear_all(),
            CollectibleKind::SpeedBoost => player.set_boost(true),
        }
    }

    /// Give every idle slot a (rare) chance to appear ahead of the player,
    /// away from other collectibles and traffic
    pub fn spawn<R: Rng>(&mut self, player_z: f32, traffic: &TrafficSim, rng: &mut R) -> usize {
        let (min, span) = (self.tuning.spawn_ahead_min, self.tuning.spawn_ahead_span);
        let mut spawned = 0;
        for slot in self.pool.inactive_slots() {
            if !rng.random_bool(self.tuning.spawn_chance) {
                continue;
            }
            if self.try_place(slot, player_z + min, span, traffic, rng) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Fill every slot in a window ahead of the start line (level start)
    pub fn scatter<R: Rng>(&mut self, from_z: f32, span: f32, traffic: &TrafficSim, rng: &mut R) -> usize {
        let mut placed = 0;
        for slot in self.pool.inactive_slots() {
            if self.try_place(slot, from_z, span, traffic, rng) {
                placed += 1;
            }
        }
        placed
    }

    fn try_place<R: Rng>(
        &mut self,
        slot: usize,
        from_z: f32,
        span: f32,
        traffic: &TrafficSim,
        rng: &mut R,
    ) -> bool {
        let half_road = traffic.half_road();
        let x = rng.random_range(-half_road..=half_road);
        let z = from_z + rng.random::<f32>() * span;
        let kind = if rng.random_bool(self.tuning.traffic_clear_weight) {
            CollectibleKind::TrafficClear
        } else {
            CollectibleKind::SpeedBoost
        };

        let (cw, cl) = (self.tuning.clearance_width, self.tuning.clearance_length);
        let crowded = self
            .pool
            .others_active(slot)
            .any(|c| box_overlap(x, z, cw, cl, c.x, c.z, cw, cl))
            || traffic.hits(x, z, cw, cl);
        if crowded {
            return false;
        }

        if let Some(c) = self.pool.get_mut(slot) {
            c.x = x;
            c.z = z;
            c.kind = kind;
            c.active = true;
            c.rotation = 0.0;
            log::debug!("collectible slot {slot}: {kind:?} at ({x:.1}, {z:.1})");
            return true;
        }
        false
    }

    /// Spin, retire the ones left behind, and hand out whatever the player touches
    pub fn collect(&mut self, player: &mut Vehicle, traffic: &mut TrafficSim) -> Vec<CollectibleKind> {
        let reach = self.tuning.pickup_half_extent * 2.0;
        let behind = player.z - self.tuning.despawn_behind;
        let mut picked = Vec::new();

        for c in self.pool.iter_active_mut() {
            c.rotation = (c.rotation + SPIN_PER_TICK) % 360.0;
            if c.z < behind {
                c.deactivate();
                continue;
            }
            if box_overlap(player.x, player.z, reach, reach, c.x, c.z, 0.0, 0.0) {
                c.deactivate();
                picked.push(c.kind);
            }
        }

        for &kind in &picked {
            log::info!("picked up {kind:?}");
            self.apply(kind, player, traffic);
        }
        picked
    }
}
