//! Fixed timestep simulation tick
//!
//! One call advances the game by `SIM_DT`. Order inside a level tick:
//! inputs, vehicle physics, level entities, collisions, then the phase
//! transition check.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
///
/// Driving flags are held state and are re-applied every tick. `start` and
/// `toggle_lights` are one-shot commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub accelerate: bool,
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Leave the menu
    pub start: bool,
    /// Headlights on/off (turning them on flashes traffic ahead)
    pub toggle_lights: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.start && state.start() {
        events.push(GameEvent::LevelStarted(GamePhase::Level1));
        return events;
    }

    // Nothing runs outside a level
    match state.phase {
        GamePhase::Menu | GamePhase::Win => return events,
        GamePhase::Level1 | GamePhase::Level2 => {}
    }

    apply_input(state, input);
    state.time_ticks += 1;

    state.player.update();

    let phase = state.phase;
    let (player, level) = state.player_and_level();
    let Some(level) = level else {
        log::warn!("{phase:?} has no level, skipping tick");
        return events;
    };
    level.tick(player, &mut events);
    let was_finished = level.is_finished(player);
    let collided = level.check_collisions(player);
    let finished = level.is_finished(player);

    match phase {
        GamePhase::Level1 => {
            if collided {
                state.reset_player();
                events.push(GameEvent::Collision);
            }
            state.advance_clock();

            if state.is_level_finished() {
                log::info!("highway finished after {} ticks", state.time_ticks);
                events.push(GameEvent::LevelComplete);
                state.enter(GamePhase::Level2);
                events.push(GameEvent::LevelStarted(GamePhase::Level2));
            }
        }
        GamePhase::Level2 => {
            if finished && !was_finished {
                events.push(GameEvent::Parked);
            }
            // The lot only resolves on contact: parked wins, otherwise retry
            if collided {
                if finished {
                    state.enter(GamePhase::Win);
                    events.push(GameEvent::Won);
                } else {
                    state.reset_player();
                    events.push(GameEvent::Collision);
                }
            }
        }
        GamePhase::Menu | GamePhase::Win => {}
    }

    events
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    player.set_accelerating(input.accelerate);
    player.set_braking(input.brake);
    player.set_turning_left(input.turn_left);
    player.set_turning_right(input.turn_right);
    if input.toggle_lights {
        player.toggle_lights();
        log::debug!("lights {}", if player.lights_on { "on" } else { "off" });
    }
}
