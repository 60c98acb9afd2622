//! Cairo Drive headless runner
//!
//! Drives the simulation with a simple autopilot at a simulated frame rate and
//! prints the final frame as JSON.
//!
//! Usage: `cairo-drive [tuning.json] [frames]`

use std::env;
use std::fs;

use anyhow::{Context, Result};

use cairo_drive::consts::{MAX_SUBSTEPS, SIM_DT};
use cairo_drive::sim::{GameEvent, GamePhase, GameState, Level, TickInput, tick};
use cairo_drive::Tuning;

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 60 * 90;
const SEED: u64 = 0x5eed;

/// Runner holding the state and the frame accumulator
struct Runner {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    events: Vec<GameEvent>,
}

impl Runner {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                start: true,
                ..Default::default()
            },
            events: Vec::new(),
        }
    }

    /// Run as many fixed ticks as the frame time covers
    fn frame(&mut self, dt: f32) {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.steer();
            let events = tick(&mut self.state, &self.input);
            for event in &events {
                log::info!("tick {}: {event:?}", self.state.time_ticks);
            }
            self.events.extend(events);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs are consumed by the tick that saw them
            self.input.start = false;
            self.input.toggle_lights = false;
        }
    }

    /// Pick held inputs for the next tick
    fn steer(&mut self) {
        let player = &self.state.player;
        let (target_x, target_z, stop) = match self.state.level() {
            Some(Level::Highway(h)) => {
                // Dodge the nearest car ahead, flash it when it gets close
                let blocker = h
                    .traffic
                    .obstacles()
                    .iter_active()
                    .filter(|o| o.z > player.z && o.z - player.z < 25.0 && (o.x - player.x).abs() < 3.0)
                    .min_by(|a, b| a.z.total_cmp(&b.z));
                let lane = match blocker {
                    Some(o) => {
                        if o.z - player.z < 12.0 {
                            self.input.toggle_lights = true;
                        }
                        if o.x >= 0.0 { o.x - 4.0 } else { o.x + 4.0 }
                    }
                    None => 0.0,
                };
                (lane.clamp(-7.0, 7.0), player.z + 20.0, false)
            }
            Some(Level::ParkingLot(p)) if p.is_finished() => {
                // Parked: the lot is won on the next contact
                match p.props.first() {
                    Some(prop) => (prop.rect.x, prop.rect.z, false),
                    None => return,
                }
            }
            Some(Level::ParkingLot(p)) => {
                let center = p.spot.center();
                (center.x, center.y, true)
            }
            None => {
                self.input = TickInput {
                    start: self.input.start,
                    ..Default::default()
                };
                return;
            }
        };

        let dx = target_x - player.x;
        let dz = target_z - player.z;
        let distance = dx.hypot(dz);
        let wanted = dx.atan2(dz).to_degrees();
        let error = wrap_degrees(wanted - player.heading);

        self.input.turn_left = error > 2.0;
        self.input.turn_right = error < -2.0;
        if stop && distance < 0.5 {
            self.input.accelerate = false;
            self.input.brake = player.speed > 0.0;
        } else {
            let cruise = if stop { 0.08 } else { f32::INFINITY };
            self.input.accelerate = player.speed < cruise;
            self.input.brake = false;
        }
    }
}

/// Map an angle into (-180, 180]
fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

fn load_tuning(path: Option<&str>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading tuning file {path}"))?;
    Tuning::from_json(&json).with_context(|| format!("loading tuning from {path}"))
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Cairo Drive (headless) starting...");

    let args: Vec<String> = env::args().skip(1).collect();
    let tuning = load_tuning(args.first().map(String::as_str))?;
    let frames = match args.get(1) {
        Some(n) => n.parse().with_context(|| format!("bad frame count {n:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let mut runner = Runner::new(GameState::new(tuning, SEED)?);
    for _ in 0..frames {
        runner.frame(FRAME_DT);
        if runner.state.phase == GamePhase::Win {
            break;
        }
    }

    log::info!(
        "finished in {:?} after {} ticks, {} crash(es), {} event(s)",
        runner.state.phase,
        runner.state.time_ticks,
        runner.state.resets,
        runner.events.len()
    );
    println!("{}", serde_json::to_string_pretty(&runner.state.snapshot())?);
    Ok(())
}
