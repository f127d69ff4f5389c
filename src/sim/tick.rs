//! Fixed timestep simulation tick
//!
//! Scene state machine and per-tick dispatch. Only the playing scene runs
//! gameplay; splash and game over keep the star field moving.

use super::state::{GameEvent, GameState, Scene, WeaponKind};
use super::{combat, motion, spawner, weapons};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Negative => -1.0,
            Direction::Positive => 1.0,
        }
    }
}

/// A player intent, already decoupled from the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start moving along an axis at full speed
    Move { axis: Axis, dir: Direction },
    /// Stop moving, but only if still heading `dir`
    Stop { axis: Axis, dir: Direction },
    Trigger { weapon: WeaponKind, down: bool },
    Shield(bool),
    TogglePause,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
    /// Any key or button was active this tick
    pub any_input: bool,
}

impl TickInput {
    pub fn from_commands(commands: Vec<Command>) -> Self {
        let any_input = !commands.is_empty();
        Self { commands, any_input }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, tuning: &Tuning, input: &TickInput, dt: f32) {
    for command in &input.commands {
        if *command == Command::TogglePause {
            state.running = !state.running;
            log::info!("{}", if state.running { "Resumed" } else { "Paused" });
        }
    }

    if !state.running {
        // Keys released during a pause must not stay held after resuming
        if state.scene != Scene::GameOver {
            apply_commands(state, &input.commands);
        }
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += f64::from(dt) * 1000.0;

    match state.scene {
        Scene::Splash => {
            motion::step_stars(state, tuning);
            if input.any_input {
                begin_play(state, tuning);
                apply_commands(state, &input.commands);
            }
        }
        Scene::Playing => {
            apply_commands(state, &input.commands);
            motion::advance_gameplay(state, tuning, dt);
            motion::step_stars(state, tuning);
            weapons::update_shield(state);
            weapons::update_weapons(state);
            combat::resolve(state, tuning);
            if state.scene == Scene::Playing {
                spawner::update_spawner(state, tuning, dt * 1000.0);
            }
        }
        Scene::GameOver => {
            motion::step_stars(state, tuning);
            if state.game_over_ticks > 0 {
                state.game_over_ticks -= 1;
                if state.game_over_ticks == 0 {
                    log::info!("Session ended");
                    state.emit(GameEvent::SessionEnded);
                }
            }
        }
    }
}

/// Splash to playing: arm the spawners exactly once
fn begin_play(state: &mut GameState, tuning: &Tuning) {
    state.scene = Scene::Playing;
    spawner::start(state, tuning);
    log::info!("Game started (seed {})", state.seed);
    state.emit(GameEvent::GameStarted);
}

/// Playing to game over: disarm the spawners and start the countdown
pub fn end_game(state: &mut GameState, tuning: &Tuning) {
    state.scene = Scene::GameOver;
    state.game_over_ticks = tuning.game_over_ticks.max(1);
    spawner::stop(state);
    let points = state.player.points;
    log::info!("Game over with {points} points (best {})", state.player.high_score);
    state.emit(GameEvent::GameOver { points });
}

/// Apply movement, trigger and shield commands to the player
pub fn apply_commands(state: &mut GameState, commands: &[Command]) {
    let player = &mut state.player;
    for command in commands {
        match *command {
            Command::Move { axis, dir } => {
                let v = dir.sign() * player.speed;
                match axis {
                    Axis::X => player.vel.x = v,
                    Axis::Y => player.vel.y = v,
                }
            }
            Command::Stop { axis, dir } => {
                let component = match axis {
                    Axis::X => &mut player.vel.x,
                    Axis::Y => &mut player.vel.y,
                };
                if *component * dir.sign() > 0.0 {
                    *component = 0.0;
                }
            }
            Command::Trigger { weapon, down } => {
                player.weapon_mut(weapon).trigger_down = down;
            }
            Command::Shield(up) => player.shield_up = up,
            Command::TogglePause => {}
        }
    }
}
