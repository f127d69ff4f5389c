//! Simulation controller
//!
//! Owns the world state, the tuning and the collaborators. Hosts call
//! [`Simulation::advance`] once per fixed tick (or [`Simulation::update`] with
//! a frame delta) and render from [`Simulation::state`].

use super::state::{GameEvent, GameState};
use super::tick::{Command, TickInput, tick};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::SimError;
use crate::persistence::HighScoreStore;
use crate::tuning::Tuning;

/// Derive the seed of the next session from the current one
pub fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

pub struct Simulation {
    state: GameState,
    tuning: Tuning,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    /// Last value written to (or read from) the store
    persisted_high_score: u64,
    accumulator: f32,
    /// Commands from frames too short to run a tick
    pending: Vec<Command>,
    sessions: u32,
}

impl Simulation {
    /// Validate the tuning, load the high score and open the splash scene
    pub fn new(
        tuning: Tuning,
        seed: u64,
        mut store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, SimError> {
        tuning.validate()?;
        let high_score = store.load_high_score();
        log::info!(
            "Simulation ready: seed {seed}, difficulty {}, high score {high_score}",
            tuning.difficulty.as_str()
        );

        Ok(Self {
            state: GameState::new(seed, &tuning, high_score),
            tuning,
            store,
            audio,
            persisted_high_score: high_score,
            accumulator: 0.0,
            pending: Vec::new(),
            sessions: 1,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts that script the world (debug tools, tests)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn persisted_high_score(&self) -> u64 {
        self.persisted_high_score
    }

    /// Sessions played so far, counting the current one
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Run one fixed tick and react to the events it raised
    pub fn advance(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, &self.tuning, input, SIM_DT);
        let events = self.state.drain_events();

        let mut session_ended = false;
        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            match *event {
                GameEvent::GameOver { points } => self.persist(points),
                GameEvent::SessionEnded => session_ended = true,
                _ => {}
            }
        }

        self.log_snapshot();
        if session_ended {
            self.reload();
        }
        events
    }

    /// Run as many fixed ticks as `frame_dt` seconds cover, capped at
    /// `MAX_SUBSTEPS`. Commands reach the first substep that runs, which may
    /// be in a later frame. Returns the number of ticks run.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);
        self.pending.extend(input.commands.iter().copied());

        let held = TickInput {
            commands: Vec::new(),
            any_input: input.any_input,
        };
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if substeps == 0 {
                let first = TickInput {
                    commands: std::mem::take(&mut self.pending),
                    any_input: input.any_input,
                };
                self.advance(&first);
            } else {
                self.advance(&held);
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop backlog that the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Render the world state as JSON for debugging
    pub fn snapshot_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    fn persist(&mut self, points: u64) {
        if points > self.persisted_high_score {
            log::info!("New high score {points} (was {})", self.persisted_high_score);
            self.store.save_high_score(points);
            self.persisted_high_score = points;
        }
    }

    /// Replace the world with a fresh session, carrying the high score
    fn reload(&mut self) {
        let seed = next_seed(self.state.seed);
        let high_score = self.state.player.high_score.max(self.persisted_high_score);
        self.state = GameState::new(seed, &self.tuning, high_score);
        self.sessions += 1;
        log::info!("Session {} loaded (seed {seed})", self.sessions);
    }

    fn log_snapshot(&self) {
        let Some(every) = self.tuning.debug_snapshot_every else {
            return;
        };
        if every == 0 || self.state.time_ticks % u64::from(every) != 0 {
            return;
        }
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        match self.snapshot_json() {
            Ok(json) => log::debug!("tick {} snapshot: {json}", self.state.time_ticks),
            Err(err) => log::warn!("Snapshot failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingAudio, SilentAudio};
    use crate::persistence::MemoryStore;
    use crate::sim::state::Scene;
    use crate::sim::tick::{Axis, Direction};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sim_with(store: Rc<RefCell<MemoryStore>>) -> Simulation {
        Simulation::new(Tuning::default(), 7, Box::new(store), Box::new(SilentAudio)).unwrap()
    }

    fn start(sim: &mut Simulation) {
        sim.advance(&TickInput {
            any_input: true,
            ..Default::default()
        });
        assert_eq!(sim.state().scene, Scene::Playing);
    }

    fn lose_last_life(sim: &mut Simulation, points: u64) {
        let state = sim.state_mut();
        state.player.points = points;
        state.player.high_score = state.player.high_score.max(points);
        state.player.lives = 1;
        state.player.health = -0.1;
        sim.advance(&TickInput::default());
        assert_eq!(sim.state().scene, Scene::GameOver);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = Tuning::default();
        tuning.enemies.clear();
        let result = Simulation::new(
            tuning,
            1,
            Box::new(MemoryStore::new()),
            Box::new(SilentAudio),
        );
        assert!(matches!(result, Err(SimError::EmptyCatalog(_))));
    }

    #[test]
    fn test_loads_high_score() {
        let store = Rc::new(RefCell::new(MemoryStore::with_score(300)));
        let sim = sim_with(store);
        assert_eq!(sim.state().player.high_score, 300);
        assert_eq!(sim.persisted_high_score(), 300);
        assert_eq!(sim.state().scene, Scene::Splash);
    }

    #[test]
    fn test_game_over_saves_better_score() {
        let store = Rc::new(RefCell::new(MemoryStore::with_score(50)));
        let mut sim = sim_with(store.clone());
        start(&mut sim);
        lose_last_life(&mut sim, 90);

        assert_eq!(store.borrow().score(), 90);
        assert_eq!(store.borrow().saves(), 1);
        assert_eq!(sim.persisted_high_score(), 90);
    }

    #[test]
    fn test_game_over_keeps_better_stored_score() {
        let store = Rc::new(RefCell::new(MemoryStore::with_score(500)));
        let mut sim = sim_with(store.clone());
        start(&mut sim);
        lose_last_life(&mut sim, 90);

        assert_eq!(store.borrow().score(), 500);
        assert_eq!(store.borrow().saves(), 0);
    }

    #[test]
    fn test_session_reloads_after_countdown() {
        let store = Rc::new(RefCell::new(MemoryStore::new()));
        let mut sim = sim_with(store);
        let seed = sim.state().seed;
        start(&mut sim);
        lose_last_life(&mut sim, 40);

        for _ in 0..sim.tuning().game_over_ticks {
            sim.advance(&TickInput::default());
        }
        assert_eq!(sim.state().scene, Scene::Splash);
        assert_eq!(sim.sessions(), 2);
        assert_eq!(sim.state().seed, next_seed(seed));
        assert_eq!(sim.state().player.high_score, 40);
        assert_eq!(sim.state().player.points, 0);
        assert_eq!(sim.state().player.lives, sim.tuning().player.lives);
        assert!(sim.state().enemies.is_empty());
    }

    #[test]
    fn test_events_reach_audio() {
        let recorder = RecordingAudio::new();
        let mut sim = Simulation::new(
            Tuning::default(),
            3,
            Box::new(MemoryStore::new()),
            Box::new(recorder.clone()),
        )
        .unwrap();
        start(&mut sim);
        lose_last_life(&mut sim, 0);

        assert_eq!(recorder.count(SoundEffect::LifeLost), 1);
        assert_eq!(recorder.count(SoundEffect::GameOver), 1);
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut sim = sim_with(Rc::new(RefCell::new(MemoryStore::new())));
        let idle = TickInput::default();
        assert_eq!(sim.update(SIM_DT * 0.5, &idle), 0);
        assert_eq!(sim.update(SIM_DT * 0.6, &idle), 1);
        // Long frames are capped
        assert_eq!(sim.update(1.0, &idle), MAX_SUBSTEPS);
        assert!(sim.state().time_ticks <= 1 + u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_short_frame_keeps_commands() {
        let mut sim = sim_with(Rc::new(RefCell::new(MemoryStore::new())));
        start(&mut sim);

        let right = TickInput::from_commands(vec![Command::Move {
            axis: Axis::X,
            dir: Direction::Positive,
        }]);
        assert_eq!(sim.update(SIM_DT * 0.5, &right), 0);
        assert_eq!(sim.state().player.vel.x, 0.0);

        assert_eq!(sim.update(SIM_DT * 0.6, &TickInput::default()), 1);
        assert_eq!(sim.state().player.vel.x, 2.0);

        // Delivered once, not replayed on later ticks
        let stop = TickInput::from_commands(vec![Command::Stop {
            axis: Axis::X,
            dir: Direction::Positive,
        }]);
        sim.update(SIM_DT, &stop);
        assert_eq!(sim.state().player.vel.x, 0.0);
        sim.update(SIM_DT, &TickInput::default());
        assert_eq!(sim.state().player.vel.x, 0.0);
    }

    #[test]
    fn test_snapshot_json() {
        let sim = sim_with(Rc::new(RefCell::new(MemoryStore::new())));
        let json = sim.snapshot_json().unwrap();
        assert!(json.contains("\"scene\": \"Splash\""));
        assert!(json.contains("\"player\""));
    }

    #[test]
    fn test_next_seed_is_deterministic() {
        assert_eq!(next_seed(1), next_seed(1));
        assert_ne!(next_seed(1), 1);
        assert_ne!(next_seed(1), next_seed(2));
    }
}
