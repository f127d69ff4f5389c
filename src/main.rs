//! Scroll Shooter headless runner
//!
//! Plays seeded sessions with a simple autopilot and logs progress. There is
//! no renderer; set `RUST_LOG=debug` to follow the simulation in detail.
//!
//! Usage: `scroll-shooter [--seed N] [--seconds N] [--difficulty easy|normal|hard]
//! [--tuning FILE] [--save FILE] [--volume V] [--sfx-volume V] [--mute]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use scroll_shooter::audio::LogAudio;
    use scroll_shooter::consts::TICK_HZ;
    use scroll_shooter::persistence::{HighScoreStore, JsonFileStore, MemoryStore};
    use scroll_shooter::platform::{InputMapper, Key, KeyEvent};
    use scroll_shooter::sim::{Body, GameEvent, GameState, Scene, Simulation};
    use scroll_shooter::{Difficulty, SimError, Tuning};

    struct Options {
        seed: u64,
        seconds: u32,
        difficulty: Difficulty,
        tuning: Option<PathBuf>,
        save: Option<PathBuf>,
        volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                seed: 12345,
                seconds: 120,
                difficulty: Difficulty::Normal,
                tuning: None,
                save: None,
                volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }
    }

    fn parse_args() -> Result<Options, String> {
        let mut opts = Options::default();
        let mut args = std::env::args().skip(1);
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--seed" => opts.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
                "--seconds" => {
                    opts.seconds = value()?.parse().map_err(|e| format!("--seconds: {e}"))?
                }
                "--difficulty" => {
                    opts.difficulty = value()?.parse().map_err(|e: SimError| e.to_string())?
                }
                "--volume" => {
                    opts.volume = value()?.parse().map_err(|e| format!("--volume: {e}"))?
                }
                "--sfx-volume" => {
                    opts.sfx_volume = value()?.parse().map_err(|e| format!("--sfx-volume: {e}"))?
                }
                "--mute" => opts.muted = true,
                "--tuning" => opts.tuning = Some(PathBuf::from(value()?)),
                "--save" => opts.save = Some(PathBuf::from(value()?)),
                other => return Err(format!("unknown argument {other:?}")),
            }
        }
        Ok(opts)
    }

    fn load_tuning(opts: &Options) -> Result<Tuning, SimError> {
        let mut tuning = match &opts.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        tuning.apply_difficulty(opts.difficulty);
        Ok(tuning)
    }

    /// Presses keys the way a cautious player would
    #[derive(Default)]
    struct Autopilot {
        held: Vec<Key>,
    }

    impl Autopilot {
        fn wanted(state: &GameState) -> Vec<Key> {
            match state.scene {
                Scene::Splash => vec![Key::Comma],
                Scene::GameOver => Vec::new(),
                Scene::Playing => {
                    let player = state.player.bounds();
                    let center = player.center();
                    let mut keys = vec![Key::Comma];

                    // Chase the lowest enemy horizontally
                    let target = state
                        .enemies
                        .iter()
                        .map(|e| e.bounds().center())
                        .max_by(|a, b| a.y.total_cmp(&b.y));
                    if let Some(target) = target {
                        if target.x < center.x - 2.0 {
                            keys.push(Key::Left);
                        } else if target.x > center.x + 2.0 {
                            keys.push(Key::Right);
                        }
                        if (target.x - center.x).abs() < 8.0 {
                            keys.push(Key::Period);
                        }
                    }

                    // Shield against shots about to land
                    let threatened = state.enemy_projectiles.iter().any(|p| {
                        let shot = p.bounds();
                        shot.max().y < player.min.y
                            && player.min.y - shot.max().y < 24.0
                            && shot.max().x >= player.min.x
                            && shot.min.x <= player.max().x
                    });
                    if threatened && state.player.shield_health > 0.0 {
                        keys.push(Key::Shift);
                    }
                    keys
                }
            }
        }

        fn drive(&mut self, state: &GameState, mapper: &mut InputMapper) {
            let wanted = Self::wanted(state);
            for key in self.held.iter().filter(|k| !wanted.contains(k)) {
                mapper.key_event(KeyEvent::up(*key));
            }
            for key in wanted.iter().filter(|k| !self.held.contains(k)) {
                mapper.key_event(KeyEvent::down(*key));
            }
            self.held = wanted;
        }
    }

    fn run() -> Result<(), SimError> {
        let opts = parse_args().map_err(|reason| SimError::InvalidTuning {
            field: "arguments",
            reason,
        })?;
        let tuning = load_tuning(&opts)?;

        let store: Box<dyn HighScoreStore> = match &opts.save {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        let mut audio = LogAudio::new();
        audio.set_master_volume(opts.volume);
        audio.set_sfx_volume(opts.sfx_volume);
        audio.set_muted(opts.muted);
        let mut sim = Simulation::new(tuning, opts.seed, store, Box::new(audio))?;

        let mut mapper = InputMapper::new();
        let mut pilot = Autopilot::default();
        let total_ticks = u64::from(opts.seconds) * u64::from(TICK_HZ);
        let mut kills = 0u64;

        for _ in 0..total_ticks {
            pilot.drive(sim.state(), &mut mapper);
            let input = mapper.take();
            for event in sim.advance(&input) {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::GameOver { points } => {
                        log::info!("Session {} over: {points} points", sim.sessions());
                    }
                    _ => {}
                }
            }

            let state = sim.state();
            if state.time_ticks > 0 && state.time_ticks % (u64::from(TICK_HZ) * 10) == 0 {
                log::info!(
                    "t={}s scene={:?} points={} lives={} health={:.2} shield={:.2} entities={}",
                    state.time_ticks / u64::from(TICK_HZ),
                    state.scene,
                    state.player.points,
                    state.player.lives,
                    state.player.health,
                    state.player.shield_health,
                    state.entity_count(),
                );
            }
        }

        log::info!(
            "Finished {} sessions, {kills} kills, high score {}",
            sim.sessions(),
            sim.persisted_high_score().max(sim.state().player.high_score)
        );
        Ok(())
    }

    pub fn main() {
        env_logger::init();
        log::info!("Scroll Shooter (headless) starting...");
        if let Err(err) = run() {
            log::error!("{err}");
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm
}
