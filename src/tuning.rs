//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a host can ship a JSON
//! balance file instead of recompiling. Missing fields fall back to the
//! defaults.

use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::random_between;
use crate::sim::state::{BonusAction, EnemyProjectileKind, WeaponKind};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Multiplier on spawn delays (lower spawns faster)
    pub fn spawn_delay_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.6,
        }
    }

    /// Multiplier on the per-tick enemy fire chance
    pub fn fire_chance_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.75,
        }
    }
}

impl FromStr for Difficulty {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "norm" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SimError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Inclusive numeric range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        random_between(rng, self.min, self.max)
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

/// Player ship parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSpec {
    pub size: Vec2,
    /// Pixels per tick while a direction is held
    pub speed: f32,
    pub lives: u32,
    /// Hull damage per enemy projectile
    pub damage_per_hit: f32,
    /// Shield charge spent per absorbed projectile
    pub shield_hit_cost: f32,
    /// Length of the hurt flash
    pub hurt_ticks: u32,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            size: Vec2::new(27.0, 21.0),
            speed: 2.0,
            lives: 3,
            damage_per_hit: 0.1,
            shield_hit_cost: 0.1,
            hurt_ticks: 12,
        }
    }
}

/// Weapon parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    /// Pixels per tick, upward
    pub speed: f32,
    pub fire_interval_ms: f64,
    pub projectile_size: Vec2,
    pub damage: f32,
}

/// Enemy catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBlueprint {
    pub name: String,
    pub size: Vec2,
    pub health: f32,
    pub damage_multiplier: f32,
    pub projectiles: Vec<EnemyProjectileKind>,
    /// Opaque tint handed to the renderer for explosion debris
    pub debris_color: u32,
}

/// Enemy projectile parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectileSpec {
    pub kind: EnemyProjectileKind,
    pub size: Vec2,
    /// Pixels per tick, downward
    pub speed: f32,
}

/// Bonus item catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusBlueprint {
    pub action: BonusAction,
    pub size: Vec2,
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: Difficulty,
    pub viewport: Vec2,
    /// Global speed multiplier for the scroll
    pub game_speed: f32,
    /// Base scroll rate in pixels per tick
    pub scroll_speed: f32,
    pub player: PlayerSpec,
    /// Loadout, ordered by `WeaponKind`
    pub weapons: Vec<WeaponSpec>,
    pub enemies: Vec<EnemyBlueprint>,
    pub enemy_projectiles: Vec<EnemyProjectileSpec>,
    pub bonuses: Vec<BonusBlueprint>,
    pub enemy_spawn_ms: Span,
    pub bonus_spawn_ms: Span,
    /// Per-enemy, per-tick chance to fire
    pub enemy_fire_chance: f32,
    /// Bonus fall speed as a fraction of the scroll speed
    pub bonus_fall_factor: f32,
    pub points_per_hit: u64,
    pub hit_flash_ticks: u32,
    /// Debris fragments per pixel of enemy width
    pub debris_per_width: f32,
    /// Maximum scatter distance of a debris fragment
    pub debris_scatter: f32,
    pub debris_secs: Span,
    /// Duration of each enemy dance leg
    pub enemy_leg_secs: Span,
    pub game_over_ticks: u32,
    pub star_count: usize,
    /// Log a JSON state dump every N ticks
    pub debug_snapshot_every: Option<u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        use EnemyProjectileKind::*;

        Self {
            difficulty: Difficulty::Normal,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            game_speed: 1.0,
            scroll_speed: 1.0,
            player: PlayerSpec::default(),
            weapons: vec![
                WeaponSpec {
                    kind: WeaponKind::Gun,
                    speed: 3.0,
                    fire_interval_ms: 60.0,
                    projectile_size: Vec2::new(1.0, 3.0),
                    damage: 0.06,
                },
                WeaponSpec {
                    kind: WeaponKind::Cannon,
                    speed: 2.0,
                    fire_interval_ms: 400.0,
                    projectile_size: Vec2::new(3.0, 5.0),
                    damage: 0.7,
                },
            ],
            enemies: vec![
                EnemyBlueprint {
                    name: "Drone".into(),
                    size: Vec2::new(16.0, 12.0),
                    health: 0.5,
                    damage_multiplier: 1.0,
                    projectiles: vec![Pellet],
                    debris_color: 0x9be564,
                },
                EnemyBlueprint {
                    name: "Striker".into(),
                    size: Vec2::new(20.0, 16.0),
                    health: 1.0,
                    damage_multiplier: 0.8,
                    projectiles: vec![Pellet, Bolt],
                    debris_color: 0xe5a364,
                },
                EnemyBlueprint {
                    name: "Hulk".into(),
                    size: Vec2::new(32.0, 24.0),
                    health: 3.0,
                    damage_multiplier: 0.5,
                    projectiles: vec![Bolt],
                    debris_color: 0xc864e5,
                },
            ],
            enemy_projectiles: vec![
                EnemyProjectileSpec {
                    kind: Pellet,
                    size: Vec2::new(2.0, 2.0),
                    speed: 2.0,
                },
                EnemyProjectileSpec {
                    kind: Bolt,
                    size: Vec2::new(1.0, 4.0),
                    speed: 3.0,
                },
            ],
            bonuses: vec![
                BonusBlueprint {
                    action: BonusAction::AddHealth,
                    size: Vec2::new(10.0, 10.0),
                },
                BonusBlueprint {
                    action: BonusAction::RepairShield,
                    size: Vec2::new(10.0, 10.0),
                },
            ],
            enemy_spawn_ms: Span::new(100.0, 3000.0),
            bonus_spawn_ms: Span::new(4000.0, 12000.0),
            enemy_fire_chance: 1.0 / 60.0,
            bonus_fall_factor: 0.5,
            points_per_hit: 10,
            hit_flash_ticks: 6,
            debris_per_width: 0.5,
            debris_scatter: 24.0,
            debris_secs: Span::new(0.3, 0.8),
            enemy_leg_secs: Span::new(1.5, 4.0),
            game_over_ticks: 3 * TICK_HZ,
            star_count: 60,
            debug_snapshot_every: None,
        }
    }
}

impl Tuning {
    /// Defaults adjusted for a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.apply_difficulty(difficulty);
        tuning
    }

    /// Rescale spawn pacing and enemy aggression for a preset
    ///
    /// Scales are relative to Normal, so switching presets does not compound.
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        let previous = self.difficulty;
        let delay = difficulty.spawn_delay_scale() / previous.spawn_delay_scale();
        let fire = difficulty.fire_chance_scale() / previous.fire_chance_scale();

        self.enemy_spawn_ms = self.enemy_spawn_ms.scaled(delay);
        self.bonus_spawn_ms = self.bonus_spawn_ms.scaled(delay);
        self.enemy_fire_chance = (self.enemy_fire_chance * fire).min(1.0);
        self.difficulty = difficulty;
    }

    /// Parse a JSON balance file and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Size and speed of an enemy projectile kind
    pub fn enemy_projectile(
        &self,
        kind: EnemyProjectileKind,
    ) -> Result<&EnemyProjectileSpec, SimError> {
        self.enemy_projectiles
            .iter()
            .find(|spec| spec.kind == kind)
            .ok_or_else(|| invalid("enemy_projectiles", format!("no spec for {kind:?}")))
    }

    pub fn enemy_blueprint(&self, index: usize) -> Result<&EnemyBlueprint, SimError> {
        self.enemies.get(index).ok_or(SimError::BlueprintOutOfRange {
            catalog: "enemy",
            index,
            len: self.enemies.len(),
        })
    }

    pub fn bonus_blueprint(&self, index: usize) -> Result<&BonusBlueprint, SimError> {
        self.bonuses.get(index).ok_or(SimError::BlueprintOutOfRange {
            catalog: "bonus",
            index,
            len: self.bonuses.len(),
        })
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.viewport.x > 0.0 && self.viewport.y > 0.0) {
            return Err(invalid("viewport", "must be positive".into()));
        }
        check_size("player.size", self.player.size)?;
        if self.player.lives == 0 {
            return Err(invalid("player.lives", "must be at least 1".into()));
        }
        check_non_negative("player.speed", self.player.speed)?;
        check_non_negative("player.damage_per_hit", self.player.damage_per_hit)?;
        check_non_negative("player.shield_hit_cost", self.player.shield_hit_cost)?;
        check_non_negative("game_speed", self.game_speed)?;
        check_non_negative("scroll_speed", self.scroll_speed)?;
        check_non_negative("bonus_fall_factor", self.bonus_fall_factor)?;
        check_non_negative("debris_per_width", self.debris_per_width)?;
        check_non_negative("debris_scatter", self.debris_scatter)?;

        if self.weapons.len() != WeaponKind::ALL.len() {
            return Err(invalid(
                "weapons",
                format!("expected {} weapons", WeaponKind::ALL.len()),
            ));
        }
        for (spec, kind) in self.weapons.iter().zip(WeaponKind::ALL) {
            if spec.kind != kind {
                return Err(invalid("weapons", format!("slot {} must be {kind}", kind.index())));
            }
            check_size("weapons.projectile_size", spec.projectile_size)?;
            if !(spec.fire_interval_ms >= 0.0 && spec.fire_interval_ms.is_finite()) {
                return Err(invalid(
                    "weapons.fire_interval_ms",
                    "must be finite and non-negative".into(),
                ));
            }
            check_non_negative("weapons.speed", spec.speed)?;
            check_non_negative("weapons.damage", spec.damage)?;
        }

        if self.enemies.is_empty() {
            return Err(SimError::EmptyCatalog("enemy"));
        }
        if self.bonuses.is_empty() {
            return Err(SimError::EmptyCatalog("bonus"));
        }
        for enemy in &self.enemies {
            check_size("enemies.size", enemy.size)?;
            if enemy.size.x > self.viewport.x {
                return Err(invalid("enemies.size", format!("{} is wider than the viewport", enemy.name)));
            }
            if !(enemy.health > 0.0 && enemy.health.is_finite()) {
                return Err(invalid("enemies.health", format!("{} must start alive", enemy.name)));
            }
            if enemy.projectiles.is_empty() {
                return Err(invalid("enemies.projectiles", format!("{} has no projectile types", enemy.name)));
            }
            check_non_negative("enemies.damage_multiplier", enemy.damage_multiplier)?;
            for &kind in &enemy.projectiles {
                self.enemy_projectile(kind)?;
            }
        }
        for spec in &self.enemy_projectiles {
            check_size("enemy_projectiles.size", spec.size)?;
            check_non_negative("enemy_projectiles.speed", spec.speed)?;
        }
        for bonus in &self.bonuses {
            check_size("bonuses.size", bonus.size)?;
        }

        for (field, span) in [
            ("enemy_spawn_ms", self.enemy_spawn_ms),
            ("bonus_spawn_ms", self.bonus_spawn_ms),
            ("debris_secs", self.debris_secs),
            ("enemy_leg_secs", self.enemy_leg_secs),
        ] {
            let finite = span.min.is_finite() && span.max.is_finite();
            if !finite || span.min < 0.0 || span.max < span.min {
                return Err(invalid(field, format!("bad range {}..{}", span.min, span.max)));
            }
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            return Err(invalid("enemy_fire_chance", "must be within 0..=1".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SimError {
    SimError::InvalidTuning { field, reason }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), SimError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be finite and non-negative")))
    }
}

fn check_size(field: &'static str, size: Vec2) -> Result<(), SimError> {
    if size.x >= 0.0 && size.y >= 0.0 && size.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("size {size} must be finite and non-negative")))
    }
}
