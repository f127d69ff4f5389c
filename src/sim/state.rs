//! World state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here. The simulation is
//! the only writer; hosts get a shared borrow between ticks.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Body;
use super::dance::DancePath;
use crate::consts::*;
use crate::error::SimError;
use crate::random_between;
use crate::tuning::{Tuning, WeaponSpec};

/// Top-level mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    /// Title screen, waiting for any input
    Splash,
    /// Active gameplay
    Playing,
    /// Run ended; counting down to a reload
    GameOver,
}

/// The player's weapons. Discriminants index `Player::weapons`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Gun = 0,
    Cannon = 1,
}

impl WeaponKind {
    /// Every weapon, in loadout order
    pub const ALL: [WeaponKind; 2] = [WeaponKind::Gun, WeaponKind::Cannon];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Gun => "Gun",
            WeaponKind::Cannon => "Cannon",
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeaponKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeaponKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::UnknownWeapon(s.to_string()))
    }
}

/// Effect applied when the player collects a bonus item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusAction {
    AddHealth,
    RepairShield,
}

impl BonusAction {
    pub fn name(self) -> &'static str {
        match self {
            BonusAction::AddHealth => "add-health",
            BonusAction::RepairShield => "repair-shield",
        }
    }
}

impl FromStr for BonusAction {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add-health" | "health" => Ok(BonusAction::AddHealth),
            "repair-shield" | "shield" => Ok(BonusAction::RepairShield),
            _ => Err(SimError::UnknownBonusAction(s.to_string())),
        }
    }
}

/// Enemy projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyProjectileKind {
    /// Small, slow round
    Pellet,
    /// Thin, fast streak
    Bolt,
}

/// A player-fired projectile
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Weapon that fired it (damage is looked up on hit)
    pub weapon: WeaponKind,
}

/// One of the player's weapons and the projectiles it has in flight
#[derive(Debug, Clone, Serialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub projectile_speed: f32,
    pub fire_interval_ms: f64,
    pub last_shot_ms: f64,
    pub projectile_size: Vec2,
    pub damage: f32,
    pub trigger_down: bool,
    pub projectiles: Vec<Projectile>,
}

impl Weapon {
    pub fn from_spec(spec: &WeaponSpec) -> Self {
        Self {
            kind: spec.kind,
            projectile_speed: spec.speed,
            fire_interval_ms: spec.fire_interval_ms,
            last_shot_ms: 0.0,
            projectile_size: spec.projectile_size,
            damage: spec.damage,
            trigger_down: false,
            projectiles: Vec::new(),
        }
    }
}

/// The player's ship and status
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Pixels per tick while a direction is held
    pub speed: f32,
    pub health: f32,
    pub shield_up: bool,
    pub shield_health: f32,
    /// Ticks left on the hurt flash
    pub hurt_ticks: u32,
    pub lives: u32,
    pub points: u64,
    pub high_score: u64,
    /// Ordered by `WeaponKind` discriminant
    pub weapons: Vec<Weapon>,
}

impl Player {
    /// Fresh player centered in the viewport
    pub fn new(tuning: &Tuning, high_score: u64) -> Self {
        let size = tuning.player.size;
        Self {
            pos: (tuning.viewport - size) * 0.5,
            size,
            vel: Vec2::ZERO,
            speed: tuning.player.speed,
            health: HEALTH_MAX,
            shield_up: false,
            shield_health: SHIELD_MAX,
            hurt_ticks: 0,
            lives: tuning.player.lives,
            points: 0,
            high_score,
            weapons: tuning.weapons.iter().map(Weapon::from_spec).collect(),
        }
    }

    pub fn hurting(&self) -> bool {
        self.hurt_ticks > 0
    }

    #[inline]
    pub fn weapon(&self, kind: WeaponKind) -> &Weapon {
        &self.weapons[kind.index()]
    }

    #[inline]
    pub fn weapon_mut(&mut self, kind: WeaponKind) -> &mut Weapon {
        &mut self.weapons[kind.index()]
    }

    /// Look a weapon up by its configured name
    pub fn weapon_by_name(&self, name: &str) -> Result<&Weapon, SimError> {
        let kind: WeaponKind = name.parse()?;
        self.weapons
            .get(kind.index())
            .ok_or_else(|| SimError::UnknownWeapon(name.to_string()))
    }

    /// Add points and lift the high score along with them
    pub fn award(&mut self, points: u64) {
        self.points += points;
        if self.points > self.high_score {
            self.high_score = self.points;
        }
    }

    /// Total projectiles in flight across all weapons
    pub fn projectiles_in_flight(&self) -> usize {
        self.weapons.iter().map(|w| w.projectiles.len()).sum()
    }
}

/// A hostile ship following a dance path
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    /// Index into the tuning's enemy catalog
    pub blueprint: usize,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub damage_multiplier: f32,
    /// Ticks left on the hit flash
    pub hit_ticks: u32,
    pub projectile_kinds: Vec<EnemyProjectileKind>,
    pub path: DancePath,
    pub debris_color: u32,
}

impl Enemy {
    pub fn hit(&self) -> bool {
        self.hit_ticks > 0
    }

    /// Bottom-center point, where shots leave the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x * 0.5, self.pos.y + self.size.y)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyProjectile {
    pub id: u32,
    pub kind: EnemyProjectileKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Enemy that fired it
    pub source: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BonusItem {
    pub id: u32,
    pub action: BonusAction,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Cosmetic explosion fragment
#[derive(Debug, Clone, Serialize)]
pub struct Debris {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub color: u32,
    pub path: DancePath,
}

/// Background parallax star
#[derive(Debug, Clone, Serialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    /// Scroll rate multiplier; bigger stars are nearer and faster
    pub weight: f32,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R, viewport: Vec2, y: f32) -> Self {
        let size = random_between(rng, 0.5, 2.5);
        Self {
            pos: Vec2::new(random_between(rng, 0.0, viewport.x), y),
            size,
            weight: size * 0.5,
        }
    }
}

macro_rules! impl_body {
    ($($ty:ty),*) => {
        $(impl Body for $ty {
            fn pos(&self) -> Vec2 {
                self.pos
            }
            fn size(&self) -> Vec2 {
                self.size
            }
        })*
    };
}

impl_body!(Player, Projectile, Enemy, EnemyProjectile, BonusItem);

impl Body for Debris {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        Vec2::splat(self.size)
    }
}

/// Notable things that happened during a tick, drained by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// Splash ended; gameplay started
    GameStarted,
    /// A weapon fired a volley
    Shot { weapon: WeaponKind },
    /// An enemy was hit but survived
    EnemyHit { enemy: u32 },
    /// An enemy was destroyed
    EnemyDestroyed { enemy: u32, pos: Vec2 },
    /// The shield soaked an enemy shot
    ShieldBlocked,
    /// The player took hull damage
    PlayerHit,
    /// Health ran out and a life was spent
    LifeLost { lives_left: u32 },
    /// A bonus item was picked up
    BonusCollected { action: BonusAction },
    /// Lives reached zero
    GameOver { points: u64 },
    /// Game-over countdown finished; the session should reload
    SessionEnded,
}

/// Millisecond countdowns for the spawner; `None` while not scheduled
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpawnTimers {
    pub enemy_ms: Option<f32>,
    pub bonus_ms: Option<f32>,
}

impl SpawnTimers {
    pub fn active(&self) -> bool {
        self.enemy_ms.is_some() || self.bonus_ms.is_some()
    }
}

/// Complete world state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub scene: Scene,
    /// Global pause toggle; when false nothing advances
    pub running: bool,
    /// Global scroll multiplier
    pub game_speed: f32,
    pub viewport: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock in milliseconds (drives weapon cooldowns)
    pub clock_ms: f64,
    /// Ticks left before a game-over reload
    pub game_over_ticks: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub bonuses: Vec<BonusItem>,
    pub debris: Vec<Debris>,
    pub stars: Vec<Star>,
    pub spawn: SpawnTimers,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session in the splash scene
    pub fn new(seed: u64, tuning: &Tuning, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let viewport = tuning.viewport;
        let stars = (0..tuning.star_count)
            .map(|_| {
                let y = random_between(&mut rng, 0.0, viewport.y);
                Star::random(&mut rng, viewport, y)
            })
            .collect();

        Self {
            seed,
            rng,
            scene: Scene::Splash,
            running: true,
            game_speed: tuning.game_speed,
            viewport,
            time_ticks: 0,
            clock_ms: 0.0,
            game_over_ticks: 0,
            player: Player::new(tuning, high_score),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            bonuses: Vec::new(),
            debris: Vec::new(),
            stars,
            spawn: SpawnTimers::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live entity count, excluding the player and stars
    pub fn entity_count(&self) -> usize {
        self.player.projectiles_in_flight()
            + self.enemies.len()
            + self.enemy_projectiles.len()
            + self.bonuses.len()
            + self.debris.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning, 120);
        assert_eq!(state.scene, Scene::Splash);
        assert!(state.running);
        assert_eq!(state.player.lives, tuning.player.lives);
        assert_eq!(state.player.high_score, 120);
        assert_eq!(state.player.points, 0);
        assert_eq!(state.stars.len(), tuning.star_count);
        assert_eq!(state.entity_count(), 0);
        assert!(!state.spawn.active());
    }

    #[test]
    fn test_player_starts_centered() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning, 0);
        let center = state.player.bounds().center();
        assert!((center - tuning.viewport * 0.5).length() < 1e-3);
    }

    #[test]
    fn test_weapons_indexed_by_kind() {
        let state = GameState::new(1, &Tuning::default(), 0);
        for kind in WeaponKind::ALL {
            assert_eq!(state.player.weapon(kind).kind, kind);
        }
    }

    #[test]
    fn test_weapon_by_name() {
        let state = GameState::new(1, &Tuning::default(), 0);
        let cannon = state.player.weapon_by_name("cannon").unwrap();
        assert_eq!(cannon.kind, WeaponKind::Cannon);
        assert!(matches!(
            state.player.weapon_by_name("Railgun"),
            Err(SimError::UnknownWeapon(name)) if name == "Railgun"
        ));
    }

    #[test]
    fn test_bonus_action_parse() {
        assert_eq!("add-health".parse::<BonusAction>().unwrap(), BonusAction::AddHealth);
        assert_eq!("Shield".parse::<BonusAction>().unwrap(), BonusAction::RepairShield);
        assert!(matches!(
            "extra-life".parse::<BonusAction>(),
            Err(SimError::UnknownBonusAction(_))
        ));
    }

    #[test]
    fn test_award_raises_high_score() {
        let mut player = Player::new(&Tuning::default(), 15);
        player.award(10);
        assert_eq!(player.high_score, 15);
        player.award(10);
        assert_eq!(player.points, 20);
        assert_eq!(player.high_score, 20);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(3, &Tuning::default(), 0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(3, &Tuning::default(), 0);
        state.emit(GameEvent::GameStarted);
        assert_eq!(state.drain_events(), vec![GameEvent::GameStarted]);
        assert!(state.drain_events().is_empty());
    }
}
