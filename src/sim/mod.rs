//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids never reused)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod combat;
pub mod dance;
pub mod motion;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapons;

pub use aabb::{Aabb, Body};
pub use dance::{DancePath, Easing, PathStatus, Waypoint};
pub use session::{Simulation, next_seed};
pub use state::{
    BonusAction, BonusItem, Debris, Enemy, EnemyProjectile, EnemyProjectileKind, GameEvent,
    GameState, Player, Projectile, Scene, Star, Weapon, WeaponKind,
};
pub use tick::{Axis, Command, Direction, TickInput, tick};
