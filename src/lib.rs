//! Scroll Shooter - simulation core of a vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, weapons, combat, scenes)
//! - `platform`: Raw input translation into simulation commands
//! - `persistence`: High score storage collaborators
//! - `audio`: Sound effect sink collaborators
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::{Difficulty, Tuning};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second at the fixed timestep
    pub const TICK_HZ: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 240.0;
    pub const VIEWPORT_HEIGHT: f32 = 320.0;

    /// Player health bounds. Health may dip below zero to signal a lost life.
    pub const HEALTH_MAX: f32 = 1.0;
    pub const HEALTH_MIN: f32 = -0.1;
    pub const SHIELD_MAX: f32 = 1.0;

    /// Horizontal inset of each twin cannon from the ship's edges
    pub const CANNON_INSET: f32 = 3.0;
}

/// Uniform sample in `[lo, hi]`, collapsing to `lo` for empty or inverted ranges
#[inline]
pub fn random_between<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo { lo } else { rng.random_range(lo..=hi) }
}
