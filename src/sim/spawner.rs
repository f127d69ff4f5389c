//! Spawner: enemies, bonus items, enemy fire and explosion debris
//!
//! Spawn timers are millisecond countdowns on the world state. They exist only
//! while gameplay is running: `start` arms them once when play begins and
//! `stop` disarms them when it ends, so a timer can never fire outside the
//! playing scene.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::dance::{DancePath, Easing};
use super::state::{BonusItem, Debris, Enemy, EnemyProjectile, GameState};
use crate::error::SimError;
use crate::random_between;
use crate::tuning::Tuning;

/// Arm both spawn timers
pub fn start(state: &mut GameState, tuning: &Tuning) {
    let enemy = tuning.enemy_spawn_ms.sample(&mut state.rng);
    let bonus = tuning.bonus_spawn_ms.sample(&mut state.rng);
    state.spawn.enemy_ms = Some(enemy);
    state.spawn.bonus_ms = Some(bonus);
    log::debug!("Spawner armed: enemy in {enemy:.0} ms, bonus in {bonus:.0} ms");
}

/// Disarm both spawn timers
pub fn stop(state: &mut GameState) {
    state.spawn.enemy_ms = None;
    state.spawn.bonus_ms = None;
}

/// Run spawn timers and roll enemy fire for one tick
pub fn update_spawner(state: &mut GameState, tuning: &Tuning, dt_ms: f32) {
    if countdown(&mut state.spawn.enemy_ms, dt_ms) {
        let index = pick(&mut state.rng, tuning.enemies.len());
        if let Err(err) = spawn_enemy(state, tuning, index) {
            log::error!("Enemy spawn failed: {err}");
        }
        state.spawn.enemy_ms = Some(tuning.enemy_spawn_ms.sample(&mut state.rng));
    }

    if countdown(&mut state.spawn.bonus_ms, dt_ms) {
        let index = pick(&mut state.rng, tuning.bonuses.len());
        if let Err(err) = spawn_bonus(state, tuning, index) {
            log::error!("Bonus spawn failed: {err}");
        }
        state.spawn.bonus_ms = Some(tuning.bonus_spawn_ms.sample(&mut state.rng));
    }

    enemy_fire(state, tuning);
}

/// Uniform catalog index; an empty catalog yields 0, which lookup rejects
fn pick<R: Rng>(rng: &mut R, len: usize) -> usize {
    if len == 0 { 0 } else { rng.random_range(0..len) }
}

/// Tick a timer down; true when it expired this tick
fn countdown(timer: &mut Option<f32>, dt_ms: f32) -> bool {
    match timer {
        Some(ms) => {
            *ms -= dt_ms;
            *ms <= 0.0
        }
        None => false,
    }
}

/// Materialize an enemy from the catalog above the top edge
pub fn spawn_enemy(state: &mut GameState, tuning: &Tuning, blueprint: usize) -> Result<u32, SimError> {
    let spec = tuning.enemy_blueprint(blueprint)?;
    let size = spec.size;
    let viewport = state.viewport;

    let x = random_between(&mut state.rng, 0.0, viewport.x - size.x);
    let start = Vec2::new(x, -size.y);
    let path = enemy_dance(&mut state.rng, tuning, start, size, viewport);

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        blueprint,
        pos: start,
        size,
        health: spec.health,
        damage_multiplier: spec.damage_multiplier,
        hit_ticks: 0,
        projectile_kinds: spec.projectiles.clone(),
        path,
        debris_color: spec.debris_color,
    });
    log::debug!("Spawned {} #{id} at x={x:.1}", spec.name);
    Ok(id)
}

/// Two mid-field waypoints inside the viewport, then an exit below the bottom
fn enemy_dance<R: Rng>(rng: &mut R, tuning: &Tuning, start: Vec2, size: Vec2, viewport: Vec2) -> DancePath {
    let max_x = viewport.x - size.x;
    let max_y = (viewport.y * 2.0 / 3.0 - size.y).max(0.0);
    let mut path = DancePath::new(start);

    for _ in 0..2 {
        let target = Vec2::new(random_between(rng, 0.0, max_x), random_between(rng, 0.0, max_y));
        path = path.then(target, tuning.enemy_leg_secs.sample(rng), Easing::SineInOut);
    }

    let exit = Vec2::new(random_between(rng, 0.0, max_x), viewport.y + 1.0);
    path.then(exit, tuning.enemy_leg_secs.sample(rng), Easing::QuadInOut)
}

/// Materialize a bonus item above the top edge
pub fn spawn_bonus(state: &mut GameState, tuning: &Tuning, blueprint: usize) -> Result<u32, SimError> {
    let spec = tuning.bonus_blueprint(blueprint)?;
    let x = random_between(&mut state.rng, 0.0, state.viewport.x - spec.size.x);
    let id = state.next_entity_id();
    state.bonuses.push(BonusItem {
        id,
        action: spec.action,
        pos: Vec2::new(x, -spec.size.y),
        size: spec.size,
    });
    log::debug!("Spawned bonus {} #{id}", spec.action.name());
    Ok(id)
}

/// Each enemy independently rolls to fire one shot from its muzzle
pub fn enemy_fire(state: &mut GameState, tuning: &Tuning) {
    let mut shots = Vec::new();
    for enemy in &state.enemies {
        if enemy.projectile_kinds.is_empty() || state.rng.random::<f32>() >= tuning.enemy_fire_chance {
            continue;
        }
        let kind = enemy.projectile_kinds[state.rng.random_range(0..enemy.projectile_kinds.len())];
        shots.push((enemy.id, kind, enemy.muzzle()));
    }

    for (source, kind, muzzle) in shots {
        let spec = match tuning.enemy_projectile(kind) {
            Ok(spec) => spec,
            Err(err) => {
                log::error!("Enemy {source} cannot fire: {err}");
                continue;
            }
        };
        let id = state.next_entity_id();
        state.enemy_projectiles.push(EnemyProjectile {
            id,
            kind,
            pos: Vec2::new(muzzle.x - spec.size.x / 2.0, muzzle.y),
            size: spec.size,
            speed: spec.speed,
            source,
        });
    }
}

/// Scatter debris fragments from an explosion
pub fn spawn_debris_burst(state: &mut GameState, tuning: &Tuning, center: Vec2, width: f32, color: u32) -> usize {
    let count = (width * tuning.debris_per_width).ceil().max(1.0) as usize;
    for _ in 0..count {
        let rng = &mut state.rng;
        let jitter = Vec2::new(
            random_between(rng, -width / 2.0, width / 2.0),
            random_between(rng, -width / 4.0, width / 4.0),
        );
        let size = random_between(rng, 1.0, 3.0);
        let start = center + jitter;
        let angle = random_between(rng, 0.0, TAU);
        let reach = random_between(rng, tuning.debris_scatter * 0.25, tuning.debris_scatter);
        let target = start + Vec2::from_angle(angle) * reach;
        let secs = tuning.debris_secs.sample(rng);

        let id = state.next_entity_id();
        state.debris.push(Debris {
            id,
            pos: start,
            size,
            color,
            path: DancePath::new(start).then(target, secs, Easing::SineInOut),
        });
    }
    count
}
