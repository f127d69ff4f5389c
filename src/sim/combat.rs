//! Collision detection and combat resolution
//!
//! Runs once per playing tick, after motion and firing, so every test sees
//! this tick's positions. Player shots are resolved in two phases: all
//! overlapping (weapon, projectile, enemy) triples are collected first, then
//! their effects are applied in collection order. A projectile that overlaps
//! several enemies in the same tick therefore damages each of them, and the
//! outcome does not depend on removal order.

use std::collections::HashSet;

use glam::Vec2;

use super::aabb::Body;
use super::spawner::spawn_debris_burst;
use super::state::{BonusAction, GameEvent, GameState, Player, WeaponKind};
use super::tick::end_game;
use crate::consts::*;
use crate::tuning::Tuning;

/// A player projectile overlapping an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub weapon: WeaponKind,
    pub projectile: u32,
    /// Index into `GameState::enemies`, valid until the next compaction
    pub enemy: usize,
}

/// Resolve every collision for this tick
pub fn resolve(state: &mut GameState, tuning: &Tuning) {
    let hits = collect_hits(state);
    apply_hits(state, tuning, &hits);
    resolve_enemy_fire(state, tuning);
    resolve_depletion(state, tuning);
    resolve_pickups(state);
}

/// Every overlapping triple, in weapon, projectile, enemy order
pub fn collect_hits(state: &GameState) -> Vec<Hit> {
    let mut hits = Vec::new();
    for weapon in &state.player.weapons {
        for projectile in &weapon.projectiles {
            for (index, enemy) in state.enemies.iter().enumerate() {
                if projectile.overlaps(enemy) {
                    hits.push(Hit {
                        weapon: weapon.kind,
                        projectile: projectile.id,
                        enemy: index,
                    });
                }
            }
        }
    }
    hits
}

/// Apply damage and scoring for collected hits, then remove spent
/// projectiles and destroyed enemies
pub fn apply_hits(state: &mut GameState, tuning: &Tuning, hits: &[Hit]) {
    if hits.is_empty() {
        return;
    }

    let mut spent = HashSet::with_capacity(hits.len());
    for hit in hits {
        let damage = state.player.weapon(hit.weapon).damage;
        let enemy = &mut state.enemies[hit.enemy];
        enemy.health -= damage * enemy.damage_multiplier;
        enemy.hit_ticks = tuning.hit_flash_ticks;
        let enemy_id = enemy.id;

        state.player.award(tuning.points_per_hit);
        state.emit(GameEvent::EnemyHit { enemy: enemy_id });
        spent.insert(hit.projectile);
    }

    for weapon in &mut state.player.weapons {
        weapon.projectiles.retain(|p| !spent.contains(&p.id));
    }

    // Health must cross below zero; exactly zero survives
    let mut destroyed: Vec<(u32, Vec2, f32, u32)> = Vec::new();
    state.enemies.retain(|enemy| {
        if enemy.health < 0.0 {
            destroyed.push((enemy.id, enemy.bounds().center(), enemy.size.x, enemy.debris_color));
            false
        } else {
            true
        }
    });

    for (id, center, width, color) in destroyed {
        let fragments = spawn_debris_burst(state, tuning, center, width, color);
        log::debug!("Enemy {id} destroyed ({fragments} debris)");
        state.emit(GameEvent::EnemyDestroyed { enemy: id, pos: center });
    }
}

/// Enemy shots that reach the player are consumed and deal damage
pub fn resolve_enemy_fire(state: &mut GameState, tuning: &Tuning) {
    let player_box = state.player.bounds();
    let before = state.enemy_projectiles.len();
    state
        .enemy_projectiles
        .retain(|p| !p.bounds().overlaps(&player_box));

    for _ in state.enemy_projectiles.len()..before {
        damage_player(state, tuning);
    }
}

/// One enemy hit: the shield soaks it if raised and charged, else the hull does
pub fn damage_player(state: &mut GameState, tuning: &Tuning) {
    let player = &mut state.player;
    if player.shield_up && player.shield_health > 0.0 {
        player.shield_health = (player.shield_health - tuning.player.shield_hit_cost).max(0.0);
        state.emit(GameEvent::ShieldBlocked);
    } else {
        player.health = (player.health - tuning.player.damage_per_hit).max(HEALTH_MIN);
        player.hurt_ticks = tuning.player.hurt_ticks;
        state.emit(GameEvent::PlayerHit);
    }
}

/// Spend a life when health has crossed below zero; end the game on the last one
///
/// Health is restored before the life is taken, so a life is never lost with
/// health still negative. Returns true when a life was spent.
pub fn resolve_depletion(state: &mut GameState, tuning: &Tuning) -> bool {
    if state.player.health >= 0.0 {
        return false;
    }

    state.player.health = HEALTH_MAX;
    state.player.lives = state.player.lives.saturating_sub(1);
    let lives_left = state.player.lives;
    log::info!("Life lost, {lives_left} remaining");
    state.emit(GameEvent::LifeLost { lives_left });

    if lives_left == 0 {
        end_game(state, tuning);
    }
    true
}

/// Collect overlapping bonus items
pub fn resolve_pickups(state: &mut GameState) {
    let player_box = state.player.bounds();
    let mut collected = Vec::new();
    state.bonuses.retain(|bonus| {
        if bonus.bounds().overlaps(&player_box) {
            collected.push(bonus.action);
            false
        } else {
            true
        }
    });

    for action in collected {
        apply_bonus(&mut state.player, action);
        state.emit(GameEvent::BonusCollected { action });
    }
}

/// Apply a bonus action to the player
pub fn apply_bonus(player: &mut Player, action: BonusAction) {
    match action {
        BonusAction::AddHealth => {
            if player.health < HEALTH_MAX {
                player.health = HEALTH_MAX;
            }
        }
        BonusAction::RepairShield => {
            if player.shield_health < SHIELD_MAX {
                player.shield_health = SHIELD_MAX;
            }
        }
    }
}
