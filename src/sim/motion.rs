//! Motion system
//!
//! Two motion models share the world: linear integration (player, projectiles,
//! bonus items, stars) and scripted dance paths (enemies, debris). Entities
//! that leave the playfield or finish their dance are compacted out of their
//! owning collections here.

use super::aabb::clamp_inside;
use super::dance::PathStatus;
use super::state::{GameState, Star};
use crate::random_between;
use crate::tuning::Tuning;

/// Advance every gameplay entity by one tick
pub fn advance_gameplay(state: &mut GameState, tuning: &Tuning, dt: f32) {
    step_player(state);
    step_projectiles(state);
    step_enemy_projectiles(state);
    step_bonuses(state, tuning);
    step_scripted(state, dt);
    tick_countdowns(state);
}

/// Integrate player velocity, then clamp the ship inside the viewport
pub fn step_player(state: &mut GameState) {
    let player = &mut state.player;
    player.pos = clamp_inside(player.pos + player.vel, player.size, state.viewport);
}

/// Move player projectiles upward; drop those past the top edge
pub fn step_projectiles(state: &mut GameState) {
    for weapon in &mut state.player.weapons {
        for projectile in &mut weapon.projectiles {
            projectile.pos.y -= projectile.speed;
        }
        weapon.projectiles.retain(|p| p.pos.y >= 0.0);
    }
}

/// Move enemy projectiles downward; drop those past the bottom edge
pub fn step_enemy_projectiles(state: &mut GameState) {
    let floor = state.viewport.y;
    for projectile in &mut state.enemy_projectiles {
        projectile.pos.y += projectile.speed;
    }
    state.enemy_projectiles.retain(|p| p.pos.y <= floor);
}

/// Bonus items fall at a fraction of the scroll speed
pub fn step_bonuses(state: &mut GameState, tuning: &Tuning) {
    let fall = tuning.scroll_speed * state.game_speed * tuning.bonus_fall_factor;
    let floor = state.viewport.y;
    for bonus in &mut state.bonuses {
        bonus.pos.y += fall;
    }
    state.bonuses.retain(|b| b.pos.y <= floor);
}

/// Scroll the star field, wrapping stars that fall off the bottom
pub fn step_stars(state: &mut GameState, tuning: &Tuning) {
    let GameState {
        stars,
        rng,
        viewport,
        game_speed,
        ..
    } = state;
    let rate = tuning.scroll_speed * *game_speed;

    for star in stars.iter_mut() {
        star.pos.y += rate * star.weight;
        if star.pos.y > viewport.y {
            let y = -random_between(rng, 1.0, viewport.y * 0.25);
            *star = Star::random(rng, *viewport, y);
        }
    }
}

/// Advance dance paths; remove enemies and debris whose path is exhausted
pub fn step_scripted(state: &mut GameState, dt: f32) {
    state.enemies.retain_mut(|enemy| match enemy.path.advance(dt) {
        PathStatus::Moving(pos) => {
            enemy.pos = pos;
            true
        }
        PathStatus::Exhausted(pos) => {
            enemy.pos = pos;
            log::debug!("Enemy {} left the field", enemy.id);
            false
        }
    });

    state.debris.retain_mut(|debris| match debris.path.advance(dt) {
        PathStatus::Moving(pos) => {
            debris.pos = pos;
            true
        }
        PathStatus::Exhausted(_) => false,
    });
}

/// Count down the transient hit and hurt flashes
pub fn tick_countdowns(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.hit_ticks = enemy.hit_ticks.saturating_sub(1);
    }
    state.player.hurt_ticks = state.player.hurt_ticks.saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dance::{DancePath, Easing};
    use crate::sim::state::{BonusAction, BonusItem, Debris, Enemy, EnemyProjectile, EnemyProjectileKind, Projectile, WeaponKind};
    use glam::Vec2;

    fn new_state() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(42, &tuning, 0), tuning)
    }

    fn enemy_with_path(state: &mut GameState, path: DancePath) -> Enemy {
        Enemy {
            id: state.next_entity_id(),
            blueprint: 0,
            pos: Vec2::ZERO,
            size: Vec2::new(16.0, 12.0),
            health: 1.0,
            damage_multiplier: 1.0,
            hit_ticks: 0,
            projectile_kinds: vec![EnemyProjectileKind::Pellet],
            path,
            debris_color: 0,
        }
    }

    #[test]
    fn test_player_velocity_integrates() {
        let (mut state, _) = new_state();
        let start = state.player.pos;
        state.player.vel = Vec2::new(2.0, -2.0);
        step_player(&mut state);
        assert_eq!(state.player.pos, start + Vec2::new(2.0, -2.0));
    }

    #[test]
    fn test_player_clamped_not_wrapped() {
        let (mut state, _) = new_state();
        state.player.pos = Vec2::new(1.0, 1.0);
        state.player.vel = Vec2::new(-5.0, -5.0);
        step_player(&mut state);
        assert_eq!(state.player.pos, Vec2::ZERO);

        state.player.pos = state.viewport - state.player.size;
        state.player.vel = Vec2::new(5.0, 5.0);
        step_player(&mut state);
        assert_eq!(state.player.pos, state.viewport - state.player.size);
    }

    #[test]
    fn test_projectiles_fly_up_and_expire() {
        let (mut state, _) = new_state();
        let id = state.next_entity_id();
        state.player.weapon_mut(WeaponKind::Gun).projectiles.push(Projectile {
            id,
            pos: Vec2::new(50.0, 4.0),
            size: Vec2::new(1.0, 3.0),
            speed: 3.0,
            weapon: WeaponKind::Gun,
        });

        step_projectiles(&mut state);
        assert_eq!(state.player.weapon(WeaponKind::Gun).projectiles[0].pos.y, 1.0);

        step_projectiles(&mut state);
        assert!(state.player.weapon(WeaponKind::Gun).projectiles.is_empty());
    }

    #[test]
    fn test_enemy_projectiles_fall_and_expire() {
        let (mut state, _) = new_state();
        let id = state.next_entity_id();
        let y = state.viewport.y - 1.0;
        state.enemy_projectiles.push(EnemyProjectile {
            id,
            kind: EnemyProjectileKind::Pellet,
            pos: Vec2::new(10.0, y),
            size: Vec2::new(2.0, 2.0),
            speed: 2.0,
            source: 0,
        });
        step_enemy_projectiles(&mut state);
        assert!(state.enemy_projectiles.is_empty());
    }

    #[test]
    fn test_bonus_falls_at_half_scroll_speed() {
        let (mut state, tuning) = new_state();
        let id = state.next_entity_id();
        state.bonuses.push(BonusItem {
            id,
            action: BonusAction::AddHealth,
            pos: Vec2::new(10.0, 0.0),
            size: Vec2::new(10.0, 10.0),
        });
        step_bonuses(&mut state, &tuning);
        assert_eq!(state.bonuses[0].pos.y, 0.5);

        state.bonuses[0].pos.y = state.viewport.y;
        step_bonuses(&mut state, &tuning);
        assert!(state.bonuses.is_empty());
    }

    #[test]
    fn test_stars_wrap_above_top() {
        let (mut state, tuning) = new_state();
        state.stars.truncate(1);
        state.stars[0].pos.y = state.viewport.y + 0.5;
        step_stars(&mut state, &tuning);
        assert!(state.stars[0].pos.y < 0.0);
        assert!(state.stars[0].pos.x >= 0.0 && state.stars[0].pos.x <= state.viewport.x);
    }

    #[test]
    fn test_big_stars_scroll_faster() {
        let (mut state, tuning) = new_state();
        state.stars = vec![
            Star { pos: Vec2::new(0.0, 10.0), size: 0.5, weight: 0.25 },
            Star { pos: Vec2::new(0.0, 10.0), size: 2.0, weight: 1.0 },
        ];
        step_stars(&mut state, &tuning);
        assert!(state.stars[1].pos.y > state.stars[0].pos.y);
    }

    #[test]
    fn test_enemy_removed_when_dance_ends() {
        let (mut state, _) = new_state();
        let path = DancePath::new(Vec2::ZERO).then(Vec2::new(0.0, 100.0), 0.1, Easing::Linear);
        let enemy = enemy_with_path(&mut state, path);
        state.enemies.push(enemy);

        step_scripted(&mut state, 0.05);
        assert_eq!(state.enemies.len(), 1);
        assert!((state.enemies[0].pos.y - 50.0).abs() < 1e-3);

        step_scripted(&mut state, 0.06);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_debris_self_removes() {
        let (mut state, _) = new_state();
        let id = state.next_entity_id();
        state.debris.push(Debris {
            id,
            pos: Vec2::ZERO,
            size: 2.0,
            color: 0,
            path: DancePath::new(Vec2::ZERO).then(Vec2::new(5.0, 5.0), 0.2, Easing::SineInOut),
        });
        step_scripted(&mut state, 0.1);
        assert_eq!(state.debris.len(), 1);
        step_scripted(&mut state, 0.2);
        assert!(state.debris.is_empty());
    }

    #[test]
    fn test_flash_countdowns() {
        let (mut state, _) = new_state();
        let path = DancePath::new(Vec2::ZERO).then(Vec2::new(0.0, 1.0), 10.0, Easing::Linear);
        let mut enemy = enemy_with_path(&mut state, path);
        enemy.hit_ticks = 1;
        state.enemies.push(enemy);
        state.player.hurt_ticks = 2;

        tick_countdowns(&mut state);
        assert!(!state.enemies[0].hit());
        assert!(state.player.hurting());
        tick_countdowns(&mut state);
        assert!(!state.player.hurting());
    }
}
