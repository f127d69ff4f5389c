//! Weapon cooldowns and the shield
//!
//! Weapons fire on a held trigger, rate-limited by the simulation clock rather
//! than by tick count, so fire rate does not depend on frame rate. Each volley
//! leaves the twin cannons at the ship's left and right edges.

use glam::Vec2;

use super::state::{GameEvent, GameState, Projectile, Weapon, WeaponKind};
use crate::consts::CANNON_INSET;

/// True when the trigger is held, the cooldown has elapsed and the shield is down
pub fn ready_to_fire(weapon: &Weapon, now_ms: f64, shield_up: bool) -> bool {
    weapon.trigger_down && !shield_up && now_ms - weapon.last_shot_ms > weapon.fire_interval_ms
}

/// Fire a volley from `kind` if it is ready; returns whether it fired
pub fn fire_if_ready(state: &mut GameState, kind: WeaponKind, now_ms: f64) -> bool {
    if !ready_to_fire(state.player.weapon(kind), now_ms, state.player.shield_up) {
        return false;
    }

    let left_id = state.next_entity_id();
    let right_id = state.next_entity_id();
    let player = &mut state.player;
    let (origin, width) = (player.pos, player.size.x);
    let weapon = player.weapon_mut(kind);
    weapon.last_shot_ms = now_ms;

    let size = weapon.projectile_size;
    let left_x = origin.x + CANNON_INSET;
    let right_x = origin.x + width - CANNON_INSET - size.x;
    for (id, x) in [(left_id, left_x), (right_id, right_x)] {
        weapon.projectiles.push(Projectile {
            id,
            pos: Vec2::new(x, origin.y),
            size,
            speed: weapon.projectile_speed,
            weapon: kind,
        });
    }

    state.emit(GameEvent::Shot { weapon: kind });
    true
}

/// Fire every weapon whose trigger is held and cooldown has elapsed
pub fn update_weapons(state: &mut GameState) {
    let now = state.clock_ms;
    for kind in WeaponKind::ALL {
        fire_if_ready(state, kind, now);
    }
}

/// A raised shield with no charge left drops
pub fn update_shield(state: &mut GameState) {
    let player = &mut state.player;
    if player.shield_up && player.shield_health <= 0.0 {
        player.shield_up = false;
        player.shield_health = 0.0;
        log::debug!("Shield depleted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn new_state() -> GameState {
        GameState::new(5, &Tuning::default(), 0)
    }

    #[test]
    fn test_gun_volley_scenario() {
        let mut state = new_state();
        let gun = state.player.weapon_mut(WeaponKind::Gun);
        gun.fire_interval_ms = 50.0;
        gun.last_shot_ms = 0.0;
        gun.trigger_down = true;

        assert!(fire_if_ready(&mut state, WeaponKind::Gun, 51.0));

        let gun = state.player.weapon(WeaponKind::Gun);
        assert_eq!(gun.last_shot_ms, 51.0);
        assert_eq!(gun.projectiles.len(), 2);

        let center = state.player.pos.x + state.player.size.x / 2.0;
        let left = gun.projectiles[0].pos.x + gun.projectiles[0].size.x / 2.0;
        let right = gun.projectiles[1].pos.x + gun.projectiles[1].size.x / 2.0;
        assert!(((center - left) - (right - center)).abs() < 1e-4);
        assert!(left < center && right > center);
        assert_eq!(gun.projectiles[0].pos.y, state.player.pos.y);
        assert!(gun.projectiles.iter().all(|p| p.weapon == WeaponKind::Gun));
        assert!(state.events.contains(&GameEvent::Shot { weapon: WeaponKind::Gun }));
    }

    #[test]
    fn test_cooldown_is_strict() {
        let mut state = new_state();
        let gun = state.player.weapon_mut(WeaponKind::Gun);
        gun.fire_interval_ms = 50.0;
        gun.trigger_down = true;

        // Exactly one interval after the last shot is not enough
        assert!(!fire_if_ready(&mut state, WeaponKind::Gun, 50.0));
        assert!(fire_if_ready(&mut state, WeaponKind::Gun, 50.5));
        assert!(!fire_if_ready(&mut state, WeaponKind::Gun, 100.0));
    }

    #[test]
    fn test_released_trigger_does_not_fire() {
        let mut state = new_state();
        assert!(!fire_if_ready(&mut state, WeaponKind::Cannon, 10_000.0));
        assert!(state.player.weapon(WeaponKind::Cannon).projectiles.is_empty());
    }

    #[test]
    fn test_shield_blocks_both_weapons() {
        let mut state = new_state();
        state.player.shield_up = true;
        for kind in WeaponKind::ALL {
            state.player.weapon_mut(kind).trigger_down = true;
        }
        state.clock_ms = 10_000.0;
        update_weapons(&mut state);
        assert_eq!(state.player.projectiles_in_flight(), 0);

        state.player.shield_up = false;
        update_weapons(&mut state);
        assert_eq!(state.player.projectiles_in_flight(), 4);
    }

    #[test]
    fn test_weapons_have_independent_cooldowns() {
        let mut state = new_state();
        for kind in WeaponKind::ALL {
            state.player.weapon_mut(kind).trigger_down = true;
        }
        // Gun: 60 ms, Cannon: 400 ms
        let mut volleys = [0usize; 2];
        for step in 1..=500 {
            let now = step as f64;
            state.clock_ms = now;
            for kind in WeaponKind::ALL {
                if fire_if_ready(&mut state, kind, now) {
                    volleys[kind.index()] += 1;
                }
            }
        }
        assert_eq!(volleys[WeaponKind::Gun.index()], 8);
        assert_eq!(volleys[WeaponKind::Cannon.index()], 1);
    }

    #[test]
    fn test_steady_trigger_matches_interval() {
        let mut state = new_state();
        let gun = state.player.weapon_mut(WeaponKind::Gun);
        gun.fire_interval_ms = 50.0;
        gun.trigger_down = true;

        let mut volleys = 0u32;
        for step in 1..=1000 {
            if fire_if_ready(&mut state, WeaponKind::Gun, step as f64) {
                volleys += 1;
            }
        }
        // floor(1000 / 50) = 20, strict comparison costs at most one
        assert!((19..=20).contains(&volleys));
    }

    #[test]
    fn test_depleted_shield_drops() {
        let mut state = new_state();
        state.player.shield_up = true;
        state.player.shield_health = 0.0;
        update_shield(&mut state);
        assert!(!state.player.shield_up);

        state.player.shield_up = true;
        state.player.shield_health = 0.3;
        update_shield(&mut state);
        assert!(state.player.shield_up);
    }

    proptest! {
        #[test]
        fn prop_cooldown_never_double_fires(
            interval in 20.0f64..500.0,
            dt in 1.0f64..40.0,
            ticks in 1usize..400,
        ) {
            let mut state = new_state();
            let gun = state.player.weapon_mut(WeaponKind::Gun);
            gun.fire_interval_ms = interval;
            gun.trigger_down = true;

            let mut shots: Vec<f64> = Vec::new();
            for step in 1..=ticks {
                let now = step as f64 * dt;
                if fire_if_ready(&mut state, WeaponKind::Gun, now) {
                    shots.push(now);
                }
            }

            for pair in shots.windows(2) {
                prop_assert!(pair[1] - pair[0] > interval);
            }

            let elapsed = ticks as f64 * dt;
            let count = shots.len() as f64;
            prop_assert!(count <= (elapsed / interval).floor());
            prop_assert!(count >= (elapsed / (interval + dt)).floor());
        }
    }
}
