use super::constants::{
    DOUBLE_SCORE_MULTIPLIER, FOOD_SPAWN_CHANCE, FOOD_VALUE, MAX_FOOD, MAX_POWER_UPS, MIN_FOOD,
    POWER_UP_EFFECT_MS, POWER_UP_LIFETIME_MS, POWER_UP_SPAWN_CHANCE,
    POWER_UP_SPAWN_INTERVAL_TICKS, SLOW_MULTIPLIER, SPEED_MULTIPLIER,
};
use super::placement::random_free_cell;
use super::rng::SeededRng;
use super::types::{ActivePowerUp, Food, GameState, Point, PowerUp, PowerUpType};
use std::collections::HashSet;

pub fn has_effect(active: &[ActivePowerUp], player_id: &str, kind: PowerUpType, now: i64) -> bool {
    active
        .iter()
        .any(|effect| effect.player_id == player_id && effect.kind == kind && effect.expires_at > now)
}

pub fn score_multiplier(active: &[ActivePowerUp], player_id: &str, now: i64) -> u32 {
    if has_effect(active, player_id, PowerUpType::DoubleScore, now) {
        DOUBLE_SCORE_MULTIPLIER
    } else {
        1
    }
}

pub fn speed_modifier(active: &[ActivePowerUp], player_id: &str, now: i64) -> f64 {
    let mut modifier = 1.0;
    if has_effect(active, player_id, PowerUpType::Speed, now) {
        modifier *= SPEED_MULTIPLIER;
    }
    if has_effect(active, player_id, PowerUpType::Slow, now) {
        modifier *= SLOW_MULTIPLIER;
    }
    modifier
}

/// Applies a collected power-up. A type the player already holds has its timer refreshed.
pub fn apply_pickup(active: &mut Vec<ActivePowerUp>, player_id: &str, kind: PowerUpType, now: i64) {
    let expires_at = now + POWER_UP_EFFECT_MS;
    if let Some(effect) = active
        .iter_mut()
        .find(|effect| effect.player_id == player_id && effect.kind == kind)
    {
        effect.expires_at = expires_at;
        return;
    }
    active.push(ActivePowerUp {
        kind,
        player_id: player_id.to_string(),
        expires_at,
    });
}

pub fn drop_effects(active: &mut Vec<ActivePowerUp>, player_id: &str) {
    active.retain(|effect| effect.player_id != player_id);
}

pub fn expire_effects(active: &mut Vec<ActivePowerUp>, now: i64) {
    active.retain(|effect| effect.expires_at > now);
}

pub fn expire_grid_power_ups(power_ups: &mut Vec<PowerUp>, now: i64) {
    power_ups.retain(|power_up| power_up.expires_at > now);
}

pub fn effects_for(active: &[ActivePowerUp], player_id: &str) -> Vec<PowerUpType> {
    let mut kinds: Vec<PowerUpType> = active
        .iter()
        .filter(|effect| effect.player_id == player_id)
        .map(|effect| effect.kind)
        .collect();
    kinds.sort();
    kinds.dedup();
    kinds
}

/// Tops food up to `MIN_FOOD` unconditionally, then rolls `FOOD_SPAWN_CHANCE`
/// for one extra item while below `MAX_FOOD`.
pub fn spawn_food(state: &mut GameState, rng: &mut SeededRng, occupied: &mut HashSet<Point>) {
    let should_spawn = state.food.len() < MIN_FOOD
        || (state.food.len() < MAX_FOOD && rng.chance(FOOD_SPAWN_CHANCE));
    if !should_spawn {
        return;
    }
    let Some(position) = random_free_cell(rng, state.grid_size, occupied) else { return };
    occupied.insert(position);
    state.food.push(Food {
        position,
        value: FOOD_VALUE,
    });
}

/// Rolls for a power-up every `POWER_UP_SPAWN_INTERVAL_TICKS` ticks.
pub fn spawn_power_up(
    state: &mut GameState,
    rng: &mut SeededRng,
    occupied: &mut HashSet<Point>,
    sequence: u64,
    now: i64,
) {
    if sequence % POWER_UP_SPAWN_INTERVAL_TICKS != 0 || state.power_ups.len() >= MAX_POWER_UPS {
        return;
    }
    if !rng.chance(POWER_UP_SPAWN_CHANCE) {
        return;
    }
    let kind = PowerUpType::ALL[rng.next_index(PowerUpType::ALL.len())];
    let Some(position) = random_free_cell(rng, state.grid_size, occupied) else { return };
    occupied.insert(position);
    state.power_up_counter += 1;
    state.power_ups.push(PowerUp {
        id: state.power_up_counter,
        kind,
        position,
        expires_at: now + POWER_UP_LIFETIME_MS,
    });
    tracing::debug!(id = state.power_up_counter, ?kind, "power-up spawned");
}
