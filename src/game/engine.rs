use super::constants::{GROWTH_PER_FOOD, INITIAL_SNAKE_LENGTH, MAX_STEPS_PER_TICK};
use super::physics::{advance_snake, candidate_head, is_out_of_bounds, resolve_heading, BodyOccupancy};
use super::placement::{occupied_cells, spawn_snake_body};
use super::powerups::{
  apply_pickup, drop_effects, effects_for, expire_effects, expire_grid_power_ups, has_effect,
  score_multiplier, spawn_food, spawn_power_up, speed_modifier,
};
use super::rng::SeededRng;
use super::types::{Direction, GameState, Point, PowerUpType, Snake};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Advances the world by one tick. The input state is left untouched; identical
/// arguments always produce an identical result.
pub fn update_game(
  state: &GameState,
  inputs: &BTreeMap<String, Direction>,
  now: i64,
  eligible_ids: &BTreeSet<String>,
) -> GameState {
  let mut next = state.clone();
  let mut rng = SeededRng::new(state.rng_seed);
  let sequence = state.sequence + 1;

  next
    .snakes
    .retain(|snake| snake.alive && eligible_ids.contains(&snake.id));
  next
    .active_power_ups
    .retain(|effect| eligible_ids.contains(&effect.player_id));
  expire_grid_power_ups(&mut next.power_ups, now);
  spawn_missing_snakes(&mut next, &mut rng, eligible_ids);

  for snake in &mut next.snakes {
    let requested = inputs.get(&snake.id).copied();
    snake.direction = resolve_heading(snake.direction, requested);
  }

  let steps = plan_steps(&mut next, now);
  for step in 0..MAX_STEPS_PER_TICK {
    let movers: Vec<usize> = steps
      .iter()
      .enumerate()
      .filter(|(index, count)| **count > step && next.snakes[*index].alive)
      .map(|(index, _)| index)
      .collect();
    if movers.is_empty() {
      break;
    }
    run_step(&mut next, &movers, now);
  }

  expire_effects(&mut next.active_power_ups, now);

  let mut occupied = occupied_cells(&next);
  spawn_food(&mut next, &mut rng, &mut occupied);
  spawn_power_up(&mut next, &mut rng, &mut occupied, sequence, now);

  refresh_snakes(&mut next);
  next.player_count = next
    .player_stats
    .values()
    .filter(|stats| stats.is_connected)
    .count();
  next.rng_seed = rng.seed();
  next.sequence = sequence;
  next.timestamp = now;
  next
}

fn spawn_missing_snakes(state: &mut GameState, rng: &mut SeededRng, eligible_ids: &BTreeSet<String>) {
  let mut occupied = occupied_cells(state);
  let mut spawned = false;
  for id in eligible_ids {
    if state.snakes.iter().any(|snake| &snake.id == id) {
      continue;
    }
    let Some(color) = state.player_stats.get(id).map(|stats| stats.color.clone()) else { continue };
    let Some((body, direction)) =
      spawn_snake_body(rng, state.grid_size, &occupied, INITIAL_SNAKE_LENGTH)
    else {
      tracing::debug!(player_id = %id, "no free space to spawn snake");
      continue;
    };
    occupied.extend(body.iter().copied());
    state.snakes.push(Snake::new(id.clone(), color, body, direction));
    spawned = true;
    tracing::debug!(player_id = %id, "snake spawned");
  }
  if spawned {
    state.snakes.sort_by(|a, b| a.id.cmp(&b.id));
  }
}

/// Accumulates each snake's speed modifier into its move budget and returns
/// how many single-cell steps it takes this tick.
fn plan_steps(state: &mut GameState, now: i64) -> Vec<u32> {
  let active = &state.active_power_ups;
  state
    .snakes
    .iter_mut()
    .map(|snake| {
      snake.speed = speed_modifier(active, &snake.id, now);
      snake.move_budget += snake.speed;
      let steps = (snake.move_budget.floor().max(0.0) as u32).min(MAX_STEPS_PER_TICK);
      snake.move_budget -= steps as f64;
      steps
    })
    .collect()
}

/// One simultaneous movement step for the given snakes. Every candidate head is
/// judged against the bodies as they were before the step; a tail counts as
/// free only when its owner actually moves this step without growing.
fn run_step(state: &mut GameState, movers: &[usize], now: i64) {
  let planned: Vec<(usize, Point)> = movers
    .iter()
    .filter_map(|index| candidate_head(&state.snakes[*index]).map(|head| (*index, head)))
    .collect();

  let mut head_counts: HashMap<Point, u32> = HashMap::new();
  let mut growing: HashSet<usize> = HashSet::new();
  for (index, head) in &planned {
    *head_counts.entry(*head).or_insert(0) += 1;
    let eats = state.food.iter().any(|food| food.position == *head);
    if state.snakes[*index].pending_growth > 0 || eats {
      growing.insert(*index);
    }
  }

  // A blocked snake keeps its tail, which can block the snake following it.
  // Repeat until no further snake is blocked.
  let mut blocked: BTreeSet<usize> = BTreeSet::new();
  loop {
    let mut bodies = BodyOccupancy::from_snakes(state.snakes.iter());
    for (index, _) in &planned {
      if blocked.contains(index) || growing.contains(index) {
        continue;
      }
      if let Some(tail) = state.snakes[*index].tail() {
        bodies.release(tail);
      }
    }

    let mut newly_blocked = Vec::new();
    for (index, head) in &planned {
      if !blocked.contains(index) && !step_is_clear(state, &bodies, &head_counts, *index, *head, now) {
        newly_blocked.push(*index);
      }
    }
    if newly_blocked.is_empty() {
      break;
    }
    blocked.extend(newly_blocked);
  }

  let mut deaths: Vec<usize> = Vec::new();
  let mut moves: Vec<(usize, Point)> = Vec::new();
  for (index, head) in planned {
    if !blocked.contains(&index) {
      moves.push((index, head));
    } else if !has_effect(
      &state.active_power_ups,
      &state.snakes[index].id,
      PowerUpType::Invincibility,
      now,
    ) {
      deaths.push(index);
    }
  }

  for index in deaths {
    kill_snake(state, index);
  }

  for (index, head) in moves {
    let player_id = state.snakes[index].id.clone();

    if let Some(food_index) = state.food.iter().position(|food| food.position == head) {
      let food = state.food.remove(food_index);
      let points =
        food.value as u64 * score_multiplier(&state.active_power_ups, &player_id, now) as u64;
      let snake = &mut state.snakes[index];
      snake.score += points;
      snake.pending_growth += GROWTH_PER_FOOD;
      if let Some(stats) = state.player_stats.get_mut(&player_id) {
        stats.score += points;
      }
    }

    if let Some(power_up_index) = state
      .power_ups
      .iter()
      .position(|power_up| power_up.position == head)
    {
      let power_up = state.power_ups.remove(power_up_index);
      apply_pickup(&mut state.active_power_ups, &player_id, power_up.kind, now);
      tracing::debug!(player_id = %player_id, kind = ?power_up.kind, "power-up collected");
    }

    advance_snake(&mut state.snakes[index], head);
  }
}

/// Invincible snakes pass through bodies and head-on meetings but cannot
/// leave the grid; they hold position instead.
fn step_is_clear(
  state: &GameState,
  bodies: &BodyOccupancy,
  head_counts: &HashMap<Point, u32>,
  index: usize,
  head: Point,
  now: i64,
) -> bool {
  if is_out_of_bounds(state.grid_size, head) {
    return false;
  }
  let lethal = bodies.is_occupied(head) || head_counts.get(&head).copied().unwrap_or(0) > 1;
  !lethal
    || has_effect(
      &state.active_power_ups,
      &state.snakes[index].id,
      PowerUpType::Invincibility,
      now,
    )
}

fn kill_snake(state: &mut GameState, index: usize) {
  let snake = &mut state.snakes[index];
  if !snake.alive {
    return;
  }
  snake.alive = false;
  snake.pending_growth = 0;
  let player_id = snake.id.clone();
  if let Some(stats) = state.player_stats.get_mut(&player_id) {
    stats.deaths += 1;
  }
  drop_effects(&mut state.active_power_ups, &player_id);
  tracing::debug!(player_id = %player_id, "snake died");
}

fn refresh_snakes(state: &mut GameState) {
  for snake in &mut state.snakes {
    snake.active_power_ups = effects_for(&state.active_power_ups, &snake.id);
    if let Some(stats) = state.player_stats.get(&snake.id) {
      if snake.color != stats.color {
        snake.color = stats.color.clone();
      }
    }
  }
}

#[cfg(test)]
mod tests;
