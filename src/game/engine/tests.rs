use super::*;
use crate::game::ai::choose_direction;
use crate::game::constants::{FOOD_VALUE, POWER_UP_EFFECT_MS};
use crate::game::types::{ActivePowerUp, Food, GridSize, PlayerStats, PowerUp};
use std::collections::VecDeque;

fn make_state(width: i32, height: i32) -> GameState {
    GameState::new(GridSize { width, height }, 12345, 0)
}

fn add_player(state: &mut GameState, id: &str) {
    state.player_stats.insert(
        id.to_string(),
        PlayerStats::new(id.to_string(), id.to_string(), "#FFFFFF".to_string()),
    );
}

fn add_snake(state: &mut GameState, id: &str, cells: &[(i32, i32)], direction: Direction) {
    add_player(state, id);
    let body = cells
        .iter()
        .map(|(x, y)| Point::new(*x, *y))
        .collect::<VecDeque<_>>();
    state
        .snakes
        .push(Snake::new(id.to_string(), "#FFFFFF".to_string(), body, direction));
}

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn no_inputs() -> BTreeMap<String, Direction> {
    BTreeMap::new()
}

fn grant(state: &mut GameState, id: &str, kind: PowerUpType, expires_at: i64) {
    state.active_power_ups.push(ActivePowerUp {
        kind,
        player_id: id.to_string(),
        expires_at,
    });
}

#[test]
fn sequence_advances_by_one_and_timestamp_is_set() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);

    let next = update_game(&state, &no_inputs(), 1_000, &ids(&["a"]));

    assert_eq!(next.sequence, state.sequence + 1);
    assert_eq!(next.timestamp, 1_000);
    assert_eq!(next.snake("a").unwrap().head(), Some(Point::new(6, 5)));
}

#[test]
fn input_state_is_not_mutated() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    let before = state.clone();

    let _ = update_game(&state, &no_inputs(), 1_000, &ids(&["a"]));

    assert_eq!(state, before);
}

#[test]
fn identical_arguments_produce_identical_output() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(10, 10), (10, 11), (10, 12)], Direction::Up);
    add_player(&mut state, "c");
    let mut inputs = no_inputs();
    inputs.insert("a".to_string(), Direction::Down);
    let eligible = ids(&["a", "b", "c"]);

    let first = update_game(&state, &inputs, 150, &eligible);
    let second = update_game(&state, &inputs, 150, &eligible);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_ne!(first.rng_seed, state.rng_seed);
}

#[test]
fn reverse_input_keeps_current_heading() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    let mut inputs = no_inputs();
    inputs.insert("a".to_string(), Direction::Left);

    let next = update_game(&state, &inputs, 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert!(snake.alive);
    assert_eq!(snake.direction, Direction::Right);
    assert_eq!(snake.head(), Some(Point::new(6, 5)));
}

#[test]
fn leaving_the_grid_kills_and_counts_a_death() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(9, 5), (8, 5), (7, 5)], Direction::Right);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert!(!snake.alive);
    assert_eq!(snake.head(), Some(Point::new(9, 5)));
    assert_eq!(next.player_stats["a"].deaths, 1);
}

#[test]
fn running_into_another_body_kills() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(6, 4), (6, 5), (6, 6), (6, 7)], Direction::Up);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    assert!(!next.snake("a").unwrap().alive);
    assert!(next.snake("b").unwrap().alive);
    assert_eq!(next.player_stats["a"].deaths, 1);
    assert_eq!(next.player_stats["b"].deaths, 0);
}

#[test]
fn invincibility_suppresses_body_collision() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(6, 4), (6, 5), (6, 6), (6, 7)], Direction::Up);
    grant(&mut state, "a", PowerUpType::Invincibility, 10_000);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    let snake = next.snake("a").unwrap();
    assert!(snake.alive);
    assert_eq!(snake.head(), Some(Point::new(6, 5)));
    assert_eq!(snake.active_power_ups, vec![PowerUpType::Invincibility]);
    assert_eq!(next.player_stats["a"].deaths, 0);
}

#[test]
fn expired_invincibility_does_not_protect() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(6, 4), (6, 5), (6, 6), (6, 7)], Direction::Up);
    grant(&mut state, "a", PowerUpType::Invincibility, 150);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    assert!(!next.snake("a").unwrap().alive);
    assert!(next.active_power_ups.is_empty());
}

#[test]
fn invincible_snake_holds_position_at_the_wall() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(9, 5), (8, 5), (7, 5)], Direction::Right);
    grant(&mut state, "a", PowerUpType::Invincibility, 10_000);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert!(snake.alive);
    assert_eq!(snake.head(), Some(Point::new(9, 5)));
}

#[test]
fn head_on_collision_kills_both() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(7, 5), (8, 5), (9, 5)], Direction::Left);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    assert!(!next.snake("a").unwrap().alive);
    assert!(!next.snake("b").unwrap().alive);
    assert_eq!(next.player_stats["a"].deaths, 1);
    assert_eq!(next.player_stats["b"].deaths, 1);
}

#[test]
fn moving_into_a_vacated_tail_is_safe() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(6, 3), (6, 4), (6, 5)], Direction::Up);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    let a = next.snake("a").unwrap();
    assert!(a.alive);
    assert_eq!(a.head(), Some(Point::new(6, 5)));
    assert!(next.snake("b").unwrap().alive);
}

#[test]
fn tail_of_a_growing_snake_stays_solid() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(6, 3), (6, 4), (6, 5)], Direction::Up);
    state.snakes[1].pending_growth = 1;

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    assert!(!next.snake("a").unwrap().alive);
    let b = next.snake("b").unwrap();
    assert_eq!(b.body.len(), 4);
    assert_eq!(b.tail(), Some(Point::new(6, 5)));
}

#[test]
fn chasing_own_tail_is_safe() {
    let mut state = make_state(20, 20);
    add_snake(
        &mut state,
        "a",
        &[(5, 5), (5, 6), (6, 6), (6, 5)],
        Direction::Right,
    );

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert!(snake.alive);
    assert_eq!(snake.head(), Some(Point::new(6, 5)));
}

#[test]
fn running_into_own_body_kills() {
    let mut state = make_state(20, 20);
    add_snake(
        &mut state,
        "a",
        &[(5, 5), (5, 6), (6, 6), (6, 5), (7, 5)],
        Direction::Right,
    );

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert!(!snake.alive);
    assert_eq!(snake.head(), Some(Point::new(5, 5)));
    assert_eq!(next.player_stats["a"].deaths, 1);
}

#[test]
fn tail_of_a_snake_dying_this_step_stays_solid() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(9, 5), (8, 5), (7, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(7, 4), (7, 3), (7, 2)], Direction::Down);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    let a = next.snake("a").unwrap();
    let b = next.snake("b").unwrap();
    assert!(!a.alive);
    assert!(!b.alive);
    assert_eq!(b.head(), Some(Point::new(7, 4)));
    assert!(!a.body.contains(&b.head().unwrap()));
    assert_eq!(next.player_stats["b"].deaths, 1);
}

#[test]
fn tail_of_an_invincible_snake_held_at_the_wall_stays_solid() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(9, 5), (8, 5), (7, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(7, 4), (7, 3), (7, 2)], Direction::Down);
    grant(&mut state, "a", PowerUpType::Invincibility, 10_000);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b"]));

    let a = next.snake("a").unwrap();
    assert!(a.alive);
    assert_eq!(a.tail(), Some(Point::new(7, 5)));
    assert!(!next.snake("b").unwrap().alive);
}

#[test]
fn blocked_tails_cascade_along_a_chain() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(6, 2), (5, 2), (4, 2)], Direction::Right);
    add_snake(&mut state, "b", &[(7, 4), (7, 3), (7, 2)], Direction::Down);
    add_snake(&mut state, "c", &[(9, 5), (8, 5), (7, 5)], Direction::Right);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b", "c"]));

    for id in ["a", "b", "c"] {
        assert!(!next.snake(id).unwrap().alive, "{id} should have died");
        assert_eq!(next.player_stats[id].deaths, 1);
    }
}

#[test]
fn eating_food_scores_and_grows_by_one() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.food.push(Food {
        position: Point::new(6, 5),
        value: FOOD_VALUE,
    });

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert_eq!(snake.score, FOOD_VALUE as u64);
    assert_eq!(snake.body.len(), 4);
    assert_eq!(snake.pending_growth, 0);
    assert_eq!(snake.tail(), Some(Point::new(3, 5)));
    assert_eq!(next.player_stats["a"].score, FOOD_VALUE as u64);
    assert!(!next.food.iter().any(|food| food.position == Point::new(6, 5)));
}

#[test]
fn double_score_doubles_food_value() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    grant(&mut state, "a", PowerUpType::DoubleScore, 10_000);
    state.food.push(Food {
        position: Point::new(6, 5),
        value: FOOD_VALUE,
    });

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    assert_eq!(next.snake("a").unwrap().score, 2 * FOOD_VALUE as u64);
    assert_eq!(next.player_stats["a"].score, 2 * FOOD_VALUE as u64);
}

#[test]
fn power_up_pickup_creates_timed_effect() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.power_ups.push(PowerUp {
        id: 1,
        kind: PowerUpType::Speed,
        position: Point::new(6, 5),
        expires_at: 10_000,
    });

    let next = update_game(&state, &no_inputs(), 500, &ids(&["a"]));

    assert!(next.power_ups.iter().all(|power_up| power_up.id != 1));
    assert_eq!(
        next.active_power_ups,
        vec![ActivePowerUp {
            kind: PowerUpType::Speed,
            player_id: "a".to_string(),
            expires_at: 500 + POWER_UP_EFFECT_MS,
        }]
    );
    assert_eq!(next.snake("a").unwrap().active_power_ups, vec![PowerUpType::Speed]);
}

#[test]
fn uncollected_power_up_expires_from_grid() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.power_ups.push(PowerUp {
        id: 1,
        kind: PowerUpType::Slow,
        position: Point::new(15, 15),
        expires_at: 1_000,
    });

    let next = update_game(&state, &no_inputs(), 1_000, &ids(&["a"]));

    assert!(next.power_ups.iter().all(|power_up| power_up.id != 1));
}

#[test]
fn speed_effect_moves_two_cells() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    grant(&mut state, "a", PowerUpType::Speed, 10_000);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    let snake = next.snake("a").unwrap();
    assert_eq!(snake.head(), Some(Point::new(7, 5)));
    assert_eq!(snake.body.len(), 3);
    assert_eq!(snake.speed, 2.0);
}

#[test]
fn slow_effect_moves_every_other_tick() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    grant(&mut state, "a", PowerUpType::Slow, 10_000);
    let eligible = ids(&["a"]);

    let first = update_game(&state, &no_inputs(), 150, &eligible);
    assert_eq!(first.snake("a").unwrap().head(), Some(Point::new(5, 5)));

    let second = update_game(&first, &no_inputs(), 300, &eligible);
    assert_eq!(second.snake("a").unwrap().head(), Some(Point::new(6, 5)));
}

#[test]
fn effects_expire_once_their_time_passes() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    grant(&mut state, "a", PowerUpType::DoubleScore, 1_000);

    let next = update_game(&state, &no_inputs(), 1_000, &ids(&["a"]));

    assert!(next.active_power_ups.is_empty());
    assert!(next.snake("a").unwrap().active_power_ups.is_empty());
}

#[test]
fn dead_snake_drops_its_effects() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(9, 5), (8, 5), (7, 5)], Direction::Right);
    grant(&mut state, "a", PowerUpType::DoubleScore, 10_000);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    assert!(next.active_power_ups.is_empty());
}

#[test]
fn ineligible_snakes_are_removed() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    add_snake(&mut state, "b", &[(10, 10), (10, 11), (10, 12)], Direction::Up);

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    assert!(next.snake("a").is_some());
    assert!(next.snake("b").is_none());
    assert!(next.player_stats.contains_key("b"));
}

#[test]
fn eligible_players_without_a_snake_are_spawned() {
    let mut state = make_state(20, 20);
    add_player(&mut state, "a");
    add_player(&mut state, "b");

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a", "b", "ghost"]));

    assert_eq!(next.snakes.len(), 2);
    assert!(next.snake("ghost").is_none());
    for snake in &next.snakes {
        assert_eq!(snake.body.len(), 3);
        for cell in &snake.body {
            assert!(next.grid_size.contains(*cell));
        }
    }
}

#[test]
fn dead_snake_respawns_next_tick_keeping_cumulative_score() {
    let mut state = make_state(10, 10);
    add_snake(&mut state, "a", &[(9, 5), (8, 5), (7, 5)], Direction::Right);
    state.snakes[0].score = 30;
    state.player_stats.get_mut("a").unwrap().score = 30;
    let eligible = ids(&["a"]);

    let mut died = update_game(&state, &no_inputs(), 150, &eligible);
    assert!(!died.snake("a").unwrap().alive);
    died.food.clear();

    let respawned = update_game(&died, &no_inputs(), 300, &eligible);
    let snake = respawned.snake("a").unwrap();
    assert!(snake.alive);
    assert_eq!(snake.score, 0);
    assert_eq!(respawned.player_stats["a"].score, 30);
    assert_eq!(respawned.player_stats["a"].deaths, 1);
}

#[test]
fn snake_colour_follows_player_stats() {
    let mut state = make_state(20, 20);
    add_snake(&mut state, "a", &[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.player_stats.get_mut("a").unwrap().color = "#123456".to_string();

    let next = update_game(&state, &no_inputs(), 150, &ids(&["a"]));

    assert_eq!(next.snake("a").unwrap().color, "#123456");
}

#[test]
fn alive_heads_stay_on_the_grid_over_many_ticks() {
    let mut state = make_state(12, 12);
    for id in ["a", "b", "c", "d"] {
        add_player(&mut state, id);
    }
    let eligible = ids(&["a", "b", "c", "d"]);
    let mut now = 0;
    for _ in 0..300 {
        now += 150;
        let mut inputs = BTreeMap::new();
        for id in &eligible {
            if let Some(direction) = choose_direction(&state, id) {
                inputs.insert(id.clone(), direction);
            }
        }
        let next = update_game(&state, &inputs, now, &eligible);
        assert_eq!(next.sequence, state.sequence + 1);
        for snake in next.snakes.iter().filter(|snake| snake.alive) {
            for cell in &snake.body {
                assert!(next.grid_size.contains(*cell));
            }
            for pair in snake.body.iter().zip(snake.body.iter().skip(1)) {
                assert_eq!(pair.0.manhattan(*pair.1), 1);
            }
        }
        state = next;
    }
}
