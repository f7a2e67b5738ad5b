use super::constants::MAX_PLACEMENT_ATTEMPTS;
use super::rng::SeededRng;
use super::types::{Direction, GameState, GridSize, Point};
use std::collections::{HashSet, VecDeque};

/// Every cell currently covered by a snake segment, food item or on-grid power-up.
pub fn occupied_cells(state: &GameState) -> HashSet<Point> {
  let mut occupied = HashSet::new();
  for snake in &state.snakes {
    occupied.extend(snake.body.iter().copied());
  }
  occupied.extend(state.food.iter().map(|food| food.position));
  occupied.extend(state.power_ups.iter().map(|power_up| power_up.position));
  occupied
}

fn random_cell(rng: &mut SeededRng, grid: GridSize) -> Point {
  let x = rng.next_index(grid.width as usize) as i32;
  let y = rng.next_index(grid.height as usize) as i32;
  Point::new(x, y)
}

/// Rejection-samples a free cell. Gives up after `MAX_PLACEMENT_ATTEMPTS`
/// draws so a crowded grid skips the spawn instead of spinning.
pub fn random_free_cell(
  rng: &mut SeededRng,
  grid: GridSize,
  occupied: &HashSet<Point>,
) -> Option<Point> {
  if occupied.len() >= grid.cell_count() {
    return None;
  }
  for _ in 0..MAX_PLACEMENT_ATTEMPTS {
    let cell = random_cell(rng, grid);
    if !occupied.contains(&cell) {
      return Some(cell);
    }
  }
  None
}

/// Picks a head cell and heading such that the whole body trails straight
/// behind the head on free cells, and the first move stays on the grid.
pub fn spawn_snake_body(
  rng: &mut SeededRng,
  grid: GridSize,
  occupied: &HashSet<Point>,
  length: usize,
) -> Option<(VecDeque<Point>, Direction)> {
  let length = length.max(1);
  if occupied.len() + length > grid.cell_count() {
    return None;
  }
  for _ in 0..MAX_PLACEMENT_ATTEMPTS {
    let head = random_cell(rng, grid);
    let direction = Direction::ALL[rng.next_index(Direction::ALL.len())];
    if !grid.contains(head.step(direction)) {
      continue;
    }
    let behind = direction.opposite();
    let mut body = VecDeque::with_capacity(length);
    let mut cell = head;
    for _ in 0..length {
      if !grid.contains(cell) || occupied.contains(&cell) {
        break;
      }
      body.push_back(cell);
      cell = cell.step(behind);
    }
    if body.len() == length {
      return Some((body, direction));
    }
  }
  None
}
