use super::physics::BodyOccupancy;
use super::types::{Direction, GameState, GridSize, Point};

fn is_safe(grid: GridSize, bodies: &BodyOccupancy, cell: Point) -> bool {
    grid.contains(cell) && !bodies.is_occupied(cell)
}

fn free_neighbors(grid: GridSize, bodies: &BodyOccupancy, cell: Point) -> usize {
    Direction::ALL
        .iter()
        .filter(|direction| is_safe(grid, bodies, cell.step(**direction)))
        .count()
}

/// Greedy heading for the AI snake: head for the nearest food, never into a
/// wall or body when a safe move exists, preferring roomier cells on ties.
/// Returns `None` while the snake is not on the grid.
pub fn choose_direction(state: &GameState, player_id: &str) -> Option<Direction> {
    let snake = state.snake(player_id).filter(|snake| snake.alive)?;
    let head = snake.head()?;
    let grid = state.grid_size;
    let bodies = BodyOccupancy::from_snakes(state.snakes.iter().filter(|snake| snake.alive));

    let target = state
        .food
        .iter()
        .map(|food| food.position)
        .min_by_key(|position| (head.manhattan(*position), position.x, position.y));

    let mut options = vec![snake.direction];
    options.extend(
        Direction::ALL
            .iter()
            .copied()
            .filter(|direction| *direction != snake.direction && *direction != snake.direction.opposite()),
    );

    let mut best: Option<((i32, usize), Direction)> = None;
    for direction in options {
        let next = head.step(direction);
        if !is_safe(grid, &bodies, next) {
            continue;
        }
        let distance = target.map(|food| next.manhattan(food)).unwrap_or(0);
        let crowding = 4 - free_neighbors(grid, &bodies, next);
        let key = (distance, crowding);
        match best {
            Some((best_key, _)) if key >= best_key => {}
            _ => best = Some((key, direction)),
        }
    }

    Some(best.map(|(_, direction)| direction).unwrap_or(snake.direction))
}
