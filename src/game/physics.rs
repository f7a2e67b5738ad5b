use super::types::{Direction, GridSize, Point, Snake};
use std::collections::HashMap;

/// Applies a requested heading unless it would reverse the snake onto its own neck.
pub fn resolve_heading(current: Direction, requested: Option<Direction>) -> Direction {
    match requested {
        Some(direction) if direction != current.opposite() => direction,
        _ => current,
    }
}

pub fn candidate_head(snake: &Snake) -> Option<Point> {
    snake.head().map(|head| head.step(snake.direction))
}

pub fn is_out_of_bounds(grid: GridSize, point: Point) -> bool {
    !grid.contains(point)
}

/// Segment counts per cell across a set of bodies. Counts rather than a set
/// so that releasing one body's tail does not free a cell another body still covers.
#[derive(Debug, Default)]
pub struct BodyOccupancy {
    cells: HashMap<Point, u32>,
}

impl BodyOccupancy {
    pub fn from_snakes<'a>(snakes: impl IntoIterator<Item = &'a Snake>) -> Self {
        let mut occupancy = Self::default();
        for snake in snakes {
            for cell in &snake.body {
                *occupancy.cells.entry(*cell).or_insert(0) += 1;
            }
        }
        occupancy
    }

    pub fn release(&mut self, cell: Point) {
        if let Some(count) = self.cells.get_mut(&cell) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn is_occupied(&self, cell: Point) -> bool {
        self.cells.get(&cell).copied().unwrap_or(0) > 0
    }
}

/// Moves the head one cell. The tail is kept while growth is pending,
/// consuming one unit of growth per step.
pub fn advance_snake(snake: &mut Snake, new_head: Point) {
    snake.body.push_front(new_head);
    if snake.pending_growth > 0 {
        snake.pending_growth -= 1;
    } else {
        snake.body.pop_back();
    }
}
