use super::types::Direction;

/// Accepts only the four cardinal unit vectors; zero, diagonal, fractional
/// and non-finite pairs are rejected.
pub fn parse_direction(dx: f64, dy: f64) -> Option<Direction> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    if dx.fract() != 0.0 || dy.fract() != 0.0 {
        return None;
    }
    Direction::from_delta(dx as i64, dy as i64)
}
