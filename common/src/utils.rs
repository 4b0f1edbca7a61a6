use crate::constants::COORDINATE_SCALE;
use rand::random;

pub fn random_position() -> (f32, f32) {
    (
        (random::<f32>() * COORDINATE_SCALE).round(),
        (random::<f32>() * COORDINATE_SCALE).round(),
    )
}

pub fn random_bool_by_probability(probability: f32) -> bool {
    let rand_value: f32 = random();
    rand_value < probability
}

/// Grid distance between two points, in meters.
pub fn manhattan_distance(point1: (f32, f32), point2: (f32, f32)) -> f32 {
    let dx = (point1.0 - point2.0).abs();
    let dy = (point1.1 - point2.1).abs();
    dx + dy
}

/// Moves `from` towards `to` along the grid, spending at most `step` meters.
/// The x axis is exhausted first, matching how couriers are simulated.
pub fn step_towards(from: (f32, f32), to: (f32, f32), step: f32) -> (f32, f32) {
    let mut remaining = step;

    let dx = to.0 - from.0;
    let move_x = dx.abs().min(remaining);
    let x = from.0 + move_x * dx.signum();
    remaining -= move_x;

    let dy = to.1 - from.1;
    let move_y = dy.abs().min(remaining);
    let y = from.1 + move_y * dy.signum();

    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_towards_reaches_target_without_overshoot() {
        let target = (10.0, 5.0);
        let moved = step_towards((0.0, 0.0), target, 20.0);
        assert_eq!(moved, target);
    }

    #[test]
    fn step_towards_spends_x_axis_first() {
        let moved = step_towards((0.0, 0.0), (10.0, 5.0), 12.0);
        assert_eq!(moved, (10.0, 2.0));
    }

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = (3.0, 7.0);
        let b = (8.0, 1.0);
        assert_eq!(manhattan_distance(a, b), manhattan_distance(b, a));
        assert_eq!(manhattan_distance(a, b), 11.0);
    }
}
