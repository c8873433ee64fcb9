// Math utilities for normalised input values

/// Resting value of an analog control (stick centred, trigger released)
pub const AXIS_REST: f32 = 0.5;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp a value into the unit range [0, 1]
pub fn clamp_unit(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Zero out magnitudes that fall inside the deadzone.
/// The input is clamped to [-1, 1] first.
pub fn apply_deadzone(magnitude: f32, deadzone: f32) -> f32 {
    let magnitude = clamp(magnitude, -1.0, 1.0);
    if magnitude.abs() < deadzone {
        0.0
    } else {
        magnitude
    }
}

/// Map a signed axis magnitude in [-1, 1] onto [0, 1], centred on 0.5.
///
/// Triggers report [0, 1] and therefore land in [0.5, 1], so an untouched
/// trigger reads exactly 0.5.
pub fn axis_to_unit(magnitude: f32) -> f32 {
    clamp_unit((clamp(magnitude, -1.0, 1.0) + 1.0) * 0.5)
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.03, 0.05), 0.0);
        assert_eq!(apply_deadzone(-0.03, 0.05), 0.0);
        assert_eq!(apply_deadzone(0.4, 0.05), 0.4);
        assert_eq!(apply_deadzone(3.0, 0.05), 1.0);
    }

    #[test]
    fn test_axis_to_unit() {
        assert_eq!(axis_to_unit(0.0), AXIS_REST);
        assert_eq!(axis_to_unit(1.0), 1.0);
        assert_eq!(axis_to_unit(-1.0), 0.0);
        assert!(approx_equal(axis_to_unit(0.3), 0.65, 1e-6));
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }
}
