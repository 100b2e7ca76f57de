//! Angle helpers shared by pointer tracking, option lookup and telemetry.
//!
//! All angles are in degrees. Screen coordinates grow downwards, so positive
//! angles turn clockwise on screen.

/// Angle of `(px, py)` around `(cx, cy)`, in the range (-180, 180].
pub fn pointer_angle(px: f64, py: f64, cx: f64, cy: f64) -> f64 {
    let degrees = (py - cy).atan2(px - cx).to_degrees();
    // atan2 yields -180 for a negative-zero y offset
    if degrees <= -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

/// Wraps any angle into [0, 360).
pub fn normalize_360(angle: f64) -> f64 {
    ((angle % 360.0) + 360.0) % 360.0
}

/// Linear map of a raw potentiometer reading onto [-180, 180].
///
/// Readings outside `[0, raw_max]` are not clamped and map past the ends of
/// the range.
pub fn raw_to_angle(raw: f64, raw_max: f64) -> f64 {
    (raw / raw_max) * 360.0 - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn pointer_angle_cardinal_directions() {
        assert!((pointer_angle(10.0, 0.0, 0.0, 0.0) - 0.0).abs() < EPS);
        assert!((pointer_angle(0.0, 10.0, 0.0, 0.0) - 90.0).abs() < EPS);
        assert!((pointer_angle(-10.0, 0.0, 0.0, 0.0) - 180.0).abs() < EPS);
        assert!((pointer_angle(0.0, -10.0, 0.0, 0.0) + 90.0).abs() < EPS);
    }

    #[test]
    fn pointer_angle_never_returns_minus_180() {
        let angle = pointer_angle(-5.0, -0.0, 0.0, 0.0);
        assert!((angle - 180.0).abs() < EPS, "got {angle}");
    }

    #[test]
    fn normalize_wraps_negative_and_large_angles() {
        assert!((normalize_360(-90.0) - 270.0).abs() < EPS);
        assert!((normalize_360(720.0) - 0.0).abs() < EPS);
        assert!((normalize_360(365.0) - 5.0).abs() < EPS);
        assert!(normalize_360(-1e-20) < 360.0);
    }

    #[test]
    fn raw_to_angle_endpoints() {
        assert!((raw_to_angle(0.0, 1023.0) + 180.0).abs() < EPS);
        assert!((raw_to_angle(1023.0, 1023.0) - 180.0).abs() < EPS);
        assert!(raw_to_angle(511.5, 1023.0).abs() < EPS);
    }

    #[test]
    fn raw_to_angle_is_unclamped() {
        assert!((raw_to_angle(2046.0, 1023.0) - 540.0).abs() < EPS);
        assert!((raw_to_angle(-1023.0, 1023.0) + 540.0).abs() < EPS);
    }
}
