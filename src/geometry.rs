//! Hit-testing of pointer positions against the dial's rings and centre button.

use crate::angle::pointer_angle;
use crate::config::RingThresholds;

/// One of the three concentric rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ring {
    Outer,
    Middle,
    Inner,
}

impl Ring {
    pub const ALL: [Ring; 3] = [Ring::Outer, Ring::Middle, Ring::Inner];

    pub const fn index(self) -> usize {
        match self {
            Ring::Outer => 0,
            Ring::Middle => 1,
            Ring::Inner => 2,
        }
    }
}

/// A position in the same coordinate space as [`DialBounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the rendered dial surface, snapshotted at event time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DialBounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square bounds of side `size` anchored at the origin.
    pub const fn square(size: f64) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    pub fn distance_from_center(&self, point: Point) -> f64 {
        let center = self.center();
        (point.x - center.x).hypot(point.y - center.y)
    }

    /// Angle of `point` around the dial centre, in (-180, 180].
    pub fn angle_of(&self, point: Point) -> f64 {
        let center = self.center();
        pointer_angle(point.x, point.y, center.x, center.y)
    }

    fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    ActivationButton,
    Ring(Ring),
    Nothing,
}

/// Pure hit-testing rules for the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    /// Fixed pixel radius of the centre button, independent of dial size.
    pub activation_radius: f64,
    pub thresholds: RingThresholds,
}

impl Default for DialGeometry {
    fn default() -> Self {
        Self {
            activation_radius: 25.0,
            thresholds: RingThresholds::default(),
        }
    }
}

impl DialGeometry {
    pub fn new(activation_radius: f64, thresholds: RingThresholds) -> Self {
        Self {
            activation_radius,
            thresholds,
        }
    }

    pub fn is_on_activation_button(&self, bounds: Option<&DialBounds>, point: Point) -> bool {
        match bounds {
            Some(bounds) if bounds.is_measurable() => {
                bounds.distance_from_center(point) <= self.activation_radius
            }
            _ => false,
        }
    }

    pub fn ring_at(&self, bounds: Option<&DialBounds>, point: Point) -> Option<Ring> {
        let bounds = bounds.filter(|b| b.is_measurable())?;
        let distance = bounds.distance_from_center(point);
        let radius = bounds.radius();

        if distance > radius * self.thresholds.outer {
            Some(Ring::Outer)
        } else if distance > radius * self.thresholds.middle {
            Some(Ring::Middle)
        } else if distance > radius * self.thresholds.inner {
            Some(Ring::Inner)
        } else {
            None
        }
    }

    /// Button first; ring hit-testing only runs when the button was missed.
    pub fn hit_test(&self, bounds: Option<&DialBounds>, point: Point) -> Hit {
        if self.is_on_activation_button(bounds, point) {
            return Hit::ActivationButton;
        }
        match self.ring_at(bounds, point) {
            Some(ring) => Hit::Ring(ring),
            None => Hit::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> DialBounds {
        DialBounds::new(100.0, 50.0, 400.0, 400.0)
    }

    fn at_distance(b: &DialBounds, distance: f64) -> Point {
        let c = b.center();
        Point::new(c.x + distance, c.y)
    }

    #[test]
    fn centre_is_the_activation_button() {
        let geometry = DialGeometry::default();
        let b = bounds();
        assert_eq!(geometry.hit_test(Some(&b), b.center()), Hit::ActivationButton);
        assert_eq!(
            geometry.hit_test(Some(&b), at_distance(&b, 25.0)),
            Hit::ActivationButton
        );
    }

    #[test]
    fn button_wins_even_when_inside_a_ring_band() {
        // On a tiny dial the 25px button covers every ring band.
        let geometry = DialGeometry::default();
        let b = DialBounds::square(40.0);
        let p = at_distance(&b, 19.0);
        assert_eq!(geometry.ring_at(Some(&b), p), Some(Ring::Outer));
        assert_eq!(geometry.hit_test(Some(&b), p), Hit::ActivationButton);
    }

    #[test]
    fn ring_thresholds_follow_radius_fractions() {
        let geometry = DialGeometry::default();
        let b = bounds();
        // radius = 200
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 141.0)), Some(Ring::Outer));
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 140.0)), Some(Ring::Middle));
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 91.0)), Some(Ring::Middle));
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 90.0)), Some(Ring::Inner));
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 31.0)), Some(Ring::Inner));
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 30.0)), None);
    }

    #[test]
    fn dead_zone_between_button_and_inner_ring() {
        let geometry = DialGeometry::default();
        let b = bounds();
        assert_eq!(geometry.hit_test(Some(&b), at_distance(&b, 27.0)), Hit::Nothing);
    }

    #[test]
    fn points_beyond_the_rim_still_hit_outer() {
        let geometry = DialGeometry::default();
        let b = bounds();
        assert_eq!(geometry.ring_at(Some(&b), at_distance(&b, 900.0)), Some(Ring::Outer));
    }

    #[test]
    fn unmeasurable_bounds_never_hit() {
        let geometry = DialGeometry::default();
        let empty = DialBounds::square(0.0);
        let p = Point::new(0.0, 0.0);
        assert_eq!(geometry.hit_test(None, p), Hit::Nothing);
        assert_eq!(geometry.hit_test(Some(&empty), p), Hit::Nothing);
        assert!(!geometry.is_on_activation_button(None, p));
    }

    #[test]
    fn radius_uses_the_shorter_side() {
        let b = DialBounds::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(b.radius(), 150.0);
        assert_eq!(b.center(), Point::new(200.0, 150.0));
    }
}
