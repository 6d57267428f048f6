use crate::error::RadialError;
use crate::{FULL_TURN, RADIUS_FACTOR, STROKE_WIDTH};
use derive_more::{Deref, Display, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Clockwise angle from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Deref, From, Into)]
#[display("{_0}°")]
pub struct Degrees(f64);

impl Degrees {
    pub fn new(degrees: f64) -> Self {
        Self(degrees)
    }

    /// Angle of `pointer` as seen from `center`, normalized into `[0, 360)`.
    pub fn between(center: Point, pointer: Point) -> Self {
        let dx = pointer.x - center.x;
        let up = center.y - pointer.y; // screen y grows downwards
        let mut angle = dx.atan2(up).to_degrees();
        if angle < 0.0 {
            angle += FULL_TURN;
        }
        // -1e-15 + 360.0 rounds to a full turn
        if angle >= FULL_TURN {
            angle = 0.0;
        }
        Self(angle)
    }

    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Rounds to the nearest integer, ties toward positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self, RadialError> {
        // a finite pair can still overflow the span, e.g. -MAX..MAX
        if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
            return Err(RadialError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn percentage(&self, value: f64) -> f64 {
        (value - self.min) / self.span() * 100.0
    }

    pub fn angle_from_value(&self, value: f64) -> Degrees {
        Degrees(self.percentage(value) / 100.0 * FULL_TURN)
    }

    pub fn value_from_angle(&self, angle: Degrees) -> f64 {
        let raw = self.min + (angle.0 / FULL_TURN) * self.span();
        round_half_up(raw).clamp(self.min, self.max)
    }
}

/// Placement of the ring inside a `size × size` surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    pub stroke_width: f64,
    pub hit_radius: f64,
}

impl Layout {
    pub fn new(size: f64) -> Result<Self, RadialError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(RadialError::InvalidSize(size));
        }
        let radius = size * RADIUS_FACTOR;
        Ok(Self {
            size,
            center: Point::new(size / 2.0, size / 2.0),
            radius,
            stroke_width: STROKE_WIDTH,
            hit_radius: radius + STROKE_WIDTH,
        })
    }

    pub fn in_hit_area(&self, p: Point) -> bool {
        self.center.distance(p) <= self.hit_radius
    }

    pub fn in_surface(&self, p: Point) -> bool {
        (0.0..=self.size).contains(&p.x) && (0.0..=self.size).contains(&p.y)
    }

    pub fn value_at(&self, range: &Range, p: Point) -> f64 {
        range.value_from_angle(Degrees::between(self.center, p))
    }

    pub fn point_at(&self, angle: Degrees) -> Point {
        let theta = angle.to_radians();
        Point::new(
            self.center.x + self.radius * theta.sin(),
            self.center.y - self.radius * theta.cos(),
        )
    }

    /// 12 o'clock on the ring.
    pub fn arc_start(&self) -> Point {
        Point::new(self.center.x, self.center.y - self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(200.0).unwrap()
    }

    fn at_angle(layout: &Layout, degrees: f64) -> Point {
        let theta = degrees.to_radians();
        Point::new(
            layout.center.x + 50.0 * theta.sin(),
            layout.center.y - 50.0 * theta.cos(),
        )
    }

    #[test]
    fn test_range_rejects_degenerate_bounds() {
        assert_eq!(
            Range::new(5.0, 5.0),
            Err(RadialError::InvalidRange { min: 5.0, max: 5.0 })
        );
        assert!(Range::new(10.0, 2.0).is_err());
        assert!(Range::new(f64::NAN, 2.0).is_err());
        assert!(Range::new(0.0, f64::INFINITY).is_err());
        assert_eq!(
            Range::new(-f64::MAX, f64::MAX),
            Err(RadialError::InvalidRange {
                min: -f64::MAX,
                max: f64::MAX
            })
        );
        assert!(Range::new(-f64::MAX / 2.0, f64::MAX / 2.0).is_ok());
    }

    #[test]
    fn test_layout_rejects_non_positive_size() {
        assert_eq!(Layout::new(0.0), Err(RadialError::InvalidSize(0.0)));
        assert!(Layout::new(-12.0).is_err());
        assert!(Layout::new(f64::NAN).is_err());
    }

    #[test]
    fn test_layout_dimensions() {
        let l = Layout::new(300.0).unwrap();
        assert_eq!(l.center, Point::new(150.0, 150.0));
        assert!((l.radius - 114.0).abs() < 1e-9);
        assert_eq!(l.stroke_width, 24.0);
        assert!((l.hit_radius - 138.0).abs() < 1e-9);
        assert_eq!(l.arc_start(), Point::new(150.0, 36.0));
    }

    #[test]
    fn test_percentage_within_bounds() {
        let range = Range::new(16.0, 30.0).unwrap();
        for v in 16..=30 {
            let pct = range.percentage(v as f64);
            let expected = (v as f64 - 16.0) / 14.0 * 100.0;
            assert!((pct - expected).abs() < 1e-9);
            assert!((0.0..=100.0).contains(&pct));
        }
    }

    #[test]
    fn test_thermostat_scenario() {
        let range = Range::new(16.0, 30.0).unwrap();
        assert!((range.percentage(24.0) - 57.142857).abs() < 1e-4);
        assert!((*range.angle_from_value(24.0) - 205.714285).abs() < 1e-4);
    }

    #[test]
    fn test_angle_value_round_trip() {
        for (min, max) in [(0, 100), (16, 30), (10, 100), (-20, 20), (1, 2)] {
            let range = Range::new(min as f64, max as f64).unwrap();
            for v in min..=max {
                let angle = range.angle_from_value(v as f64);
                assert_eq!(range.value_from_angle(angle), v as f64, "{min}..{max} @ {v}");
            }
        }
    }

    #[test]
    fn test_rounding_ties_go_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
        // 0..=1 at a quarter turn is 0.25, at half a turn exactly 0.5
        let range = Range::new(0.0, 1.0).unwrap();
        assert_eq!(range.value_from_angle(Degrees::new(180.0)), 1.0);
        assert_eq!(range.value_from_angle(Degrees::new(90.0)), 0.0);
    }

    #[test]
    fn test_normalized_angles_stay_below_full_turn() {
        let l = layout();
        for step in 0..720 {
            let p = at_angle(&l, step as f64 * 0.5 - 180.0);
            let angle = *Degrees::between(l.center, p);
            assert!((0.0..FULL_TURN).contains(&angle), "{angle}");
        }
        let just_left = Point::new(l.center.x - 1e-13, l.center.y - 50.0);
        assert!(*Degrees::between(l.center, just_left) < FULL_TURN);
    }

    #[test]
    fn test_cardinal_directions() {
        let l = layout();
        let c = l.center;
        assert_eq!(*Degrees::between(c, Point::new(c.x, c.y - 10.0)), 0.0);
        assert!((*Degrees::between(c, Point::new(c.x + 10.0, c.y)) - 90.0).abs() < 1e-9);
        assert!((*Degrees::between(c, Point::new(c.x, c.y + 10.0)) - 180.0).abs() < 1e-9);
        assert!((*Degrees::between(c, Point::new(c.x - 10.0, c.y)) - 270.0).abs() < 1e-9);
        assert_eq!(*Degrees::between(c, c), 0.0);
    }

    #[test]
    fn test_value_is_monotonic_over_the_sweep() {
        let l = layout();
        let range = Range::new(0.0, 100.0).unwrap();
        let mut last = f64::MIN;
        for step in 0..3600 {
            let v = l.value_at(&range, at_angle(&l, step as f64 * 0.1));
            assert!(v >= last, "value dropped from {last} to {v}");
            last = v;
        }
    }

    #[test]
    fn test_top_of_ring_maps_to_min_from_either_side() {
        let l = layout();
        let range = Range::new(0.0, 100.0).unwrap();
        assert_eq!(l.value_at(&range, at_angle(&l, 0.0)), 0.0);
        assert_eq!(l.value_at(&range, at_angle(&l, 360.0)), 0.0);
        assert_eq!(range.value_from_angle(Degrees::between(l.center, at_angle(&l, 360.0))), 0.0);
    }

    #[test]
    fn test_quarter_turn_gives_quarter_range() {
        let l = layout();
        let range = Range::new(0.0, 100.0).unwrap();
        assert_eq!(l.value_at(&range, at_angle(&l, 90.0)), 25.0);
    }

    #[test]
    fn test_point_at_projects_clockwise_from_top() {
        let l = Layout::new(100.0).unwrap();
        let right = l.point_at(Degrees::new(90.0));
        assert!((right.x - (50.0 + l.radius)).abs() < 1e-9);
        assert!((right.y - 50.0).abs() < 1e-9);
        let bottom = l.point_at(Degrees::new(180.0));
        assert!((bottom.y - (50.0 + l.radius)).abs() < 1e-9);
    }

    #[test]
    fn test_hit_area_and_surface() {
        let l = Layout::new(300.0).unwrap();
        assert!(l.in_hit_area(Point::new(150.0, 12.5)));
        assert!(!l.in_hit_area(Point::new(0.0, 0.0)));
        assert!(l.in_surface(Point::new(0.0, 0.0)));
        assert!(!l.in_surface(Point::new(301.0, 10.0)));
    }
}
