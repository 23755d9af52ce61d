//! Geometric primitives for chart rendering.
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! Coordinates follow SVG: origin at the top-left, X grows rightward and
//! Y grows downward.

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use chartwell_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point's coordinates to this point
    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Subtracts another point's coordinates from this point
    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Multiplies both coordinates by `factor`
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Returns the point at `radius` from this point along `angle` (radians,
    /// measured clockwise from twelve o'clock).
    pub fn polar_offset(self, radius: f32, angle: f32) -> Self {
        Self::new(
            self.x + radius * angle.sin(),
            self.y - radius * angle.cos(),
        )
    }
}

/// Width and height dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular area with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Shrinks the bounds by `insets` on each side.
    ///
    /// Sides never cross: an inset larger than the available space collapses
    /// that dimension to zero at its midpoint.
    pub fn shrink(self, insets: Insets) -> Self {
        let (min_x, max_x) = collapse(self.min_x + insets.left, self.max_x - insets.right);
        let (min_y, max_y) = collapse(self.min_y + insets.top, self.max_y - insets.bottom);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

fn collapse(min: f32, max: f32) -> (f32, f32) {
    if max < min {
        let mid = (min + max) / 2.0;
        (mid, mid)
    } else {
        (min, max)
    }
}

/// Represents spacing around an element with potentially different values
/// for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn insets_strategy() -> impl Strategy<Value = Insets> {
        (0.0f32..600.0, 0.0f32..600.0, 0.0f32..600.0, 0.0f32..600.0)
            .prop_map(|(top, right, bottom, left)| Insets::new(top, right, bottom, left))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Shrinking never produces negative dimensions.
    fn check_shrink_is_never_negative(bounds: Bounds, insets: Insets) -> Result<(), TestCaseError> {
        let shrunk = bounds.shrink(insets);

        prop_assert!(shrunk.width() >= 0.0);
        prop_assert!(shrunk.height() >= 0.0);
        Ok(())
    }

    /// Insets that fit are subtracted exactly.
    fn check_shrink_subtracts_fitting_insets(
        bounds: Bounds,
        shares: (f32, f32, f32, f32),
    ) -> Result<(), TestCaseError> {
        let (top, right, bottom, left) = shares;
        let insets = Insets::new(
            top * bounds.height(),
            right * bounds.width(),
            bottom * bounds.height(),
            left * bounds.width(),
        );

        let shrunk = bounds.shrink(insets);

        prop_assert!(approx_eq!(
            f32,
            shrunk.width(),
            bounds.width() - insets.left() - insets.right(),
            epsilon = 1e-2
        ));
        prop_assert!(approx_eq!(f32, shrunk.min_y(), bounds.min_y() + insets.top(), epsilon = 1e-2));
        Ok(())
    }

    /// A polar offset lies `radius` away from its origin.
    fn check_polar_offset_distance(radius: f32, angle: f32) -> Result<(), TestCaseError> {
        let origin = Point::new(50.0, -20.0);
        let delta = origin.polar_offset(radius, angle).sub_point(origin);
        let distance = (delta.x() * delta.x() + delta.y() * delta.y()).sqrt();

        prop_assert!(approx_eq!(f32, distance, radius, epsilon = 1e-2));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn shrink_is_never_negative(bounds in bounds_strategy(), insets in insets_strategy()) {
            check_shrink_is_never_negative(bounds, insets)?;
        }

        #[test]
        fn shrink_subtracts_fitting_insets(
            bounds in bounds_strategy(),
            shares in (0.0f32..0.5, 0.0f32..0.5, 0.0f32..0.5, 0.0f32..0.5),
        ) {
            check_shrink_subtracts_fitting_insets(bounds, shares)?;
        }

        #[test]
        fn polar_offset_distance(radius in 0.0f32..500.0, angle in 0.0f32..std::f32::consts::TAU) {
            check_polar_offset_distance(radius, angle)?;
        }
    }
}
