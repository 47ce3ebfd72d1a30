use std::fmt;

use nalgebra::Vector2;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

/// Exact scalar used for all coordinates.
pub type Coord = BigRational;

/// Integer literal as an exact coordinate.
#[inline]
pub fn coord(v: i64) -> Coord {
    BigRational::from_integer(BigInt::from(v))
}

/// Exact point; ordered lexicographically by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[inline]
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_ints(x: i64, y: i64) -> Self {
        Self::new(coord(x), coord(y))
    }

    /// `self + t (other - self)`.
    pub fn lerp(&self, other: &Point, t: &Coord) -> Point {
        Point::new(
            &self.x + t * (&other.x - &self.x),
            &self.y + t * (&other.y - &self.y),
        )
    }

    /// Nearest `f64` view. Only for heuristics and triangulation input.
    pub fn to_vec2(&self) -> Vector2<f64> {
        Vector2::new(
            self.x.to_f64().unwrap_or(f64::NAN),
            self.y.to_f64().unwrap_or(f64::NAN),
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orientation determinant of `(b - a) × (c - a)`.
///
/// Positive iff `a, b, c` turn counter-clockwise; zero iff collinear.
#[inline]
pub fn cross(a: &Point, b: &Point, c: &Point) -> Coord {
    (&b.x - &a.x) * (&c.y - &a.y) - (&b.y - &a.y) * (&c.x - &a.x)
}
