//! Two-component vector math shared by every other module.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// An immutable 2D vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Vector {
        Vector { x, y }
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotates counterclockwise by `angle` radians.
    pub fn rotate(self, angle: f64) -> Vector {
        let (sin, cos) = angle.sin_cos();
        Vector {
            x: cos * self.x - sin * self.y,
            y: sin * self.x + cos * self.y,
        }
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// # Panics
    ///
    /// Panics on the zero vector. Only degenerate polygon edges produce one.
    pub fn unit_vector(self) -> Vector {
        let norm = self.length();
        assert!(norm > 0.0, "cannot normalize the zero vector");
        Vector {
            x: self.x / norm,
            y: self.y / norm,
        }
    }

    pub fn average(self, other: Vector) -> Vector {
        Vector {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Length of the projection onto the unit vector `u`.
    pub fn component(self, u: Vector) -> f64 {
        self.dot(u)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, scalar: f64) -> Vector {
        Vector::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, v: Vector) -> Vector {
        v * self
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        *self = *self - rhs;
    }
}

pub fn normalize(vec: Vector) -> Vector {
    vec.unit_vector()
}

/// Vector pointing from `x` to `y`.
pub fn find_vector(x: Vector, y: Vector) -> Vector {
    y - x
}

/// Unit left normal of the edge running from `x` to `y`.
pub fn find_normal(x: Vector, y: Vector) -> Vector {
    let vec = normalize(find_vector(x, y));
    Vector::new(-vec.y, vec.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn arithmetic_matches_components() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(-3.0, 0.5);
        assert_eq!(a + b, Vector::new(-2.0, 2.5));
        assert_eq!(a - b, Vector::new(4.0, 1.5));
        assert_eq!(-a, Vector::new(-1.0, -2.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a.dot(b), -2.0);
        assert_eq!(a.cross(b), 6.5);
        assert_eq!(a.average(b), Vector::new(-1.0, 1.25));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = Vector::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);

        let w = Vector::new(3.0, 4.0).rotate(PI);
        assert_abs_diff_eq!(w.x, -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.y, -4.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_vector_has_length_one() {
        let u = Vector::new(3.0, 4.0).unit_vector();
        assert_abs_diff_eq!(u.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(u.x, 0.6, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "zero vector")]
    fn unit_vector_of_zero_panics() {
        let _ = Vector::ZERO.unit_vector();
    }

    #[test]
    fn component_along_unit_axis() {
        let v = Vector::new(3.0, 4.0);
        assert_eq!(v.component(Vector::new(1.0, 0.0)), 3.0);
        assert_eq!(v.component(Vector::new(0.0, -1.0)), -4.0);
        let diagonal = Vector::new(1.0, 1.0).unit_vector();
        assert_abs_diff_eq!(v.component(diagonal), 7.0 / 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn display_shows_both_components() {
        assert_eq!(Vector::new(1.5, -2.0).to_string(), "(1.5, -2)");
        assert_eq!(format!("{}", Vector::ZERO), "(0, 0)");
    }

    #[test]
    fn find_normal_is_left_perpendicular() {
        let n = find_normal(Vector::new(0.0, 0.0), Vector::new(2.0, 0.0));
        assert_abs_diff_eq!(n.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-12);
        assert_eq!(find_vector(Vector::new(1.0, 1.0), Vector::new(4.0, 5.0)).length(), 5.0);
    }
}
