//! Numerically stable real roots of `a x^2 + b x + c = 0`.

/// Real solutions of a quadratic equation.
///
/// Unused solution slots hold `+inf`; with two solutions they are sorted,
/// `smaller() <= larger()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticEquation {
    solutions: usize,
    values: [f64; 2],
}

impl QuadraticEquation {
    /// Solve `a x^2 + b x + c = 0`.
    ///
    /// `|a| <= tolerance` degrades to the linear equation; a discriminant
    /// within `[0, tolerance]` is treated as a double root.
    pub fn new(a: f64, b: f64, c: f64, tolerance: f64) -> Self {
        let none = Self {
            solutions: 0,
            values: [f64::INFINITY; 2],
        };

        if a.abs() <= tolerance {
            if b.abs() <= tolerance {
                return none;
            }
            return Self {
                solutions: 1,
                values: [-c / b, f64::INFINITY],
            };
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant > tolerance {
            // avoid cancellation between -b and the square root
            let q = -0.5 * (b + discriminant.sqrt().copysign(b));
            let (x0, x1) = (q / a, c / q);
            Self {
                solutions: 2,
                values: if x0 < x1 { [x0, x1] } else { [x1, x0] },
            }
        } else if discriminant >= 0.0 {
            Self {
                solutions: 1,
                values: [-0.5 * b / a, f64::INFINITY],
            }
        } else {
            none
        }
    }

    /// Number of real solutions (0, 1 or 2).
    pub fn solutions(&self) -> usize {
        self.solutions
    }

    /// First solution.
    pub fn smaller(&self) -> f64 {
        self.values[0]
    }

    /// Second solution.
    pub fn larger(&self) -> f64 {
        self.values[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_roots_sorted() {
        // (x - 3)(x + 1) = x^2 - 2x - 3
        let qe = QuadraticEquation::new(1.0, -2.0, -3.0, 1e-12);
        assert_eq!(qe.solutions(), 2);
        assert_relative_eq!(qe.smaller(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(qe.larger(), 3.0, epsilon = 1e-12);

        let flipped = QuadraticEquation::new(-1.0, 2.0, 3.0, 1e-12);
        assert!(flipped.smaller() < flipped.larger());
    }

    #[test]
    fn test_double_root() {
        let qe = QuadraticEquation::new(1.0, -4.0, 4.0, 1e-12);
        assert_eq!(qe.solutions(), 1);
        assert_relative_eq!(qe.smaller(), 2.0);
        assert_eq!(qe.larger(), f64::INFINITY);
    }

    #[test]
    fn test_no_root() {
        let qe = QuadraticEquation::new(1.0, 0.0, 1.0, 1e-12);
        assert_eq!(qe.solutions(), 0);
        assert_eq!(qe.smaller(), f64::INFINITY);
    }

    #[test]
    fn test_linear_fallback() {
        let qe = QuadraticEquation::new(0.0, 2.0, -4.0, 1e-12);
        assert_eq!(qe.solutions(), 1);
        assert_relative_eq!(qe.smaller(), 2.0);

        let constant = QuadraticEquation::new(0.0, 0.0, 1.0, 1e-12);
        assert_eq!(constant.solutions(), 0);
    }

    #[test]
    fn test_small_root_precision() {
        // roots 1e8 and 1e-8: naive formula loses the small one
        let qe = QuadraticEquation::new(1.0, -(1e8 + 1e-8), 1.0, 1e-12);
        assert_relative_eq!(qe.smaller(), 1e-8, max_relative = 1e-9);
        assert_relative_eq!(qe.larger(), 1e8, max_relative = 1e-12);
    }
}
