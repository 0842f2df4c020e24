//! Feasible sets with exact projections

use crate::core::{Result, SVMError};
use crate::optim::ConvexSet;
use ndarray::{Array1, ArrayView1, Zip};

const MAX_BISECTIONS: usize = 200;

/// Box constraint l ≤ x ≤ u
#[derive(Debug, Clone, PartialEq)]
pub struct BoxConstraint {
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl BoxConstraint {
    /// Create a box from per-coordinate bounds
    pub fn new(lower: Array1<f64>, upper: Array1<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(SVMError::ShapeMismatch {
                context: "box bounds",
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        if lower.iter().zip(upper.iter()).any(|(l, u)| !(l <= u)) {
            return Err(SVMError::InfeasibleConstraints(
                "lower bound exceeds upper bound".to_string(),
            ));
        }
        Ok(Self { lower, upper })
    }

    /// The same interval [lower, upper] for all `n` coordinates
    pub fn uniform(n: usize, lower: f64, upper: f64) -> Result<Self> {
        Self::new(Array1::from_elem(n, lower), Array1::from_elem(n, upper))
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    fn check_len(&self, point: &ArrayView1<f64>) -> Result<()> {
        if point.len() != self.len() {
            return Err(SVMError::ShapeMismatch {
                context: "projection",
                expected: self.len(),
                actual: point.len(),
            });
        }
        Ok(())
    }

    /// Elementwise clipping into the box
    fn clip(&self, point: ArrayView1<f64>) -> Array1<f64> {
        Zip::from(point)
            .and(&self.lower)
            .and(&self.upper)
            .map_collect(|&v, &l, &u| v.max(l).min(u))
    }
}

impl ConvexSet for BoxConstraint {
    fn project(&self, point: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_len(&point)?;
        Ok(self.clip(point))
    }

    fn contains(&self, point: ArrayView1<f64>, tolerance: f64) -> bool {
        point.len() == self.len()
            && Zip::from(point)
                .and(&self.lower)
                .and(&self.upper)
                .all(|&v, &l, &u| v >= l - tolerance && v <= u + tolerance)
    }
}

/// Box intersected with one hyperplane: { l ≤ x ≤ u, normalᵀx = offset }
///
/// The projection of v is clip(v - μ·normal) for the unique μ where the
/// hyperplane residual vanishes. The residual is monotone and piecewise
/// linear in μ, so μ is bracketed by the breakpoints, bisected, and finished
/// with a linear interpolation on the last segment.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxWithEquality {
    bounds: BoxConstraint,
    normal: Array1<f64>,
    offset: f64,
}

impl BoxWithEquality {
    /// Create the set; all bounds must be finite
    pub fn new(bounds: BoxConstraint, normal: Array1<f64>, offset: f64) -> Result<Self> {
        if normal.len() != bounds.len() {
            return Err(SVMError::ShapeMismatch {
                context: "hyperplane normal",
                expected: bounds.len(),
                actual: normal.len(),
            });
        }
        let finite = bounds
            .lower
            .iter()
            .chain(bounds.upper.iter())
            .chain(normal.iter())
            .all(|v| v.is_finite());
        if !finite || !offset.is_finite() {
            return Err(SVMError::InvalidParameter(
                "bounds and hyperplane must be finite".to_string(),
            ));
        }
        Ok(Self {
            bounds,
            normal,
            offset,
        })
    }

    pub fn bounds(&self) -> &BoxConstraint {
        &self.bounds
    }

    /// normalᵀx - offset
    pub fn residual(&self, point: ArrayView1<f64>) -> f64 {
        self.normal.dot(&point) - self.offset
    }

    fn shifted(&self, point: &ArrayView1<f64>, mu: f64) -> Array1<f64> {
        let moved = point - &(&self.normal * mu);
        self.bounds.clip(moved.view())
    }

    fn shifted_residual(&self, point: &ArrayView1<f64>, mu: f64) -> f64 {
        let mut total = 0.0;
        Zip::from(point)
            .and(&self.normal)
            .and(&self.bounds.lower)
            .and(&self.bounds.upper)
            .for_each(|&v, &c, &l, &u| total += c * (v - mu * c).max(l).min(u));
        total - self.offset
    }

    /// Smallest and largest μ at which some coordinate changes clipping state
    fn breakpoints(&self, point: &ArrayView1<f64>) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        Zip::from(point)
            .and(&self.normal)
            .and(&self.bounds.lower)
            .and(&self.bounds.upper)
            .for_each(|&v, &c, &l, &u| {
                if c != 0.0 {
                    let at_lower = (v - l) / c;
                    let at_upper = (v - u) / c;
                    lo = lo.min(at_lower.min(at_upper));
                    hi = hi.max(at_lower.max(at_upper));
                }
            });
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}

impl ConvexSet for BoxWithEquality {
    fn project(&self, point: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.bounds.check_len(&point)?;
        let tolerance = 1e-9 * (1.0 + self.offset.abs());

        let Some((mut lo, mut hi)) = self.breakpoints(&point) else {
            // Zero normal: the hyperplane is everything or nothing
            if self.offset.abs() > tolerance {
                return Err(SVMError::InfeasibleConstraints(
                    "zero normal with non-zero offset".to_string(),
                ));
            }
            return Ok(self.bounds.clip(point));
        };

        // The residual does not increase with μ
        let mut r_lo = self.shifted_residual(&point, lo);
        let mut r_hi = self.shifted_residual(&point, hi);
        if r_lo < -tolerance || r_hi > tolerance {
            return Err(SVMError::InfeasibleConstraints(format!(
                "hyperplane offset {} is outside the range reachable inside the box",
                self.offset
            )));
        }
        if r_lo <= 0.0 {
            return Ok(self.shifted(&point, lo));
        }
        if r_hi >= 0.0 {
            return Ok(self.shifted(&point, hi));
        }

        for _ in 0..MAX_BISECTIONS {
            if hi - lo <= f64::EPSILON * (1.0 + lo.abs().max(hi.abs())) {
                break;
            }
            let mid = 0.5 * (lo + hi);
            let r_mid = self.shifted_residual(&point, mid);
            if r_mid > 0.0 {
                lo = mid;
                r_lo = r_mid;
            } else if r_mid < 0.0 {
                hi = mid;
                r_hi = r_mid;
            } else {
                return Ok(self.shifted(&point, mid));
            }
        }

        let mu = lo + r_lo * (hi - lo) / (r_lo - r_hi);
        Ok(self.shifted(&point, mu))
    }

    fn contains(&self, point: ArrayView1<f64>, tolerance: f64) -> bool {
        self.bounds.contains(point, tolerance) && self.residual(point).abs() <= tolerance
    }
}
