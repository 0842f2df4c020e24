//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-||x - y||² / (2σ²))
//! where σ (sigma) is the bandwidth that controls the kernel width.

use crate::core::{Result, SVMError};
use crate::kernel::traits::check_feature_dims;
use crate::kernel::Kernel;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

/// Gaussian kernel: K(x, y) = exp(-||x - y||² / (2σ²))
///
/// Values lie in (0, 1] and equal 1 exactly when both inputs coincide.
/// The bandwidth controls the reach of each training example:
/// - Small sigma: only close points are similar (potential overfitting)
/// - Large sigma: distant points still interact (potential underfitting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GaussianParams")]
pub struct GaussianKernel {
    sigma: f64,
}

/// Unchecked form read from model files
#[derive(Deserialize)]
struct GaussianParams {
    sigma: f64,
}

impl TryFrom<GaussianParams> for GaussianKernel {
    type Error = SVMError;

    fn try_from(params: GaussianParams) -> Result<Self> {
        Self::try_new(params.sigma)
    }
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with the given bandwidth
    ///
    /// # Panics
    /// Panics if sigma is not positive and finite
    pub fn new(sigma: f64) -> Self {
        assert!(
            sigma.is_finite() && sigma > 0.0,
            "Sigma must be positive, got: {}",
            sigma
        );
        Self { sigma }
    }

    /// Fallible counterpart of [`GaussianKernel::new`]
    pub fn try_new(sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Sigma must be positive, got: {}",
                sigma
            )));
        }
        Ok(Self { sigma })
    }

    /// Get the bandwidth parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Equivalent gamma = 1 / (2σ²) of the exp(-γ||x - y||²) parameterisation
    pub fn gamma(&self) -> f64 {
        1.0 / (2.0 * self.sigma * self.sigma)
    }

    fn from_squared_distance(&self, distance_sq: f64) -> f64 {
        (-distance_sq / (2.0 * self.sigma * self.sigma)).exp()
    }
}

impl Default for GaussianKernel {
    /// Default Gaussian kernel with sigma = 0.5
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let distance_sq = (&x - &y).mapv(|d| d * d).sum();
        self.from_squared_distance(distance_sq)
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }

    /// Each row of `a` is broadcast against all rows of `b` at once, so the
    /// squared distances are exact differences rather than the
    /// ||x||² + ||y||² - 2x·y expansion. This keeps K(X, X) exactly symmetric
    /// with a unit diagonal.
    fn matrix(&self, a: ArrayView2<f64>, b: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_feature_dims(&a, &b)?;

        let mut k = Array2::zeros((a.nrows(), b.nrows()));
        Zip::from(k.rows_mut())
            .and(a.rows())
            .for_each(|mut k_row, a_row| {
                let distances_sq = (&b - &a_row).mapv(|d| d * d).sum_axis(Axis(1));
                k_row.assign(&distances_sq.mapv(|d| self.from_squared_distance(d)));
            });
        Ok(k)
    }
}
