//! Dual objective of the soft-margin SVM
//!
//! For multipliers `a`, labels `y` and kernel matrix `K` the dual objective is
//!
//! ```text
//! W(a) = Σ a_i - ½ Σ_i Σ_j a_i a_j y_i y_j K_ij = 1ᵀa - ½ aᵀ Q a,   Q = K ⊙ yyᵀ
//! ```
//!
//! `Q` is built once per training set so repeated evaluations during the
//! solve are a single matrix-vector product.

use crate::core::{Result, SVMError};
use crate::kernel::Kernel;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Evaluator for the dual objective over a fixed training set
#[derive(Debug, Clone)]
pub struct DualObjective {
    /// Label-signed kernel matrix Q = K ⊙ yyᵀ
    q: Array2<f64>,
}

impl DualObjective {
    /// Build the evaluator by computing the kernel matrix of `x` with itself
    pub fn new<K: Kernel + ?Sized>(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        kernel: &K,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(SVMError::ShapeMismatch {
                context: "dual objective",
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        let k = kernel.matrix(x, x)?;
        Self::from_kernel_matrix(k, y)
    }

    /// Build the evaluator from a precomputed n × n kernel matrix
    pub fn from_kernel_matrix(k: Array2<f64>, y: ArrayView1<f64>) -> Result<Self> {
        let n = y.len();
        if k.nrows() != n || k.ncols() != n {
            return Err(SVMError::ShapeMismatch {
                context: "kernel matrix",
                expected: n,
                actual: if k.nrows() != n { k.nrows() } else { k.ncols() },
            });
        }

        let yy = &y.insert_axis(Axis(1)) * &y.insert_axis(Axis(0));
        Ok(Self { q: k * yy })
    }

    /// Number of multipliers
    pub fn len(&self) -> usize {
        self.q.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// The label-signed kernel matrix Q
    pub fn hessian(&self) -> &Array2<f64> {
        &self.q
    }

    /// Objective value W(a) = Σa - ½ aᵀQa
    pub fn value(&self, a: ArrayView1<f64>) -> f64 {
        a.sum() - 0.5 * a.dot(&self.q.dot(&a))
    }

    /// Gradient ∇W(a) = 1 - Qa
    pub fn gradient(&self, a: ArrayView1<f64>) -> Array1<f64> {
        self.q.dot(&a).mapv(|qa| 1.0 - qa)
    }
}

/// Dual objective value for multipliers `a` on the training set `(x, y)`
pub fn objective<K: Kernel + ?Sized>(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    a: ArrayView1<f64>,
    kernel: &K,
) -> Result<f64> {
    if a.len() != y.len() {
        return Err(SVMError::ShapeMismatch {
            context: "dual objective multipliers",
            expected: y.len(),
            actual: a.len(),
        });
    }
    Ok(DualObjective::new(x, y, kernel)?.value(a))
}
