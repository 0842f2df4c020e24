//! Kernel trait definition

use crate::core::{Result, SVMError};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for SVM.
/// Implementations provide the single-pair similarity and may override the
/// pairwise matrix form with a vectorised version.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y) for two vectors of equal length
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;

    /// Short identifier used in logs and saved models
    fn name(&self) -> &'static str;

    /// Whether K(x, y) is the plain dot product, so the decision function
    /// can be collapsed into an explicit weight vector
    fn is_linear(&self) -> bool {
        false
    }

    /// Compute K(x, y) after checking that the dimensions agree
    fn similarity(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        if x.len() != y.len() {
            return Err(SVMError::ShapeMismatch {
                context: "kernel similarity",
                expected: x.len(),
                actual: y.len(),
            });
        }
        Ok(self.compute(x, y))
    }

    /// Pairwise kernel matrix with entry (i, j) = K(a[i], b[j])
    fn matrix(&self, a: ArrayView2<f64>, b: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_feature_dims(&a, &b)?;
        Ok(Array2::from_shape_fn((a.nrows(), b.nrows()), |(i, j)| {
            self.compute(a.row(i), b.row(j))
        }))
    }
}

/// Ensure both operands of a kernel matrix share the feature dimension
pub(crate) fn check_feature_dims(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> Result<()> {
    if a.ncols() != b.ncols() {
        return Err(SVMError::ShapeMismatch {
            context: "kernel matrix",
            expected: a.ncols(),
            actual: b.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Polynomial kernel relying on the default matrix implementation
    struct QuadraticKernel;

    impl Kernel for QuadraticKernel {
        fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
            (x.dot(&y) + 1.0).powi(2)
        }

        fn name(&self) -> &'static str {
            "quadratic"
        }
    }

    #[test]
    fn test_default_matrix() {
        let a = array![[1.0, 0.0], [0.0, 2.0]];
        let b = array![[1.0, 1.0], [0.0, 0.0], [2.0, 0.0]];
        let k = QuadraticKernel.matrix(a.view(), b.view()).expect("same dims");

        assert_eq!(k.dim(), (2, 3));
        assert_eq!(k[[0, 0]], 4.0);
        assert_eq!(k[[0, 1]], 1.0);
        assert_eq!(k[[1, 0]], 9.0);
        assert_eq!(k[[1, 2]], 1.0);
        assert!(!QuadraticKernel.is_linear());
    }

    #[test]
    fn test_dimension_checks() {
        let a = array![[1.0, 0.0]];
        let b = array![[1.0, 0.0, 3.0]];
        assert!(matches!(
            QuadraticKernel.matrix(a.view(), b.view()),
            Err(SVMError::ShapeMismatch {
                expected: 2,
                actual: 3,
                ..
            })
        ));
        assert!(QuadraticKernel.similarity(a.row(0), b.row(0)).is_err());
        assert_eq!(
            QuadraticKernel
                .similarity(a.row(0), a.row(0))
                .expect("same dims"),
            4.0
        );
    }
}
