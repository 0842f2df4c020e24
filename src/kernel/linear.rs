//! Linear kernel implementation

use crate::core::Result;
use crate::kernel::traits::check_feature_dims;
use crate::kernel::Kernel;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Linear kernel: K(x, y) = x^T * y
///
/// The kernel matrix of two sample matrices is the plain product A * B^T.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.dot(&y)
    }

    fn name(&self) -> &'static str {
        "linear"
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn matrix(&self, a: ArrayView2<f64>, b: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_feature_dims(&a, &b)?;
        Ok(a.dot(&b.t()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SVMError;
    use ndarray::array;

    #[test]
    fn test_linear_kernel_basic() {
        let kernel = LinearKernel::new();
        let x = array![1.0, 0.0, 2.0, 0.0, 3.0];
        let y = array![0.0, 1.0, 2.0, 3.0, 0.0];

        // Only index 2 overlaps: 2.0 * 2.0 = 4.0
        assert_eq!(kernel.compute(x.view(), y.view()), 4.0);
    }

    #[test]
    fn test_linear_kernel_identical() {
        let kernel = LinearKernel::new();
        let x = array![1.0, 2.0, 3.0];

        // x^T * x = 1^2 + 2^2 + 3^2 = 14
        assert_eq!(kernel.compute(x.view(), x.view()), 14.0);
    }

    #[test]
    fn test_linear_kernel_symmetry() {
        let kernel = LinearKernel::new();
        let x = array![0.3, -1.7, 2.25];
        let y = array![4.0, 0.125, -3.5];
        assert_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view())
        );
    }

    #[test]
    fn test_linear_kernel_matrix() {
        let kernel = LinearKernel::new();
        let a = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let b = array![[1.0, 0.0], [0.0, 1.0]];

        let k = kernel.matrix(a.view(), b.view()).expect("same dims");
        assert_eq!(k, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

        let gram = kernel.matrix(a.view(), a.view()).expect("same dims");
        assert_eq!(gram.dim(), (3, 3));
        assert_eq!(gram[[0, 1]], 11.0);
        assert_eq!(gram[[1, 0]], 11.0);
        assert_eq!(gram[[2, 2]], 61.0);
    }

    #[test]
    fn test_linear_kernel_shape_error() {
        let kernel = LinearKernel::new();
        let a = array![[1.0, 2.0]];
        let b = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            kernel.matrix(a.view(), b.view()),
            Err(SVMError::ShapeMismatch { .. })
        ));
    }
}
