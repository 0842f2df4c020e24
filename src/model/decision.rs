//! Decision function representations

use crate::core::{Result, SVMError};
use crate::kernel::Kernel;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Training samples with non-zero multipliers
#[derive(Debug, Clone, PartialEq)]
pub struct SupportSet {
    /// Indices into the training set
    pub indices: Vec<usize>,
    /// Support vectors, one per row
    pub vectors: Array2<f64>,
    /// Multipliers of the support vectors
    pub alpha: Array1<f64>,
    /// Labels of the support vectors
    pub labels: Array1<f64>,
}

impl SupportSet {
    /// Keep the samples whose multiplier exceeds `threshold`
    pub fn select(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        alpha: ArrayView1<f64>,
        threshold: f64,
    ) -> Result<Self> {
        let indices: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > threshold { Some(i) } else { None })
            .collect();

        if indices.is_empty() {
            return Err(SVMError::DegenerateSolution { threshold });
        }

        Ok(Self {
            vectors: x.select(Axis(0), &indices),
            alpha: alpha.select(Axis(0), &indices),
            labels: y.select(Axis(0), &indices),
            indices,
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// alpha_i * y_i for every support vector
    pub fn dual_coefficients(&self) -> Array1<f64> {
        &self.alpha * &self.labels
    }

    /// Σ_i alpha_i y_i K(sv_i, x) for every row x of `x`, without bias
    pub fn expansion<K: Kernel + ?Sized>(
        &self,
        kernel: &K,
        x: ArrayView2<f64>,
    ) -> Result<Array1<f64>> {
        Ok(kernel.matrix(x, self.vectors.view())?.dot(&self.dual_coefficients()))
    }
}

/// How decision values are computed for new samples
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionFunction {
    /// Explicit weight vector w = Σ alpha_i y_i x_i; only valid for the linear kernel
    Linear { weights: Array1<f64> },
    /// Kernel expansion over the support set
    KernelExpansion,
}

impl DecisionFunction {
    /// Weight vector, if the representation has one
    pub fn weights(&self) -> Option<&Array1<f64>> {
        match self {
            DecisionFunction::Linear { weights } => Some(weights),
            DecisionFunction::KernelExpansion => None,
        }
    }

    /// Decision values without bias
    pub fn raw_values<K: Kernel + ?Sized>(
        &self,
        support: &SupportSet,
        kernel: &K,
        x: ArrayView2<f64>,
    ) -> Result<Array1<f64>> {
        match self {
            DecisionFunction::Linear { weights } => {
                if x.ncols() != weights.len() {
                    return Err(SVMError::ShapeMismatch {
                        context: "decision function",
                        expected: weights.len(),
                        actual: x.ncols(),
                    });
                }
                Ok(x.dot(weights))
            }
            DecisionFunction::KernelExpansion => support.expansion(kernel, x),
        }
    }
}
