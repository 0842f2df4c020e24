//! Trained SVM models
//!
//! [`builder::build`] derives the support set, decision representation and
//! bias from the optimal multipliers; [`TrainedSVM`] owns that state and
//! evaluates it on new samples.

pub mod builder;
pub mod decision;

pub use self::builder::*;
pub use self::decision::*;

use crate::core::{label_for, ConvergenceWarning, Prediction, Result, SVMError, SolverStatus};
use crate::kernel::Kernel;
use crate::solver::DualSolution;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Diagnostics of the solve that produced a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub status: SolverStatus,
    pub iterations: usize,
    pub objective_value: f64,
    pub warning: Option<ConvergenceWarning>,
}

impl From<&DualSolution> for FitSummary {
    fn from(solution: &DualSolution) -> Self {
        Self {
            status: solution.status,
            iterations: solution.iterations,
            objective_value: solution.objective_value,
            warning: solution.warning.clone(),
        }
    }
}

/// A trained SVM model that can make predictions
pub struct TrainedSVM<K: Kernel> {
    kernel: Arc<K>,
    support: SupportSet,
    decision: DecisionFunction,
    bias: f64,
    dual_coefficients: Array1<f64>,
    n_features: usize,
    summary: FitSummary,
}

impl<K: Kernel> TrainedSVM<K> {
    /// Build a model from the dual solution of `(x, y)`
    pub(crate) fn from_solution(
        kernel: Arc<K>,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        solution: DualSolution,
        threshold: f64,
    ) -> Result<Self> {
        let parts = build(x, y, solution.alpha.view(), kernel.as_ref(), threshold)?;
        let summary = FitSummary::from(&solution);
        Ok(Self::from_parts(
            kernel,
            parts,
            solution.alpha,
            x.ncols(),
            summary,
        ))
    }

    pub(crate) fn from_parts(
        kernel: Arc<K>,
        parts: ModelParts,
        dual_coefficients: Array1<f64>,
        n_features: usize,
        summary: FitSummary,
    ) -> Self {
        Self {
            kernel,
            support: parts.support,
            decision: parts.decision,
            bias: parts.bias,
            dual_coefficients,
            n_features,
            summary,
        }
    }

    fn check_features(&self, x: &ArrayView2<f64>) -> Result<()> {
        if x.ncols() != self.n_features {
            return Err(SVMError::ShapeMismatch {
                context: "prediction features",
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        Ok(())
    }

    /// Decision values f(x) = raw(x) + b for every row of `x`
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.check_features(&x)?;
        let raw = self
            .decision
            .raw_values(&self.support, self.kernel.as_ref(), x)?;
        Ok(raw + self.bias)
    }

    /// Decision values through the kernel expansion over the support set,
    /// whatever representation the model uses
    pub fn expansion_decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.check_features(&x)?;
        Ok(self.support.expansion(self.kernel.as_ref(), x)? + self.bias)
    }

    /// Predicted labels (+1 or -1); a decision value of exactly 0 gives +1
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(x)?.mapv(label_for))
    }

    /// Labels together with their decision values
    pub fn predict_detailed(&self, x: ArrayView2<f64>) -> Result<Vec<Prediction>> {
        Ok(self
            .decision_function(x)?
            .iter()
            .map(|&value| Prediction::from_decision(value))
            .collect())
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Get the support vectors, one per row
    pub fn support_vectors(&self) -> &Array2<f64> {
        &self.support.vectors
    }

    /// Get the alpha values for support vectors
    pub fn alpha_values(&self) -> &Array1<f64> {
        &self.support.alpha
    }

    /// Labels of the support vectors
    pub fn support_labels(&self) -> &Array1<f64> {
        &self.support.labels
    }

    /// Get the indices of support vectors in the original training set
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.support.indices
    }

    pub fn support_set(&self) -> &SupportSet {
        &self.support
    }

    /// Multipliers of all training samples
    pub fn dual_coefficients(&self) -> &Array1<f64> {
        &self.dual_coefficients
    }

    /// Weight vector; `None` unless the kernel is linear
    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.decision.weights()
    }

    pub fn decision(&self) -> &DecisionFunction {
        &self.decision
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn n_support_vectors(&self) -> usize {
        self.support.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    pub fn status(&self) -> SolverStatus {
        self.summary.status
    }

    pub fn objective_value(&self) -> f64 {
        self.summary.objective_value
    }

    pub fn convergence_warning(&self) -> Option<&ConvergenceWarning> {
        self.summary.warning.as_ref()
    }
}
