//! High-level API for Support Vector Machine operations
//!
//! This module provides the estimator used for training, prediction and
//! evaluation.
//!
//! # Quick Start
//!
//! ```rust
//! use dualsvm::api::SVM;
//! use dualsvm::kernel::GaussianKernel;
//! use ndarray::array;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let x = array![[2.0, 2.0], [1.5, 2.5], [-2.0, -2.0], [-2.5, -1.5]];
//! let y = array![1.0, 1.0, -1.0, -1.0];
//!
//! let mut svm = SVM::with_kernel(GaussianKernel::new(1.0)).with_c(10.0);
//! svm.fit(x.view(), y.view())?;
//!
//! let labels = svm.predict(array![[3.0, 1.0]].view())?;
//! assert_eq!(labels[0], 1.0);
//! println!("Accuracy: {:.2}%", svm.score(x.view(), y.view())? * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{Classifier, ConvergenceWarning, Prediction, Result, SVMError, SvmConfig};
use crate::kernel::{Kernel, LinearKernel};
use crate::model::TrainedSVM;
use crate::solver::dual::validate_training_set;
use crate::solver::DualSolver;
use log::{debug, info};
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};
use std::sync::Arc;

/// SVM estimator with builder pattern
pub struct SVM<K: Kernel = LinearKernel> {
    kernel: Arc<K>,
    config: SvmConfig,
    model: Option<TrainedSVM<K>>,
}

impl SVM<LinearKernel> {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(LinearKernel::new())
    }
}

impl Default for SVM<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> SVM<K> {
    /// Create SVM with custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config: SvmConfig::default(),
            model: None,
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set maximum number of iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the multiplier threshold that marks support vectors
    pub fn with_support_threshold(mut self, threshold: f64) -> Self {
        self.config.support_threshold = threshold;
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: SvmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SvmConfig {
        &self.config
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Train on samples `x` (rows) with labels in {-1, +1}.
    ///
    /// Invalid input is rejected before anything changes. Once the solver
    /// runs, the previous model is discarded; if no support vector survives
    /// the estimator stays unfit.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<&mut Self> {
        self.config.validate()?;
        validate_training_set(x, y)?;

        self.model = None;
        let solver = DualSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let solution = solver.solve(x, y)?;
        let model = TrainedSVM::from_solution(
            Arc::clone(&self.kernel),
            x,
            y,
            solution,
            self.config.support_threshold,
        )?;

        info!(
            "Trained {} SVM: {} support vectors out of {} samples, bias = {:.6}",
            self.kernel.name(),
            model.n_support_vectors(),
            x.nrows(),
            model.bias()
        );
        self.model = Some(model);
        Ok(self)
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The trained model, or `ModelNotTrained`
    pub fn model(&self) -> Result<&TrainedSVM<K>> {
        self.model.as_ref().ok_or(SVMError::ModelNotTrained)
    }

    /// Consume the estimator, keeping only the trained model
    pub fn into_model(self) -> Result<TrainedSVM<K>> {
        self.model.ok_or(SVMError::ModelNotTrained)
    }

    /// Warning attached by the last fit if the solver stopped early
    pub fn convergence_warning(&self) -> Option<&ConvergenceWarning> {
        self.model.as_ref().and_then(|m| m.convergence_warning())
    }

    /// Decision values for every row of `x`
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.model()?.decision_function(x)
    }

    /// Predicted labels for every row of `x`
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        self.model()?.predict(x)
    }

    /// Labels together with decision values
    pub fn predict_detailed(&self, x: ArrayView2<f64>) -> Result<Vec<Prediction>> {
        self.model()?.predict_detailed(x)
    }

    /// Mean accuracy on `(x, y)`
    pub fn score(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<f64> {
        Ok(self.evaluate_detailed(x, y)?.accuracy())
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
    ) -> Result<EvaluationMetrics> {
        let model = self.model()?;
        validate_training_set(x, y)?;
        let predictions = model.predict(x)?;

        let mut metrics = EvaluationMetrics::new(0, 0, 0, 0);
        Zip::from(&predictions).and(&y).for_each(|&pred, &actual| {
            match (pred > 0.0, actual > 0.0) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        });
        debug!("Evaluated {} samples: {:?}", y.len(), metrics);
        Ok(metrics)
    }
}

impl<K: Kernel> Classifier for SVM<K> {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        SVM::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        SVM::predict(self, x)
    }
}

/// Detailed evaluation metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(
            self.true_negatives,
            self.true_negatives + self.false_positives,
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
