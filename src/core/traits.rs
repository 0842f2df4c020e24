//! Core traits for SVM implementation

use crate::core::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Binary classifier contract shared by the SVM and baseline estimators
pub trait Classifier {
    /// Fit the classifier on samples `x` (rows) with labels `y`
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()>;

    /// Predict a label for every row of `x`
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}

/// Classifier that can also report the probability of the positive class.
///
/// One-vs-rest baselines built on external estimators are expected to
/// implement this; the SVM itself only provides hard labels.
pub trait ProbabilisticClassifier: Classifier {
    /// Probability of the positive class for every row of `x`
    fn predict_probability(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}
