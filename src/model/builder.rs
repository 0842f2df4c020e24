//! Turns optimal multipliers into a usable decision function

use crate::core::{Result, SVMError};
use crate::kernel::Kernel;
use crate::model::{DecisionFunction, SupportSet};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Support set, decision representation and bias derived from a dual solution
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParts {
    pub support: SupportSet,
    pub decision: DecisionFunction,
    pub bias: f64,
}

/// Build the decision function from multipliers `alpha`.
///
/// The linear kernel gets an explicit weight vector; every other kernel keeps
/// the support vectors and evaluates the kernel expansion. The bias is the
/// mean of `y_i - f(x_i)` over the support vectors.
pub fn build<K: Kernel + ?Sized>(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    alpha: ArrayView1<f64>,
    kernel: &K,
    threshold: f64,
) -> Result<ModelParts> {
    for (context, len) in [("model labels", y.len()), ("model multipliers", alpha.len())] {
        if len != x.nrows() {
            return Err(SVMError::ShapeMismatch {
                context,
                expected: x.nrows(),
                actual: len,
            });
        }
    }

    let support = SupportSet::select(x, y, alpha, threshold)?;

    let decision = if kernel.is_linear() {
        DecisionFunction::Linear {
            weights: linear_weights(x, y, alpha),
        }
    } else {
        DecisionFunction::KernelExpansion
    };

    let margins = decision.raw_values(&support, kernel, support.vectors.view())?;
    let bias = (&support.labels - &margins)
        .mean()
        .ok_or(SVMError::DegenerateSolution { threshold })?;

    Ok(ModelParts {
        support,
        decision,
        bias,
    })
}

/// w = Σ alpha_i y_i x_i over all training samples
pub fn linear_weights(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    alpha: ArrayView1<f64>,
) -> Array1<f64> {
    x.t().dot(&(&alpha * &y))
}
