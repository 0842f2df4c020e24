//! Dual problem driver
//!
//! Maximises the dual objective W(a) by minimising -W(a) over
//!
//! ```text
//! 0 ≤ a_i ≤ C   for all i
//! Σ a_i y_i = 0
//! ```
//!
//! starting from a = 0.

use crate::core::{ConvergenceWarning, Result, SVMError, SolverStatus, SvmConfig};
use crate::kernel::Kernel;
use crate::objective::DualObjective;
use crate::optim::{BoxConstraint, BoxWithEquality, Objective, SpectralProjectedGradient};
use log::{debug, info, warn};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::sync::Arc;

/// Minimisation view of the dual: f(a) = -W(a)
struct NegatedDual<'a>(&'a DualObjective);

impl Objective for NegatedDual<'_> {
    fn value(&self, a: ArrayView1<f64>) -> f64 {
        -self.0.value(a)
    }

    fn gradient(&self, a: ArrayView1<f64>) -> Array1<f64> {
        -self.0.gradient(a)
    }
}

/// Optimal multipliers and solve diagnostics
#[derive(Debug, Clone)]
pub struct DualSolution {
    /// Lagrange multipliers, one per training sample
    pub alpha: Array1<f64>,
    /// Dual objective W(alpha)
    pub objective_value: f64,
    /// Number of solver iterations
    pub iterations: usize,
    /// Projected gradient norm at the returned multipliers
    pub projected_gradient_norm: f64,
    /// Termination reason
    pub status: SolverStatus,
    /// Present when the solver stopped before reaching its tolerance
    pub warning: Option<ConvergenceWarning>,
    /// Dual objective after every solver iteration
    pub history: Vec<f64>,
}

impl DualSolution {
    /// Σ alpha_i y_i, zero for a feasible solution
    pub fn equality_residual(&self, y: ArrayView1<f64>) -> f64 {
        self.alpha.dot(&y)
    }
}

/// Solver for the SVM dual with box and equality constraints
pub struct DualSolver<K: Kernel> {
    kernel: Arc<K>,
    config: SvmConfig,
}

impl<K: Kernel> DualSolver<K> {
    /// Create a new dual solver with the given kernel and configuration
    pub fn new(kernel: Arc<K>, config: SvmConfig) -> Self {
        Self { kernel, config }
    }

    pub fn config(&self) -> &SvmConfig {
        &self.config
    }

    /// Solve the dual problem for samples `x` (rows) and labels `y`
    pub fn solve(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<DualSolution> {
        self.config.validate()?;
        validate_training_set(x, y)?;

        let n = y.len();
        debug!(
            "Solving dual problem: {} samples, {} features, {} kernel, C = {}",
            n,
            x.ncols(),
            self.kernel.name(),
            self.config.c
        );

        let dual = DualObjective::new(x, y, self.kernel.as_ref())?;
        let feasible = BoxWithEquality::new(
            BoxConstraint::uniform(n, 0.0, self.config.c)?,
            y.to_owned(),
            0.0,
        )?;
        let solver =
            SpectralProjectedGradient::new(self.config.max_iterations, self.config.epsilon);

        let outcome = solver.minimize(&NegatedDual(&dual), &feasible, Array1::zeros(n))?;

        let warning = if outcome.status.is_converged() {
            None
        } else {
            let warning = ConvergenceWarning {
                iterations: outcome.iterations,
                projected_gradient_norm: outcome.projected_gradient_norm,
                tolerance: solver.tolerance(),
            };
            warn!("{} ({:?})", warning, outcome.status);
            Some(warning)
        };

        info!(
            "Dual solve finished: {:?} after {} iterations, objective = {:.6}",
            outcome.status, outcome.iterations, -outcome.value
        );

        // Steps are convex combinations, so only rounding can leave the box
        let c = self.config.c;
        let alpha = outcome.solution.mapv(|a| a.clamp(0.0, c));

        Ok(DualSolution {
            alpha,
            objective_value: -outcome.value,
            iterations: outcome.iterations,
            projected_gradient_norm: outcome.projected_gradient_norm,
            status: outcome.status,
            warning,
            history: outcome.history.into_iter().map(|f| -f).collect(),
        })
    }
}

/// Reject empty sets, mismatched lengths and labels outside {-1, +1}
pub(crate) fn validate_training_set(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
    if x.nrows() == 0 || y.is_empty() {
        return Err(SVMError::EmptyDataset);
    }
    if x.nrows() != y.len() {
        return Err(SVMError::ShapeMismatch {
            context: "training labels",
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    if x.ncols() == 0 {
        return Err(SVMError::InvalidParameter(
            "Samples must have at least one feature".to_string(),
        ));
    }
    if let Some(&label) = y.iter().find(|&&label| label != 1.0 && label != -1.0) {
        return Err(SVMError::InvalidLabel(label));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{GaussianKernel, LinearKernel};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, s};

    fn solver<K: Kernel>(kernel: K, config: SvmConfig) -> DualSolver<K> {
        DualSolver::new(Arc::new(kernel), config)
    }

    #[test]
    fn test_two_point_solution() {
        // W(t, t) = 2t - 4t² peaks at t = 0.25
        let x = array![[1.0, 1.0], [-1.0, -1.0]];
        let y = array![1.0, -1.0];
        let solution = solver(LinearKernel, SvmConfig::default())
            .solve(x.view(), y.view())
            .expect("solve should succeed");

        assert!(solution.status.is_converged());
        assert!(solution.warning.is_none());
        assert_abs_diff_eq!(solution.alpha[0], 0.25, epsilon = 1e-8);
        assert_abs_diff_eq!(solution.alpha[1], 0.25, epsilon = 1e-8);
        assert_abs_diff_eq!(solution.objective_value, 0.25, epsilon = 1e-10);
    }

    #[test]
    fn test_constraints_hold() {
        let x = array![
            [2.0, 1.0],
            [1.5, 2.5],
            [0.2, 0.1],
            [-0.3, 0.4],
            [-1.0, -2.0],
            [-2.5, -0.5]
        ];
        let y = array![1.0, 1.0, -1.0, 1.0, -1.0, -1.0];
        let config = SvmConfig {
            c: 0.5,
            ..SvmConfig::default()
        };

        for kernel in [GaussianKernel::new(0.5), GaussianKernel::new(2.0)] {
            let solution = solver(kernel, config.clone())
                .solve(x.view(), y.view())
                .expect("solve should succeed");
            assert!(solution.alpha.iter().all(|&a| a >= 0.0 && a <= config.c));
            assert_abs_diff_eq!(solution.equality_residual(y.view()), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_box_constraint_is_active_on_overlapping_classes() {
        // Identical points with opposite labels can only be reconciled by
        // pushing both multipliers to the upper bound
        let x = array![[0.0, 0.0], [0.0, 0.0], [3.0, 3.0], [-3.0, -3.0]];
        let y = array![1.0, -1.0, 1.0, -1.0];
        let config = SvmConfig {
            c: 0.1,
            ..SvmConfig::default()
        };
        let solution = solver(LinearKernel, config)
            .solve(x.view(), y.view())
            .expect("solve should succeed");

        assert_abs_diff_eq!(solution.alpha[0], 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.alpha[1], 0.1, epsilon = 1e-9);
        assert!(solution.alpha.iter().all(|&a| a <= 0.1 + 1e-12));
    }

    #[test]
    fn test_objective_history_is_monotone() {
        let x = array![
            [1.0, 2.0],
            [2.0, 1.0],
            [2.5, 2.5],
            [-1.0, -1.5],
            [-2.0, -0.5],
            [-1.5, -2.5]
        ];
        let y = array![1.0, 1.0, 1.0, -1.0, -1.0, -1.0];
        let solution = solver(LinearKernel, SvmConfig::default())
            .solve(x.view(), y.view())
            .expect("solve should succeed");

        assert!(!solution.history.is_empty());
        for pair in solution.history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(solution.history.last().copied(), Some(solution.objective_value));
    }

    #[test]
    fn test_iteration_budget_reports_warning() {
        let x = array![
            [1.0, 2.0],
            [2.0, 1.0],
            [2.5, 2.5],
            [-1.0, -1.5],
            [-2.0, -0.5],
            [-1.5, -2.5]
        ];
        let y = array![1.0, 1.0, 1.0, -1.0, -1.0, -1.0];
        let config = SvmConfig {
            max_iterations: 1,
            epsilon: 1e-14,
            ..SvmConfig::default()
        };
        let solution = solver(GaussianKernel::default(), config)
            .solve(x.view(), y.view())
            .expect("non-convergence is not fatal");

        assert_eq!(solution.status, SolverStatus::MaxIterations);
        let warning = solution.warning.expect("warning should be attached");
        assert_eq!(warning.iterations, 1);
        assert_eq!(warning.tolerance, 1e-14);
    }

    #[test]
    fn test_input_validation() {
        let solver = solver(LinearKernel, SvmConfig::default());
        let x = array![[1.0], [2.0]];

        assert!(matches!(
            solver.solve(x.view(), array![1.0].view()),
            Err(SVMError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            solver.solve(x.view(), array![1.0, 0.0].view()),
            Err(SVMError::InvalidLabel(l)) if l == 0.0
        ));
        assert!(matches!(
            solver.solve(x.slice(s![0..0, ..]), Array1::<f64>::zeros(0).view()),
            Err(SVMError::EmptyDataset)
        ));

        let bad_config = DualSolver::new(
            Arc::new(LinearKernel),
            SvmConfig {
                c: -1.0,
                ..SvmConfig::default()
            },
        );
        assert!(matches!(
            bad_config.solve(x.view(), array![1.0, -1.0].view()),
            Err(SVMError::InvalidParameter(_))
        ));
    }
}
