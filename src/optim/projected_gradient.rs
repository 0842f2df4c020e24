//! Spectral projected gradient method
//!
//! Minimises a smooth f over a convex set C:
//!
//! ```text
//! d_k     = P_C(x_k - λ_k ∇f(x_k)) - x_k
//! x_k+1   = x_k + t_k d_k              (Armijo backtracking on t_k)
//! λ_k+1   = sᵀs / sᵀy                  (Barzilai-Borwein, safeguarded)
//! ```
//!
//! Iterates stay feasible because every step is a convex combination of two
//! points of C, and the objective never increases between accepted steps.

use crate::core::{Result, SolverStatus};
use crate::optim::{ConvexSet, Objective, OptimizationOutcome};
use log::trace;
use ndarray::{Array1, ArrayView1};

/// Projected gradient solver with Barzilai-Borwein step lengths
#[derive(Debug, Clone)]
pub struct SpectralProjectedGradient {
    max_iterations: usize,
    tolerance: f64,
    sufficient_decrease: f64,
    backtracking: f64,
    max_backtracks: usize,
    min_step: f64,
    max_step: f64,
}

impl SpectralProjectedGradient {
    /// Create a solver with an iteration cap and a projected gradient tolerance
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            sufficient_decrease: 1e-4,
            backtracking: 0.5,
            max_backtracks: 60,
            min_step: 1e-10,
            max_step: 1e10,
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Minimise `objective` over `set` starting from the projection of `x0`
    pub fn minimize<F, C>(
        &self,
        objective: &F,
        set: &C,
        x0: Array1<f64>,
    ) -> Result<OptimizationOutcome>
    where
        F: Objective + ?Sized,
        C: ConvexSet + ?Sized,
    {
        let mut x = set.project(x0.view())?;
        let mut fx = objective.value(x.view());
        let mut gradient = objective.gradient(x.view());
        let mut pg_norm = projected_gradient_norm(set, &x, &gradient)?;

        let mut step = if pg_norm > 0.0 {
            (1.0 / pg_norm).clamp(self.min_step, self.max_step)
        } else {
            1.0
        };
        let mut history = Vec::new();
        let mut iterations = 0;

        let status = loop {
            if pg_norm <= self.tolerance {
                break SolverStatus::Converged;
            }
            if iterations >= self.max_iterations {
                break SolverStatus::MaxIterations;
            }

            let trial = &x - &(&gradient * step);
            let direction = set.project(trial.view())? - &x;
            let slope = gradient.dot(&direction);
            if slope >= 0.0 {
                break SolverStatus::LineSearchFailed;
            }

            let Some((x_new, f_new)) = self.backtrack(objective, &x, fx, &direction, slope)
            else {
                break SolverStatus::LineSearchFailed;
            };

            let gradient_new = objective.gradient(x_new.view());
            let s = &x_new - &x;
            let y = &gradient_new - &gradient;
            let sy = s.dot(&y);
            step = if sy > 0.0 {
                (s.dot(&s) / sy).clamp(self.min_step, self.max_step)
            } else {
                self.max_step
            };

            x = x_new;
            fx = f_new;
            gradient = gradient_new;
            pg_norm = projected_gradient_norm(set, &x, &gradient)?;
            history.push(fx);
            iterations += 1;

            trace!(
                "iteration {}: f = {:.6e}, projected gradient = {:.3e}, next step = {:.3e}",
                iterations,
                fx,
                pg_norm,
                step
            );
        };

        Ok(OptimizationOutcome {
            solution: x,
            value: fx,
            iterations,
            projected_gradient_norm: pg_norm,
            status,
            history,
        })
    }

    /// Armijo backtracking along a feasible direction
    fn backtrack<F: Objective + ?Sized>(
        &self,
        objective: &F,
        x: &Array1<f64>,
        fx: f64,
        direction: &Array1<f64>,
        slope: f64,
    ) -> Option<(Array1<f64>, f64)> {
        let mut t = 1.0;
        for _ in 0..self.max_backtracks {
            let candidate = x + &(direction * t);
            let value = objective.value(candidate.view());
            if value <= fx + self.sufficient_decrease * t * slope {
                return Some((candidate, value));
            }
            t *= self.backtracking;
        }
        None
    }
}

/// ||P(x - g) - x||∞, zero exactly at stationary points
fn projected_gradient_norm<C: ConvexSet + ?Sized>(
    set: &C,
    x: &Array1<f64>,
    gradient: &Array1<f64>,
) -> Result<f64> {
    let moved = x - gradient;
    let projected = set.project(moved.view())?;
    Ok(max_abs_difference(projected.view(), x.view()))
}

fn max_abs_difference(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (p, q)| acc.max((p - q).abs()))
}
