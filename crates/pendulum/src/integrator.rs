//! # Adaptive ODE Integration
//!
//! [`AdaptiveSolver`] drives the `rkf78` Runge–Kutta–Fehlberg 7(8) pair over
//! one interval at a time and keeps only the endpoint. It owns what the
//! frame loop needs on top of the raw solver: a step-size hint carried from
//! one interval to the next, a check that the endpoint is finite, and the
//! translation of solver errors into [`PendulumError::IntegrationFailure`].

use std::fmt;

use rkf78::{IntegrationConfig, IntegrationError, OdeSystem, Rkf78, StepObserver, Tolerances};

use crate::error::{FailureReason, PendulumError, Result};

/// Tolerances and guards for [`AdaptiveSolver`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverOptions {
    /// Relative tolerance on each state component
    pub rtol: f64,
    /// Absolute tolerance on each state component
    pub atol: f64,
    /// Sub-step budget for a single `integrate` call, rejected attempts included
    pub max_steps: usize,
    /// Smallest sub-step error control may request before the call fails
    pub min_step: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-9,
            atol: 1e-9,
            max_steps: 100_000,
            min_step: 1e-12,
        }
    }
}

/// Cumulative work counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted_steps: u64,
    pub rejected_steps: u64,
    pub fn_evals: u64,
}

impl From<rkf78::Stats> for SolverStats {
    fn from(stats: rkf78::Stats) -> Self {
        Self {
            accepted_steps: stats.accepted_steps,
            rejected_steps: stats.rejected_steps,
            fn_evals: stats.fn_evals,
        }
    }
}

/// Endpoint integrator for an `N`-state system.
///
/// Consecutive calls over short, equal intervals (one render frame each)
/// start from the largest step the previous call accepted instead of
/// rediscovering it.
#[derive(Clone)]
pub struct AdaptiveSolver<const N: usize> {
    options: SolverOptions,
    inner: Rkf78<f64, N>,
    step_hint: Option<f64>,
}

impl<const N: usize> AdaptiveSolver<N> {
    #[must_use]
    pub fn new(options: SolverOptions) -> Self {
        Self {
            options,
            inner: Rkf78::new(Tolerances::new(options.atol, options.rtol)),
            step_hint: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    #[must_use]
    pub fn stats(&self) -> SolverStats {
        self.inner.stats.into()
    }

    /// Forget the step-size hint and zero the counters.
    pub fn reset(&mut self) {
        self.inner.reset_stats();
        self.step_hint = None;
    }

    /// Integrate `system` from `(t0, y0)` to `t_end` and return the state at
    /// `t_end`.
    ///
    /// # Errors
    ///
    /// Returns [`PendulumError::IntegrationFailure`] when the state goes
    /// non-finite, the step size underflows `min_step`, the sub-step budget
    /// runs out, or the solver rejects its inputs. The reported time is the
    /// last time the solver reached. Statistics are kept, no partial result
    /// is returned.
    pub fn integrate<S>(
        &mut self,
        system: &S,
        t0: f64,
        y0: &[f64; N],
        t_end: f64,
    ) -> Result<[f64; N]>
    where
        S: OdeSystem<f64, N>,
    {
        let span = t_end - t0;
        if span <= 0.0 {
            return Ok(*y0);
        }

        let h0 = self.step_hint.map_or(span, |h| h.min(span));
        let config = IntegrationConfig::new(t0, t_end, h0)
            .with_h_min(self.options.min_step)
            .with_max_steps(u64::try_from(self.options.max_steps).unwrap_or(u64::MAX));

        let mut progress = Progress { t: t0, largest_step: 0.0 };
        let (t, y) = self
            .inner
            .integrate_with_observer(system, &config, y0, &mut progress)
            .map_err(|err| self.failure(err, progress.t))?;

        if !y.iter().all(|v| v.is_finite()) {
            return Err(failure(t, FailureReason::NonFiniteState));
        }
        if progress.largest_step > 0.0 {
            self.step_hint = Some(progress.largest_step);
        }
        Ok(y)
    }

    fn failure(&self, err: IntegrationError<f64>, last_t: f64) -> PendulumError {
        match err {
            IntegrationError::StepSizeTooSmall { t, h } => {
                failure(t, FailureReason::StepSizeUnderflow { step: h })
            }
            IntegrationError::MaxStepsExceeded => failure(
                last_t,
                FailureReason::StepLimitExceeded { limit: self.options.max_steps },
            ),
            IntegrationError::NonFiniteState { t } => failure(t, FailureReason::NonFiniteState),
            other => failure(last_t, FailureReason::Solver(other.to_string())),
        }
    }
}

impl<const N: usize> Default for AdaptiveSolver<N> {
    fn default() -> Self {
        Self::new(SolverOptions::default())
    }
}

impl<const N: usize> fmt::Debug for AdaptiveSolver<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveSolver")
            .field("options", &self.options)
            .field("stats", &self.stats())
            .field("step_hint", &self.step_hint)
            .finish()
    }
}

/// Tracks the last accepted time and the largest accepted step of one call.
struct Progress {
    t: f64,
    largest_step: f64,
}

impl<const N: usize> StepObserver<f64, N> for Progress {
    fn on_step(&mut self, t: f64, _y: &[f64; N], h: f64, _error: f64) {
        self.t = t;
        self.largest_step = self.largest_step.max(h.abs());
    }
}

fn failure(time: f64, reason: FailureReason) -> PendulumError {
    PendulumError::IntegrationFailure { time, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    struct HarmonicOscillator {
        omega: f64,
    }

    impl OdeSystem<f64, 2> for HarmonicOscillator {
        fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
            dydt[0] = y[1];
            dydt[1] = -self.omega * self.omega * y[0];
        }
    }

    /// y' = y², y(0) = 1 has the solution 1 / (1 - t), which blows up at t = 1.
    struct BlowUp;

    impl OdeSystem<f64, 1> for BlowUp {
        fn rhs(&self, _t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
            dydt[0] = y[0] * y[0];
        }
    }

    struct Poisoned;

    impl OdeSystem<f64, 1> for Poisoned {
        fn rhs(&self, _t: f64, _y: &[f64; 1], dydt: &mut [f64; 1]) {
            dydt[0] = f64::NAN;
        }
    }

    #[test]
    fn harmonic_oscillator_matches_closed_form_over_one_period() {
        let omega = 2.0;
        let period = 2.0 * PI / omega;
        let mut solver = AdaptiveSolver::default();

        let y = solver
            .integrate(&HarmonicOscillator { omega }, 0.0, &[1.0, 0.0], period)
            .unwrap();

        assert_abs_diff_eq!(y[0], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(y[1], 0.0, epsilon = 1e-7);
        assert!(solver.stats().accepted_steps > 1);
    }

    #[test]
    fn many_short_calls_agree_with_one_long_call() {
        let system = HarmonicOscillator { omega: 1.0 };
        let mut chunked = AdaptiveSolver::default();
        let mut y = [0.0, 1.0];
        let dt = 1.0 / 60.0;
        for i in 0..120 {
            let t0 = f64::from(i) * dt;
            y = chunked.integrate(&system, t0, &y, t0 + dt).unwrap();
        }

        let t_end = 120.0 * dt;
        assert_abs_diff_eq!(y[0], t_end.sin(), epsilon = 1e-7);
        assert_abs_diff_eq!(y[1], t_end.cos(), epsilon = 1e-7);
    }

    #[test]
    fn empty_interval_returns_input() {
        let mut solver = AdaptiveSolver::default();
        let y = solver
            .integrate(&HarmonicOscillator { omega: 1.0 }, 3.0, &[0.5, -0.5], 3.0)
            .unwrap();
        assert_eq!(y, [0.5, -0.5]);
        assert_eq!(solver.stats().fn_evals, 0);
    }

    #[test]
    fn finite_time_blow_up_is_reported() {
        let mut solver = AdaptiveSolver::default();
        let err = solver.integrate(&BlowUp, 0.0, &[1.0], 2.0).unwrap_err();
        let PendulumError::IntegrationFailure { reason, .. } = err else {
            panic!("expected an integration failure, got {err:?}");
        };
        assert!(
            matches!(
                reason,
                FailureReason::NonFiniteState
                    | FailureReason::StepSizeUnderflow { .. }
                    | FailureReason::StepLimitExceeded { .. }
            ),
            "reason={reason}"
        );
    }

    #[test]
    fn non_finite_derivative_is_reported() {
        let mut solver = AdaptiveSolver::default();
        let result = solver.integrate(&Poisoned, 0.0, &[1.0], 1.0);
        assert!(matches!(
            result,
            Err(PendulumError::IntegrationFailure {
                reason: FailureReason::NonFiniteState,
                ..
            })
        ));
    }

    #[test]
    fn step_budget_is_enforced() {
        let options = SolverOptions {
            max_steps: 3,
            ..SolverOptions::default()
        };
        let mut solver = AdaptiveSolver::new(options);
        let result = solver.integrate(&HarmonicOscillator { omega: 1.0 }, 0.0, &[1.0, 0.0], 100.0);
        assert!(matches!(
            result,
            Err(PendulumError::IntegrationFailure {
                reason: FailureReason::StepLimitExceeded { limit: 3 },
                ..
            })
        ));
    }

    #[test]
    fn rejected_tolerances_surface_as_solver_failures() {
        let options = SolverOptions {
            atol: 0.0,
            ..SolverOptions::default()
        };
        let mut solver = AdaptiveSolver::new(options);
        let err = solver
            .integrate(&HarmonicOscillator { omega: 1.0 }, 0.0, &[1.0, 0.0], 1.0)
            .unwrap_err();
        match err {
            PendulumError::IntegrationFailure { time, reason: FailureReason::Solver(message) } => {
                assert_eq!(time, 0.0);
                assert!(message.contains("atol"), "{message}");
            }
            other => panic!("expected a solver failure, got {other:?}"),
        }
    }

    #[test]
    fn reset_clears_counters_and_hint() {
        let mut solver = AdaptiveSolver::default();
        solver
            .integrate(&HarmonicOscillator { omega: 1.0 }, 0.0, &[1.0, 0.0], 1.0)
            .unwrap();
        assert!(solver.step_hint.is_some());

        solver.reset();
        assert_eq!(solver.stats(), SolverStats::default());
        assert!(solver.step_hint.is_none());
    }
}
