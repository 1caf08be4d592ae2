//! # Simulation Core
//!
//! [`Simulation`] owns one pendulum: its state, its constants, the elapsed
//! time and the solver that advances it. A render loop drives it with one
//! [`Simulation::step`] per frame and reads back a [`Frame`].

use std::fmt;

use crate::dynamics::{self, DoublePendulum};
use crate::error::{PendulumError, Result};
use crate::integrator::{AdaptiveSolver, SolverOptions, SolverStats};
use crate::types::{InitialState, JointPositions, PendulumState, PhysicalParameters};

/// Canonical frame time of the render loop (60 frames per second).
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Read-only snapshot handed to a renderer after each step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub time: f64,
    pub positions: JointPositions,
    pub energy: f64,
}

impl fmt::Display for Frame {
    /// The two on-screen HUD lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time = {:.1}\nenergy = {:.3} J", self.time, self.energy)
    }
}

/// A double pendulum advanced in fixed time steps.
#[derive(Clone, Debug)]
pub struct Simulation {
    state: PendulumState,
    initial: PendulumState,
    params: PhysicalParameters,
    elapsed: f64,
    initial_energy: f64,
    solver: AdaptiveSolver<4>,
}

impl Simulation {
    /// Create a simulation from degree-valued initial conditions.
    ///
    /// # Errors
    ///
    /// [`PendulumError::InvalidParameter`] if a length, mass or `g` is not
    /// positive, or any input is non-finite.
    pub fn new(initial: InitialState, params: PhysicalParameters) -> Result<Self> {
        Self::with_state(initial.to_radians(), params)
    }

    /// Create a simulation from a state already in radians.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::new`].
    pub fn with_state(state: PendulumState, params: PhysicalParameters) -> Result<Self> {
        params.validate()?;
        let components = [
            ("theta1", state.theta1),
            ("omega1", state.omega1),
            ("theta2", state.theta2),
            ("omega2", state.omega2),
        ];
        if let Some((name, value)) = components.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PendulumError::InvalidParameter { name, value });
        }

        let initial_energy = dynamics::energy(&state, &params);
        tracing::debug!(?state, ?params, initial_energy, "created double pendulum");

        Ok(Self {
            state,
            initial: state,
            params,
            elapsed: 0.0,
            initial_energy,
            solver: AdaptiveSolver::default(),
        })
    }

    /// Randomized variant: both angles uniform in [-180°, 180°], at rest.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::new`].
    pub fn random(rng: &mut fastrand::Rng, params: PhysicalParameters) -> Result<Self> {
        Self::new(InitialState::random(rng), params)
    }

    /// Replace the solver tolerances. Resets solver statistics.
    #[must_use]
    pub fn with_solver_options(mut self, options: SolverOptions) -> Self {
        self.solver = AdaptiveSolver::new(options);
        self
    }

    /// Advance the state by exactly `dt` seconds.
    ///
    /// The step is atomic: on error neither the state nor the elapsed time
    /// change.
    ///
    /// # Errors
    ///
    /// [`PendulumError::InvalidParameter`] for a non-positive or non-finite
    /// `dt`, [`PendulumError::IntegrationFailure`] if the solver cannot reach
    /// the end of the interval with a finite state.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PendulumError::InvalidParameter { name: "dt", value: dt });
        }

        let system = DoublePendulum { params: &self.params };
        let next = self
            .solver
            .integrate(&system, 0.0, &self.state.to_array(), dt)
            .map_err(|err| match err {
                PendulumError::IntegrationFailure { time, reason } => {
                    let time = self.elapsed + time;
                    tracing::warn!(time, %reason, "pendulum step failed");
                    PendulumError::IntegrationFailure { time, reason }
                }
                other => other,
            })?;

        self.state = PendulumState::from_array(next);
        self.elapsed += dt;
        tracing::trace!(elapsed = self.elapsed, state = ?self.state, "stepped");
        Ok(())
    }

    /// Take `steps` steps of size `dt`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Simulation::step`].
    pub fn run(&mut self, dt: f64, steps: usize) -> Result<()> {
        for _ in 0..steps {
            self.step(dt)?;
        }
        tracing::debug!(
            elapsed = self.elapsed,
            stats = ?self.solver.stats(),
            "run complete"
        );
        Ok(())
    }

    /// Restore the construction-time state and zero the clock.
    pub fn reset(&mut self) {
        self.state = self.initial;
        self.elapsed = 0.0;
        self.solver.reset();
    }

    #[must_use]
    pub fn position(&self) -> JointPositions {
        dynamics::positions(&self.state, &self.params)
    }

    #[must_use]
    pub fn energy(&self) -> f64 {
        dynamics::energy(&self.state, &self.params)
    }

    /// Energy at construction, the reference for drift checks.
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.initial_energy
    }

    /// Relative deviation of the current energy from the initial energy.
    #[must_use]
    pub fn energy_drift(&self) -> f64 {
        let reference = self.initial_energy.abs().max(f64::EPSILON);
        (self.energy() - self.initial_energy).abs() / reference
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            time: self.elapsed,
            positions: self.position(),
            energy: self.energy(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    #[must_use]
    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[must_use]
    pub fn stats(&self) -> SolverStats {
        self.solver.stats()
    }
}
