#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
//! # Double Pendulum Integrator
//!
//! Simulation core for a two-link ideal pendulum: the state, the closed-form
//! equations of motion, an adaptive Runge–Kutta solver, and the Cartesian and
//! energy projections a renderer needs each frame.
//!
//! ## Key Components
//!
//! -   **Data model:** [`PendulumState`] (radians), [`InitialState`]
//!     (degrees, converted at construction) and [`PhysicalParameters`] in the
//!     [`types`] module.
//! -   **Dynamics:** [`dynamics::derivative`], [`dynamics::positions`] and
//!     [`dynamics::energy`] are pure functions of state and parameters.
//! -   **Integration:** [`AdaptiveSolver`] in the [`integrator`] module runs
//!     the `rkf78` Runge–Kutta–Fehlberg 7(8) pair over any [`OdeSystem`] and
//!     reports failures as [`PendulumError::IntegrationFailure`].
//! -   **Simulation:** [`Simulation`] owns one pendulum and its clock and is
//!     the entry point for drivers.
//!
//! ## Usage
//!
//! ```rust
//! use pendulum::{InitialState, PhysicalParameters, Simulation, FRAME_DT};
//!
//! let mut sim = Simulation::new(InitialState::REFERENCE, PhysicalParameters::default())?;
//! sim.step(FRAME_DT)?;
//! let frame = sim.frame();
//! println!("{frame}");
//! # Ok::<(), pendulum::PendulumError>(())
//! ```

pub mod dynamics;
pub mod error;
pub mod integrator;
pub mod simulation;
pub mod types;

pub use error::{FailureReason, PendulumError, Result};
pub use integrator::{AdaptiveSolver, SolverOptions, SolverStats};
pub use rkf78::OdeSystem;
pub use simulation::{Frame, Simulation, FRAME_DT};
pub use types::{InitialState, JointPositions, PendulumState, PhysicalParameters};
