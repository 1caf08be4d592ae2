//! # Double Pendulum Dynamics
//!
//! Closed-form equations of motion for two ideal links with point masses,
//! plus the Cartesian and energy projections used for drawing and for
//! checking the integrator. Every function here is pure in
//! `(state, params)`.

use rkf78::OdeSystem;

use crate::types::{JointPositions, PendulumState, PhysicalParameters};

/// Angular accelerations `(α1, α2)` for the given state.
///
/// Lagrangian equations solved for the accelerations; δ = θ2 − θ1.
/// The shared denominator `(M1 + M2)·L1 − M2·L1·cos²δ` equals
/// `L1·(M1 + M2·sin²δ)`, which stays positive for any positive M1.
#[must_use]
pub fn angular_accelerations(state: &PendulumState, params: &PhysicalParameters) -> (f64, f64) {
    let PhysicalParameters { l1, l2, m1: _, m2, g, .. } = *params;
    let total = params.total_mass();
    let PendulumState { theta1, omega1, theta2, omega2 } = *state;

    let delta = theta2 - theta1;
    let (sin_delta, cos_delta) = delta.sin_cos();

    let den1 = total * l1 - m2 * l1 * cos_delta * cos_delta;
    let alpha1 = (m2 * l1 * omega1 * omega1 * sin_delta * cos_delta
        + m2 * g * theta2.sin() * cos_delta
        + m2 * l2 * omega2 * omega2 * sin_delta
        - total * g * theta1.sin())
        / den1;

    let den2 = (l2 / l1) * den1;
    let alpha2 = (-m2 * l2 * omega2 * omega2 * sin_delta * cos_delta
        + total * g * theta1.sin() * cos_delta
        - total * l1 * omega1 * omega1 * sin_delta
        - total * g * theta2.sin())
        / den2;

    (alpha1, alpha2)
}

/// Time derivative of the state vector.
///
/// Autonomous system: `_t` is accepted so this slots in as a solver
/// right-hand side but does not enter the result.
#[must_use]
pub fn derivative(state: &PendulumState, _t: f64, params: &PhysicalParameters) -> PendulumState {
    let (alpha1, alpha2) = angular_accelerations(state, params);
    PendulumState::new(state.omega1, alpha1, state.omega2, alpha2)
}

/// Pivot, joint 1 and joint 2 in the rendering plane.
#[must_use]
pub fn positions(state: &PendulumState, params: &PhysicalParameters) -> JointPositions {
    let (x0, y0) = params.origin;
    let (dx1, dy1) = link_offset(params.l1, state.theta1);
    let (dx2, dy2) = link_offset(params.l2, state.theta2);

    JointPositions {
        x: [x0, x0 + dx1, x0 + dx1 + dx2],
        y: [y0, y0 + dy1, y0 + dy1 + dy2],
    }
}

/// Total mechanical energy `U + K` in joules.
///
/// Heights are measured from the pivot, so the origin shift does not enter
/// the potential term.
#[must_use]
pub fn energy(state: &PendulumState, params: &PhysicalParameters) -> f64 {
    let PhysicalParameters { l1, l2, m1, m2, g, .. } = *params;

    let (_, y1) = link_offset(l1, state.theta1);
    let (_, dy2) = link_offset(l2, state.theta2);
    let y2 = y1 + dy2;

    let (vx1, vy1) = link_velocity(l1, state.theta1, state.omega1);
    let (dvx2, dvy2) = link_velocity(l2, state.theta2, state.omega2);
    let (vx2, vy2) = (vx1 + dvx2, vy1 + dvy2);

    let potential = g * (m1 * y1 + m2 * y2);
    let kinetic = 0.5 * (m1 * (vx1 * vx1 + vy1 * vy1) + m2 * (vx2 * vx2 + vy2 * vy2));
    potential + kinetic
}

/// Displacement of a link's tip relative to its pivot; y grows upwards.
fn link_offset(length: f64, theta: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (length * sin, -length * cos)
}

fn link_velocity(length: f64, theta: f64, omega: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (length * omega * cos, length * omega * sin)
}

/// Adapter that presents the double pendulum to the `rkf78` solver.
pub struct DoublePendulum<'a> {
    pub params: &'a PhysicalParameters,
}

impl OdeSystem<f64, 4> for DoublePendulum<'_> {
    fn rhs(&self, t: f64, y: &[f64; 4], dydt: &mut [f64; 4]) {
        let state = PendulumState::from_array(*y);
        *dydt = derivative(&state, t, self.params).to_array();
    }
}
