//! # Pendulum Data Model
//!
//! Plain-data types shared by the dynamics, the solver and the simulation
//! driver. Angles are radians everywhere except in [`InitialState`], which
//! carries the degree-valued input a driver supplies at construction.

use crate::error::{PendulumError, Result};

/// Instantaneous state of the double pendulum.
///
/// Field order is fixed: the solver views this struct as `[θ1, ω1, θ2, ω2]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PendulumState {
    /// Angle of link 1 from the downward vertical (rad)
    pub theta1: f64,
    /// Angular velocity of link 1 (rad/s)
    pub omega1: f64,
    /// Angle of link 2 from the downward vertical (rad)
    pub theta2: f64,
    /// Angular velocity of link 2 (rad/s)
    pub omega2: f64,
}

impl PendulumState {
    #[must_use]
    pub const fn new(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        Self { theta1, omega1, theta2, omega2 }
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 4] {
        bytemuck::cast(self)
    }

    #[must_use]
    pub fn from_array(values: [f64; 4]) -> Self {
        bytemuck::cast(values)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Degree-valued initial conditions.
///
/// All four components are scaled by π/180 on conversion, so angular
/// velocities are given in degrees per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InitialState {
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
}

impl InitialState {
    /// Reference configuration: link 1 pointing straight up, link 2 at -20°.
    pub const REFERENCE: Self = Self::new(180.0, 0.0, -20.0, 0.0);

    #[must_use]
    pub const fn new(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        Self { theta1, omega1, theta2, omega2 }
    }

    /// Both angles drawn uniformly from [-180°, 180°], starting at rest.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        let theta1 = rng.f64() * 360.0 - 180.0;
        let theta2 = rng.f64() * 360.0 - 180.0;
        Self::new(theta1, 0.0, theta2, 0.0)
    }

    #[must_use]
    pub fn to_radians(self) -> PendulumState {
        PendulumState::new(
            self.theta1.to_radians(),
            self.omega1.to_radians(),
            self.theta2.to_radians(),
            self.omega2.to_radians(),
        )
    }
}

impl Default for InitialState {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Physical constants of one simulation. Immutable once a simulation owns them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicalParameters {
    /// Length of link 1 (m)
    pub l1: f64,
    /// Length of link 2 (m)
    pub l2: f64,
    /// Point mass at the end of link 1 (kg)
    pub m1: f64,
    /// Point mass at the end of link 2 (kg)
    pub m2: f64,
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Pivot location in the rendering plane
    pub origin: (f64, f64),
}

impl PhysicalParameters {
    /// Reject non-positive or non-finite constants before they can turn into
    /// NaN inside the equations of motion.
    ///
    /// # Errors
    ///
    /// [`PendulumError::InvalidParameter`] naming the first length, mass or
    /// `g` that is not positive and finite, or the first non-finite origin
    /// coordinate.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("l1", self.l1),
            ("l2", self.l2),
            ("m1", self.m1),
            ("m2", self.m2),
            ("g", self.g),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PendulumError::InvalidParameter { name, value });
            }
        }
        for (name, value) in [("origin.x", self.origin.0), ("origin.y", self.origin.1)] {
            if !value.is_finite() {
                return Err(PendulumError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Total mass, the coefficient that keeps recurring in the equations of motion.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.m1 + self.m2
    }
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            l1: 1.0,
            l2: 1.0,
            m1: 1.0,
            m2: 1.0,
            g: 9.8,
            origin: (0.0, 0.0),
        }
    }
}

/// Cartesian coordinates of the pivot, joint 1 and joint 2, in that order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointPositions {
    pub x: [f64; 3],
    pub y: [f64; 3],
}

impl JointPositions {
    /// The three points as `(x, y)` pairs, ready to be drawn as a polyline.
    #[must_use]
    pub fn points(&self) -> [(f64, f64); 3] {
        [
            (self.x[0], self.y[0]),
            (self.x[1], self.y[1]),
            (self.x[2], self.y[2]),
        ]
    }
}
