//! # Run Configuration
//!
//! A JSON document describing one pendulum run. Every section and field is
//! optional and falls back to the simulation defaults; command-line flags
//! are applied on top with [`SimulationConfig::apply`].
//!
//! ```json
//! {
//!   "parameters": { "l1": 1.0, "l2": 1.0, "m1": 1.0, "m2": 1.0, "g": 9.8, "origin": [0.0, 0.0] },
//!   "initial_state": { "theta1": 180.0, "omega1": 0.0, "theta2": -20.0, "omega2": 0.0 },
//!   "random": false,
//!   "seed": null,
//!   "solver": { "rtol": 1e-9, "atol": 1e-9, "max_steps": 100000 },
//!   "run": { "frames": 600, "dt": 0.016666666666666666, "fps": 60.0, "realtime": false, "log_every": 60 }
//! }
//! ```

use anyhow::{bail, Context, Result};
use pendulum::{InitialState, PhysicalParameters, Simulation, SolverOptions, FRAME_DT};
use serde::Deserialize;
use std::path::Path;

use crate::cli::Args;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub parameters: ParametersDef,
    pub initial_state: InitialStateDef,
    pub random: bool,
    pub seed: Option<u64>,
    pub solver: SolverDef,
    pub run: RunDef,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParametersDef {
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
    pub g: f64,
    pub origin: [f64; 2],
}

impl Default for ParametersDef {
    fn default() -> Self {
        let p = PhysicalParameters::default();
        Self {
            l1: p.l1,
            l2: p.l2,
            m1: p.m1,
            m2: p.m2,
            g: p.g,
            origin: [p.origin.0, p.origin.1],
        }
    }
}

/// Initial conditions in degrees and degrees per second.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialStateDef {
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
}

impl Default for InitialStateDef {
    fn default() -> Self {
        let s = InitialState::REFERENCE;
        Self {
            theta1: s.theta1,
            omega1: s.omega1,
            theta2: s.theta2,
            omega2: s.omega2,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverDef {
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: usize,
}

impl Default for SolverDef {
    fn default() -> Self {
        let o = SolverOptions::default();
        Self {
            rtol: o.rtol,
            atol: o.atol,
            max_steps: o.max_steps,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunDef {
    pub frames: usize,
    pub dt: f64,
    pub fps: f64,
    pub realtime: bool,
    pub log_every: usize,
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            frames: 600,
            dt: FRAME_DT,
            fps: 60.0,
            realtime: false,
            log_every: 60,
        }
    }
}

impl RunDef {
    /// Reject frame rates and frame times the loop cannot pace or step with.
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            bail!("fps must be positive and finite, got {}", self.fps);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            bail!("dt must be positive and finite, got {}", self.dt);
        }
        Ok(())
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Layer command-line flags over the file values.
    pub fn apply(&mut self, args: &Args) {
        if let Some(frames) = args.frames {
            self.run.frames = frames;
        }
        if let Some(dt) = args.dt {
            self.run.dt = dt;
        }
        if let Some(fps) = args.fps {
            self.run.fps = fps;
        }
        if let Some(log_every) = args.log_every {
            self.run.log_every = log_every;
        }
        self.run.realtime |= args.realtime;
        self.random |= args.random;
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(theta1) = args.theta1 {
            self.initial_state.theta1 = theta1;
        }
        if let Some(theta2) = args.theta2 {
            self.initial_state.theta2 = theta2;
        }
        if let Some(rtol) = args.rtol {
            self.solver.rtol = rtol;
        }
        if let Some(atol) = args.atol {
            self.solver.atol = atol;
        }
    }

    #[must_use]
    pub fn parameters(&self) -> PhysicalParameters {
        let p = &self.parameters;
        PhysicalParameters {
            l1: p.l1,
            l2: p.l2,
            m1: p.m1,
            m2: p.m2,
            g: p.g,
            origin: (p.origin[0], p.origin[1]),
        }
    }

    #[must_use]
    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            rtol: self.solver.rtol,
            atol: self.solver.atol,
            max_steps: self.solver.max_steps,
            ..SolverOptions::default()
        }
    }

    /// Build the simulation this configuration describes.
    pub fn build_sim(&self) -> Result<Simulation> {
        self.run.validate()?;
        if !(self.solver.rtol > 0.0 && self.solver.atol > 0.0) {
            bail!(
                "solver tolerances must be positive, got rtol={} atol={}",
                self.solver.rtol,
                self.solver.atol
            );
        }

        let params = self.parameters();
        let sim = if self.random {
            let mut rng = match self.seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            Simulation::random(&mut rng, params)?
        } else {
            let s = &self.initial_state;
            Simulation::new(InitialState::new(s.theta1, s.omega1, s.theta2, s.omega2), params)?
        };
        Ok(sim.with_solver_options(self.solver_options()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pendulum::PendulumError;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::from_json("{}").unwrap();
        assert_eq!(config.parameters(), PhysicalParameters::default());
        assert_eq!(config.solver_options(), SolverOptions::default());
        assert_eq!(config.run.frames, 600);
        assert!(!config.random);

        let sim = config.build_sim().unwrap();
        assert_eq!(*sim.state(), InitialState::REFERENCE.to_radians());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let json = r#"{
            "parameters": { "m2": 2.5, "origin": [1.0, -1.0] },
            "initial_state": { "theta1": 90.0 },
            "run": { "frames": 30 }
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        let params = config.parameters();
        assert_eq!(params.m2, 2.5);
        assert_eq!(params.l1, 1.0);
        assert_eq!(params.origin, (1.0, -1.0));
        assert_eq!(config.initial_state.theta1, 90.0);
        assert_eq!(config.initial_state.theta2, -20.0);
        assert_eq!(config.run.frames, 30);
        assert_eq!(config.run.dt, FRAME_DT);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SimulationConfig::from_json(r#"{ "parameters": { "mass": 1.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn flags_override_file_values() {
        let mut config =
            SimulationConfig::from_json(r#"{ "run": { "frames": 10, "dt": 0.1 } }"#).unwrap();
        let args = Args::parse_from([
            "pendulum_main",
            "--frames",
            "20",
            "--theta2",
            "-5",
            "--random",
            "--seed",
            "9",
        ]);
        config.apply(&args);

        assert_eq!(config.run.frames, 20);
        assert_eq!(config.run.dt, 0.1);
        assert_eq!(config.initial_state.theta2, -5.0);
        assert!(config.random);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn seeded_random_runs_are_reproducible() {
        let config =
            SimulationConfig::from_json(r#"{ "random": true, "seed": 17 }"#).unwrap();
        let a = config.build_sim().unwrap();
        let b = config.build_sim().unwrap();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn invalid_parameters_surface_as_pendulum_errors() {
        let config =
            SimulationConfig::from_json(r#"{ "parameters": { "l1": 0.0 } }"#).unwrap();
        let err = config.build_sim().unwrap_err();
        assert_eq!(
            err.downcast_ref::<PendulumError>(),
            Some(&PendulumError::InvalidParameter { name: "l1", value: 0.0 })
        );
    }

    #[test]
    fn non_positive_fps_is_rejected() {
        let config = SimulationConfig::from_json(r#"{ "run": { "fps": 0.0 } }"#).unwrap();
        let err = config.build_sim().unwrap_err();
        assert!(err.to_string().contains("fps must be positive"), "{err}");
    }

    #[test]
    fn run_section_validation() {
        assert!(RunDef::default().validate().is_ok());
        for fps in [0.0, -30.0, f64::NAN, f64::INFINITY] {
            let run = RunDef { fps, ..RunDef::default() };
            assert!(run.validate().is_err(), "fps={fps} accepted");
        }
        for dt in [0.0, -FRAME_DT, f64::NAN] {
            let run = RunDef { dt, ..RunDef::default() };
            assert!(run.validate().is_err(), "dt={dt} accepted");
        }
    }
}
