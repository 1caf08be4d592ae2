//! # Frame Loop
//!
//! Drives a [`Simulation`] the way a render loop would: one fixed-size step
//! per frame, then read back positions and energy. Instead of drawing, the
//! HUD lines are logged every `log_every` frames. With `realtime` set the
//! loop is paced to the configured frame rate.

use anyhow::{Context, Result};
use pendulum::{Frame, Simulation};
use std::time::{Duration, Instant};

use crate::config::{RunDef, SimulationConfig};

/// Summary of a finished run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub frames: usize,
    pub last_frame: Frame,
    pub initial_energy: f64,
    pub max_drift: f64,
}

/// Build the simulation described by `config` and run it to completion.
///
/// # Errors
///
/// Returns configuration errors and the first failed step, with the frame
/// index attached as context.
pub fn run(config: &SimulationConfig) -> Result<RunReport> {
    let mut sim = config.build_sim()?;
    let report = drive(&mut sim, &config.run)?;

    tracing::info!(
        "Finished {} frames: {}",
        report.frames,
        report.last_frame.to_string().replace('\n', ", ")
    );
    tracing::info!(
        initial_energy = report.initial_energy,
        max_drift = report.max_drift,
        stats = ?sim.stats(),
        "Energy drift summary"
    );
    Ok(report)
}

/// Step `sim` for `run.frames` frames.
pub fn drive(sim: &mut Simulation, run: &RunDef) -> Result<RunReport> {
    run.validate()?;
    let frame_duration = Duration::from_secs_f64(1.0 / run.fps);
    tracing::info!(
        "Starting simulation loop for {} frames with dt = {}...",
        run.frames,
        run.dt
    );

    let mut last_frame = sim.frame();
    let mut max_drift: f64 = 0.0;

    for i in 0..run.frames {
        let frame_start = Instant::now();

        sim.step(run.dt)
            .with_context(|| format!("simulation step {i} failed"))?;
        last_frame = sim.frame();
        max_drift = max_drift.max(sim.energy_drift());

        if run.log_every > 0 && (i + 1) % run.log_every == 0 {
            let [_, _, tip] = last_frame.positions.points();
            tracing::info!(
                frame = i + 1,
                tip_x = tip.0,
                tip_y = tip.1,
                "{}",
                last_frame.to_string().replace('\n', ", ")
            );
        }

        if run.realtime {
            let frame_time = frame_start.elapsed();
            if frame_time < frame_duration {
                std::thread::sleep(frame_duration - frame_time);
            }
        }
    }

    Ok(RunReport {
        frames: run.frames,
        last_frame,
        initial_energy: sim.initial_energy(),
        max_drift,
    })
}
