use clap::Parser;
use std::path::PathBuf;

/// Run a double pendulum for a fixed number of frames and log its HUD.
#[derive(Parser, Debug, Default)]
#[command(name = "pendulum_main", version, about)]
pub struct Args {
    /// JSON file with parameters, initial state, solver and run settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long)]
    pub frames: Option<usize>,

    /// Time step per frame in seconds
    #[arg(long)]
    pub dt: Option<f64>,

    /// Target frame rate when pacing in real time
    #[arg(long)]
    pub fps: Option<f64>,

    /// Sleep between frames so the run takes wall-clock time
    #[arg(long)]
    pub realtime: bool,

    /// Draw both initial angles uniformly from [-180, 180] degrees
    #[arg(long)]
    pub random: bool,

    /// Seed for --random
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial angle of link 1 in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub theta1: Option<f64>,

    /// Initial angle of link 2 in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub theta2: Option<f64>,

    /// Log the HUD every N frames (0 disables)
    #[arg(long)]
    pub log_every: Option<usize>,

    /// Solver relative tolerance
    #[arg(long)]
    pub rtol: Option<f64>,

    /// Solver absolute tolerance
    #[arg(long)]
    pub atol: Option<f64>,
}
