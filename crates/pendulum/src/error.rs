use thiserror::Error;

/// Why the ODE solver gave up on a step.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// A trial state or derivative contained NaN or infinity.
    NonFiniteState,
    /// Error control drove the sub-step below the configured minimum.
    StepSizeUnderflow { step: f64 },
    /// The per-call sub-step budget was exhausted.
    StepLimitExceeded { limit: usize },
    /// The solver refused its inputs, e.g. a non-positive tolerance.
    Solver(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NonFiniteState => write!(f, "state became non-finite"),
            FailureReason::StepSizeUnderflow { step } => {
                write!(f, "step size underflow (h = {step:e})")
            }
            FailureReason::StepLimitExceeded { limit } => {
                write!(f, "exceeded {limit} sub-steps")
            }
            FailureReason::Solver(message) => write!(f, "{message}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PendulumError {
    #[error("invalid parameter `{name}`: {value} (must be positive and finite)")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("integration failed at t = {time}: {reason}")]
    IntegrationFailure { time: f64, reason: FailureReason },
}

pub type Result<T> = std::result::Result<T, PendulumError>;
