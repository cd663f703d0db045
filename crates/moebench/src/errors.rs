//! Error handling and exit codes.

use moebench_core::constants::exit_codes;
use moebench_core::error::EvalError;
use moebench_orchestration::pipeline::ExperimentOutcome;

/// Exit code for an error that stopped the application.
pub fn handle_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<EvalError>() {
        Some(EvalError::Config(_)) => exit_codes::ERROR_CONFIG,
        Some(EvalError::Cancelled) => exit_codes::ERROR_CANCELED,
        Some(EvalError::Timeout(_)) => exit_codes::ERROR_TIMEOUT,
        _ => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for a finished experiment.
///
/// Cancellation outranks a deadline, which outranks ordinary failures.
pub fn outcome_code(outcome: &ExperimentOutcome) -> i32 {
    if outcome.was_cancelled() {
        exit_codes::ERROR_CANCELED
    } else if outcome.timed_out() {
        exit_codes::ERROR_TIMEOUT
    } else if outcome.failed_runs().next().is_some() {
        exit_codes::ERROR_FAILED_RUNS
    } else {
        exit_codes::SUCCESS
    }
}
