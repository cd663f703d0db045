//! # moebench-orchestration
//!
//! Parallel run scheduling, reference front construction, indicator tables
//! and statistical comparison of algorithm variants.

pub mod comparison;
pub mod interfaces;
pub mod pipeline;
pub mod quality;
pub mod reference_front;
pub mod scheduler;
pub mod variant_selection;

pub use comparison::{compare, StatisticsReport};
pub use interfaces::{ProgressReporter, ResultPresenter, Run, RunWriter};
pub use pipeline::{run_experiment, ExperimentOutcome};
pub use reference_front::{build_reference_fronts, ProblemReference};
pub use scheduler::{build_pool, execute_runs};
