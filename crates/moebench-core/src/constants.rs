//! Default values and process exit codes.

/// Default significance level for hypothesis tests.
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default number of independent runs per (algorithm, problem) pair.
pub const DEFAULT_INDEPENDENT_RUNS: usize = 25;

/// Default fraction of the reference front range added to its worst point
/// to obtain the hypervolume reference point.
pub const DEFAULT_HV_NADIR_FRACTION: f64 = 0.1;

/// Largest sample size per group for which the exact rank-sum
/// distribution is enumerated.
pub const EXACT_RANK_SUM_LIMIT: usize = 50;

/// Default number of samples for the Monte Carlo hypervolume estimate.
pub const DEFAULT_HV_MONTE_CARLO_SAMPLES: usize = 100_000;

/// Default base seed for deriving per-run seeds.
pub const DEFAULT_BASE_SEED: u64 = 0x6d6f_6562_656e_6368;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// The experiment deadline was reached before every run started.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// At least one run failed.
    pub const ERROR_FAILED_RUNS: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Experiment cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
