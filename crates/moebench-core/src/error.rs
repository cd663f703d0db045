//! Error type shared by every pipeline stage.

/// Error type for experiment execution and assessment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// An algorithm returned an error or misbehaved during a run.
    #[error("algorithm failure: {0}")]
    AlgorithmFailure(String),

    /// An algorithm finished without producing any solution.
    #[error("algorithm returned an empty solution set")]
    EmptySolutionSet,

    /// An objective vector did not have the expected number of components.
    #[error("dimension mismatch: expected {expected} objectives, found {found}")]
    DimensionMismatch {
        /// Expected number of objectives.
        expected: usize,
        /// Number of objectives actually found.
        found: usize,
    },

    /// An objective vector contained NaN or an infinity.
    #[error("objective vector {index} has a non-finite component")]
    NonFiniteObjective {
        /// Position of the offending vector.
        index: usize,
    },

    /// Configuration error, detected before any job is scheduled.
    #[error("configuration error: {0}")]
    Config(String),

    /// The run was cancelled before it could start or finish.
    #[error("run cancelled")]
    Cancelled,

    /// The run did not start before the experiment deadline.
    #[error("run timed out after {0}")]
    Timeout(String),

    /// A cell was written twice into an append-only table.
    #[error("duplicate table entry: {0}")]
    DuplicateEntry(String),

    /// Reading or writing experiment data failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
