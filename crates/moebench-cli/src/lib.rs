//! # moebench-cli
//!
//! Terminal reports, progress display, experiment files and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod progress;
pub mod ui;
pub mod writer;

pub use presenter::CLIResultPresenter;
pub use progress::CLIProgressReporter;
pub use writer::FileRunWriter;
