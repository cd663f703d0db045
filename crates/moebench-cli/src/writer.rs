//! Experiment files in the jMetal directory layout.
//!
//! ```text
//! <base>/<name>/data/<algorithm>/<problem>/FUN<run>.tsv
//! <base>/<name>/data/<algorithm>/<problem>/VAR<run>.tsv
//! <base>/<name>/referenceFronts/<problem>.pf
//! <base>/<name>/referenceFronts/<problem>.ps
//! <base>/<name>/QualityIndicatorSummary.csv
//! <base>/<name>/statistics.json
//! ```

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use moebench_core::error::EvalError;
use moebench_core::solution::SolutionSet;
use moebench_core::table::IndicatorTable;
use moebench_orchestration::comparison::StatisticsReport;
use moebench_orchestration::interfaces::RunWriter;
use moebench_orchestration::reference_front::ProblemReference;

use crate::output::{format_vectors, NOT_APPLICABLE_MARKER};

/// Name of the indicator summary file.
pub const SUMMARY_FILE: &str = "QualityIndicatorSummary.csv";

/// Name of the statistics report.
pub const STATISTICS_FILE: &str = "statistics.json";

/// Writes experiment artifacts below an output directory.
#[derive(Debug, Clone)]
pub struct FileRunWriter {
    root: PathBuf,
}

impl FileRunWriter {
    /// Write below `root`, usually `<base directory>/<experiment name>`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the runs of `algorithm` on `problem`.
    #[must_use]
    pub fn run_directory(&self, algorithm: &str, problem: &str) -> PathBuf {
        self.root.join("data").join(algorithm).join(problem)
    }

    #[must_use]
    pub fn reference_front_directory(&self) -> PathBuf {
        self.root.join("referenceFronts")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), EvalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

impl RunWriter for FileRunWriter {
    fn write_run(
        &self,
        algorithm: &str,
        problem: &str,
        run: usize,
        solutions: &SolutionSet,
    ) -> Result<(), EvalError> {
        let dir = self.run_directory(algorithm, problem);
        debug!(algorithm, problem, run, dir = %dir.display(), "writing run");
        write_file(
            &dir.join(format!("FUN{run}.tsv")),
            &format_vectors(&solutions.objective_vectors()),
        )?;
        write_file(
            &dir.join(format!("VAR{run}.tsv")),
            &format_vectors(&solutions.variable_vectors()),
        )
    }

    fn write_reference_front(&self, reference: &ProblemReference) -> Result<(), EvalError> {
        let dir = self.reference_front_directory();
        write_file(
            &dir.join(format!("{}.pf", reference.problem)),
            &format_vectors(reference.front.points()),
        )?;
        if !reference.pareto_set.is_empty() {
            write_file(
                &dir.join(format!("{}.ps", reference.problem)),
                &format_vectors(&reference.pareto_set),
            )?;
        }
        Ok(())
    }

    fn write_indicator_table(&self, table: &IndicatorTable) -> Result<(), EvalError> {
        fs::create_dir_all(&self.root)?;
        let file = fs::File::create(self.root.join(SUMMARY_FILE))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "Algorithm,Problem,IndicatorName,ExecutionId,IndicatorValue")?;
        for (key, value) in table.iter() {
            let value = value
                .value()
                .map_or_else(|| NOT_APPLICABLE_MARKER.to_string(), |v| v.to_string());
            writeln!(
                out,
                "{},{},{},{},{}",
                csv_field(&key.algorithm),
                csv_field(&key.problem),
                key.indicator,
                key.run,
                value
            )?;
        }
        out.flush()?;
        debug!(cells = table.len(), "indicator table written");
        Ok(())
    }

    fn write_statistics(&self, report: &StatisticsReport) -> Result<(), EvalError> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| EvalError::Io(format!("cannot serialize statistics: {e}")))?;
        write_file(&self.root.join(STATISTICS_FILE), &json)
    }
}

/// Quote a CSV field that contains a separator, a quote or a line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
