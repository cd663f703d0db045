//! Application configuration from CLI flags, environment and an optional
//! experiment file.
//!
//! Flags win over the file, the file wins over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use moebench_core::constants::{
    DEFAULT_BASE_SEED, DEFAULT_INDEPENDENT_RUNS, DEFAULT_SIGNIFICANCE_LEVEL,
};
use moebench_core::error::EvalError;
use moebench_core::options::{HypervolumeMethod, ReferencePoint};

/// Run multi-objective optimizers on benchmark problems and compare them.
#[derive(Parser, Debug, Default)]
#[command(name = "moebench", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Problems to solve, comma separated, or "all".
    #[arg(short, long, value_delimiter = ',', env = "MOEBENCH_PROBLEMS")]
    pub problems: Vec<String>,

    /// Algorithms to run, comma separated, or "all".
    #[arg(short, long, value_delimiter = ',', env = "MOEBENCH_ALGORITHMS")]
    pub algorithms: Vec<String>,

    /// Independent runs per algorithm and problem.
    #[arg(short, long, env = "MOEBENCH_RUNS")]
    pub runs: Option<usize>,

    /// Worker threads (defaults to the available parallelism).
    #[arg(short, long, env = "MOEBENCH_WORKERS")]
    pub workers: Option<usize>,

    /// Quality indicators, comma separated, or "all".
    #[arg(short, long, value_delimiter = ',', env = "MOEBENCH_INDICATORS")]
    pub indicators: Vec<String>,

    /// Significance level of the hypothesis tests.
    #[arg(long, env = "MOEBENCH_ALPHA")]
    pub alpha: Option<f64>,

    /// Base seed from which every run seed is derived.
    #[arg(long, env = "MOEBENCH_SEED")]
    pub seed: Option<u64>,

    /// Directory receiving the experiment folder.
    #[arg(short, long, env = "MOEBENCH_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Experiment name, also the name of its folder.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Objective evaluations per run.
    #[arg(long)]
    pub evaluations: Option<usize>,

    /// Decision variables of the scalable problems.
    #[arg(long)]
    pub variables: Option<usize>,

    /// Reference front file for a problem, as PROBLEM=PATH. Repeatable.
    #[arg(long = "reference-front", value_name = "PROBLEM=PATH")]
    pub reference_fronts: Vec<String>,

    /// Explicit hypervolume reference point, comma separated.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub reference_point: Vec<f64>,

    /// Estimate hypervolume with this many Monte Carlo samples.
    #[arg(long)]
    pub hv_samples: Option<usize>,

    /// Score raw objective values instead of normalized ones.
    #[arg(long)]
    pub no_normalize: bool,

    /// Collapse identical objective vectors in reference fronts.
    #[arg(long)]
    pub dedup_ties: bool,

    /// Experiment deadline (e.g., "90s", "5m", "1h").
    #[arg(long)]
    pub timeout: Option<String>,

    /// JSON experiment file; flags override its values.
    #[arg(short, long, env = "MOEBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (no progress bar and no report).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Experiment description read from `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentFile {
    pub name: Option<String>,
    pub problems: Option<Vec<String>>,
    pub algorithms: Option<Vec<String>>,
    pub runs: Option<usize>,
    pub workers: Option<usize>,
    pub indicators: Option<Vec<String>>,
    pub alpha: Option<f64>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub evaluations: Option<usize>,
    pub variables: Option<usize>,
    /// Problem tag to front file.
    pub reference_fronts: Option<Vec<(String, PathBuf)>>,
    pub reference_point: Option<ReferencePoint>,
    pub hypervolume: Option<HypervolumeMethod>,
    pub normalize: Option<bool>,
    pub dedup_ties: Option<bool>,
    pub timeout: Option<String>,
}

impl ExperimentFile {
    /// Read and parse a JSON experiment file.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EvalError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| EvalError::Config(format!("{}: {e}", path.display())))
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub name: String,
    pub problems: Vec<String>,
    pub algorithms: Vec<String>,
    pub runs: usize,
    pub workers: Option<usize>,
    pub indicators: Vec<String>,
    pub alpha: f64,
    pub seed: u64,
    pub output_dir: PathBuf,
    pub evaluations: Option<usize>,
    pub variables: usize,
    pub reference_fronts: Vec<(String, PathBuf)>,
    pub reference_point: ReferencePoint,
    pub hypervolume: HypervolumeMethod,
    pub normalize: bool,
    pub dedup_ties: bool,
    pub timeout: Option<Duration>,
}

const DEFAULT_NAME: &str = "experiment";
const DEFAULT_VARIABLES: usize = 30;

fn list_or_all(flag: &[String], file: Option<Vec<String>>) -> Vec<String> {
    if !flag.is_empty() {
        return flag.to_vec();
    }
    file.filter(|l| !l.is_empty())
        .unwrap_or_else(|| vec!["all".to_string()])
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Merge flags, the experiment file and defaults.
    pub fn resolve(&self) -> Result<Settings, EvalError> {
        let file = match &self.config {
            Some(path) => ExperimentFile::load(path)?,
            None => ExperimentFile::default(),
        };
        self.resolve_with(file)
    }

    /// Merge flags over an already parsed experiment file.
    pub fn resolve_with(&self, file: ExperimentFile) -> Result<Settings, EvalError> {
        let reference_fronts = if self.reference_fronts.is_empty() {
            file.reference_fronts.unwrap_or_default()
        } else {
            self.reference_fronts
                .iter()
                .map(|arg| parse_front_arg(arg))
                .collect::<Result<_, _>>()?
        };

        let reference_point = if self.reference_point.is_empty() {
            file.reference_point.unwrap_or_default()
        } else {
            ReferencePoint::Explicit(self.reference_point.clone())
        };

        let seed = self.seed.or(file.seed).unwrap_or(DEFAULT_BASE_SEED);
        let hypervolume = match self.hv_samples {
            Some(0) => return Err(EvalError::Config("--hv-samples must be positive".into())),
            Some(samples) => HypervolumeMethod::MonteCarlo { samples, seed },
            None => file.hypervolume.unwrap_or_default(),
        };

        let timeout = match self.timeout.as_deref().or(file.timeout.as_deref()) {
            Some(text) => Some(
                parse_duration(text)
                    .ok_or_else(|| EvalError::Config(format!("invalid timeout: {text}")))?,
            ),
            None => None,
        };

        Ok(Settings {
            name: self
                .name
                .clone()
                .or(file.name)
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            problems: list_or_all(&self.problems, file.problems),
            algorithms: list_or_all(&self.algorithms, file.algorithms),
            runs: self.runs.or(file.runs).unwrap_or(DEFAULT_INDEPENDENT_RUNS),
            workers: self.workers.or(file.workers),
            indicators: list_or_all(&self.indicators, file.indicators),
            alpha: self.alpha.or(file.alpha).unwrap_or(DEFAULT_SIGNIFICANCE_LEVEL),
            seed,
            output_dir: self
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            evaluations: self.evaluations.or(file.evaluations),
            variables: self.variables.or(file.variables).unwrap_or(DEFAULT_VARIABLES),
            reference_fronts,
            reference_point,
            hypervolume,
            normalize: !self.no_normalize && file.normalize.unwrap_or(true),
            dedup_ties: self.dedup_ties || file.dedup_ties.unwrap_or(false),
            timeout,
        })
    }
}

/// Split `PROBLEM=PATH`.
fn parse_front_arg(arg: &str) -> Result<(String, PathBuf), EvalError> {
    match arg.split_once('=') {
        Some((problem, path)) if !problem.trim().is_empty() && !path.trim().is_empty() => {
            Ok((problem.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(EvalError::Config(format!(
            "reference front must be PROBLEM=PATH, got {arg:?}"
        ))),
    }
}

/// Parse a duration string like "5m", "1h", "30s", "250ms".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        Some(Duration::from_millis(ms.parse().ok()?))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        Some(Duration::from_secs(secs.parse().ok()?))
    } else {
        Some(Duration::from_secs(s.parse().ok()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("moebench").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn parse_duration_formats() {
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("12"), Some(Duration::from_secs(12)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn defaults_select_everything() {
        let settings = parse(&[]).resolve_with(ExperimentFile::default()).unwrap();
        assert_eq!(settings.problems, vec!["all"]);
        assert_eq!(settings.algorithms, vec!["all"]);
        assert_eq!(settings.indicators, vec!["all"]);
        assert_eq!(settings.runs, DEFAULT_INDEPENDENT_RUNS);
        assert_eq!(settings.reference_point, ReferencePoint::default());
        assert!(settings.normalize);
        assert!(!settings.dedup_ties);
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn flags_override_file() {
        let file: ExperimentFile = serde_json::from_str(
            r#"{"name": "study", "runs": 7, "problems": ["zdt2"], "alpha": 0.01, "normalize": false}"#,
        )
        .unwrap();
        let settings = parse(&["--runs", "3", "-p", "zdt1,schaffer"])
            .resolve_with(file)
            .unwrap();
        assert_eq!(settings.name, "study");
        assert_eq!(settings.runs, 3);
        assert_eq!(settings.problems, vec!["zdt1", "schaffer"]);
        assert!((settings.alpha - 0.01).abs() < 1e-12);
        assert!(!settings.normalize);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let parsed: Result<ExperimentFile, _> = serde_json::from_str(r#"{"repeats": 3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn reference_point_and_fronts() {
        let settings = parse(&[
            "--reference-point",
            "1.1,1.1",
            "--reference-front",
            "ZDT1=fronts/zdt1.pf",
        ])
        .resolve_with(ExperimentFile::default())
        .unwrap();
        assert_eq!(settings.reference_point, ReferencePoint::Explicit(vec![1.1, 1.1]));
        assert_eq!(
            settings.reference_fronts,
            vec![("ZDT1".to_string(), PathBuf::from("fronts/zdt1.pf"))]
        );
    }

    #[test]
    fn malformed_front_arg_is_a_config_error() {
        let err = parse(&["--reference-front", "zdt1.pf"])
            .resolve_with(ExperimentFile::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }

    #[test]
    fn monte_carlo_uses_base_seed() {
        let settings = parse(&["--hv-samples", "1000", "--seed", "9"])
            .resolve_with(ExperimentFile::default())
            .unwrap();
        assert_eq!(
            settings.hypervolume,
            HypervolumeMethod::MonteCarlo { samples: 1000, seed: 9 }
        );
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = parse(&["--timeout", "forever"])
            .resolve_with(ExperimentFile::default())
            .unwrap_err();
        assert_eq!(err, EvalError::Config("invalid timeout: forever".into()));
    }
}
