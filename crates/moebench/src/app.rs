//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use moebench_cli::output::read_front;
use moebench_cli::{ui, CLIProgressReporter, CLIResultPresenter, FileRunWriter};
use moebench_core::constants::exit_codes;
use moebench_core::dominance::TiePolicy;
use moebench_core::error::EvalError;
use moebench_core::experiment::{Experiment, ExperimentBuilder};
use moebench_core::observer::ProgressSubject;
use moebench_core::observers::{ChannelObserver, LoggingObserver};
use moebench_core::progress::{CancellationToken, ProgressUpdate};
use moebench_core::registry::{DefaultAlgorithmFactory, DefaultProblemFactory};
use moebench_orchestration::interfaces::{ProgressReporter, ResultPresenter};
use moebench_orchestration::pipeline::run_experiment;
use moebench_orchestration::variant_selection::{get_problems, get_variants};

use crate::config::{AppConfig, Settings};
use crate::errors::outcome_code;

/// Run the application and return its exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        moebench_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    let settings = config.resolve()?;
    let experiment = build_experiment(&settings)?;
    run_cli(config, &experiment)
}

/// Turn resolved settings into a validated experiment.
pub fn build_experiment(settings: &Settings) -> Result<Experiment, EvalError> {
    let problems = get_problems(
        &settings.problems,
        &DefaultProblemFactory::new(settings.variables),
    )?;
    let algorithms = settings
        .evaluations
        .map_or_else(DefaultAlgorithmFactory::default, DefaultAlgorithmFactory::with_evaluations);
    let variants = get_variants(&settings.algorithms, &problems, &algorithms)?;

    let mut fronts = Vec::with_capacity(settings.reference_fronts.len());
    for (name, path) in &settings.reference_fronts {
        let tag = problems
            .iter()
            .map(|p| p.tag())
            .find(|tag| tag.eq_ignore_ascii_case(name))
            .unwrap_or(name.as_str())
            .to_string();
        let points = read_front(path)
            .map_err(|e| EvalError::Config(format!("reference front for {tag}: {e}")))?;
        fronts.push((tag, points));
    }

    let mut builder = ExperimentBuilder::new(settings.name.clone())
        .base_directory(settings.output_dir.clone())
        .variants(variants)
        .repetitions(settings.runs)
        .significance_level(settings.alpha)
        .reference_point(settings.reference_point.clone())
        .hypervolume_method(settings.hypervolume)
        .normalize(settings.normalize)
        .base_seed(settings.seed)
        .tie_policy(if settings.dedup_ties {
            TiePolicy::Deduplicate
        } else {
            TiePolicy::KeepAll
        });
    for problem in problems {
        builder = builder.problem(problem);
    }
    for (tag, points) in fronts {
        builder = builder.reference_front(tag, points);
    }
    if !settings.indicators.iter().any(|i| i.eq_ignore_ascii_case("all")) {
        builder = builder.indicators(&settings.indicators);
    }
    if let Some(workers) = settings.workers {
        builder = builder.workers(workers);
    }
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

fn run_cli(config: &AppConfig, experiment: &Experiment) -> Result<i32> {
    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());

    let output = experiment.output_directory();
    std::fs::create_dir_all(&output)
        .with_context(|| format!("cannot create {}", output.display()))?;
    let writer = FileRunWriter::new(output.clone());

    if config.verbose && !config.quiet {
        ui::print_header(&crate::version::full_version());
    }
    info!(
        experiment = experiment.name(),
        jobs = experiment.total_jobs(),
        workers = experiment.workers(),
        "starting experiment"
    );

    let (tx, rx) = crossbeam_channel::unbounded::<ProgressUpdate>();
    let subject = ProgressSubject::new();
    subject.register(Arc::new(ChannelObserver::new(tx)));
    subject.register(Arc::new(LoggingObserver::new(1000)));

    let reporter = Arc::new(CLIProgressReporter::new(experiment.total_jobs(), config.quiet));
    let display = {
        let reporter = Arc::clone(&reporter);
        std::thread::spawn(move || {
            for update in rx {
                reporter.report(&update);
            }
            reporter.complete();
        })
    };

    let outcome = run_experiment(experiment, &cancel, &subject, &writer);
    // Dropping the channel observer ends the display thread.
    subject.clear();
    if display.join().is_err() {
        warn!("progress display thread panicked");
    }
    let outcome = outcome?;

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    presenter.present_runs(&outcome.runs);
    presenter.present_statistics(&outcome.statistics);
    if !config.quiet {
        println!();
        ui::print_success(&format!("results written to {}", output.display()));
    }

    let code = outcome_code(&outcome);
    if code == exit_codes::ERROR_CANCELED {
        presenter.present_error("experiment cancelled");
    } else if code == exit_codes::ERROR_TIMEOUT {
        presenter.present_error("experiment deadline reached before every run started");
    }
    Ok(code)
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(error = %e, "cannot install Ctrl+C handler");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moebench_core::indicator::IndicatorKind;

    use crate::config::ExperimentFile;
    use clap::Parser;

    fn settings(args: &[&str]) -> Settings {
        AppConfig::try_parse_from(std::iter::once("moebench").chain(args.iter().copied()))
            .unwrap()
            .resolve_with(ExperimentFile::default())
            .unwrap()
    }

    #[test]
    fn builds_every_pairing() {
        let experiment = build_experiment(&settings(&["--runs", "2", "--workers", "1"])).unwrap();
        assert_eq!(experiment.problems().len(), 3);
        assert_eq!(experiment.variants().len(), 6);
        assert_eq!(experiment.total_jobs(), 12);
        assert_eq!(experiment.indicators(), IndicatorKind::ALL.as_slice());
    }

    #[test]
    fn selects_indicators_and_problems() {
        let experiment =
            build_experiment(&settings(&["-p", "zdt1", "-a", "random", "-i", "hv,igd"])).unwrap();
        assert_eq!(experiment.problems()[0].tag(), "ZDT1");
        assert_eq!(
            experiment.indicators(),
            [
                IndicatorKind::Hypervolume,
                IndicatorKind::InvertedGenerationalDistance
            ]
            .as_slice()
        );
    }

    #[test]
    fn unknown_algorithm_is_a_config_error() {
        let err = build_experiment(&settings(&["-a", "nsga9"])).unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }

    #[test]
    fn supplied_front_matches_tag_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1.pf");
        std::fs::write(&path, "0 1\n0.5 0.5\n1 0\n").unwrap();
        let arg = format!("zdt1={}", path.display());
        let experiment =
            build_experiment(&settings(&["-p", "zdt1", "--reference-front", &arg])).unwrap();
        assert_eq!(experiment.reference_front("ZDT1").map(|f| f.len()), Some(3));
    }

    #[test]
    fn missing_front_file_is_a_config_error() {
        let err = build_experiment(&settings(&[
            "-p",
            "zdt1",
            "--reference-front",
            "zdt1=/nonexistent/zdt1.pf",
        ]))
        .unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }
}
