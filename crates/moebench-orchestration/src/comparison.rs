//! Cross-variant statistics over a completed indicator table.
//!
//! Everything here is a pure function of the experiment layout and the
//! table, so the same inputs give bit-identical reports.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::info;

use moebench_core::experiment::Experiment;
use moebench_core::friedman::{friedman_test, FriedmanTest};
use moebench_core::indicator::IndicatorKind;
use moebench_core::options::StatisticsSettings;
use moebench_core::summary::{self, Summary};
use moebench_core::table::IndicatorTable;
use moebench_core::wilcoxon::{rank_sum_test, RankSumTest};

/// A statistic, or the reason it could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statistic<T> {
    Computed(T),
    NotApplicable(String),
}

impl<T> Statistic<T> {
    #[must_use]
    pub fn computed(&self) -> Option<&T> {
        match self {
            Self::Computed(value) => Some(value),
            Self::NotApplicable(_) => None,
        }
    }
}

/// Descriptive statistics of one variant's defined values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSummary {
    pub algorithm: String,
    /// `None` when the variant has no defined value.
    pub summary: Option<Summary>,
    /// Cells that were present but undefined.
    pub undefined: usize,
}

/// Rank-sum comparison of two variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub first: String,
    pub second: String,
    pub test: Statistic<RankSumTest>,
    /// Whether equal medians are rejected at the significance level.
    pub significant: bool,
    /// The better variant when the difference is significant.
    pub better: Option<String>,
}

/// Friedman ranking of named treatments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub algorithms: Vec<String>,
    pub test: FriedmanTest,
    /// Whether equal effects are rejected at the significance level.
    pub significant: bool,
    /// Algorithm tags from best to worst average rank.
    pub ordering: Vec<String>,
}

/// Statistics of one (indicator, problem) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemStatistics {
    pub indicator: IndicatorKind,
    pub problem: String,
    pub summaries: Vec<VariantSummary>,
    pub pairwise: Statistic<Vec<PairwiseComparison>>,
    pub friedman: Statistic<Ranking>,
}

/// Friedman ranking of algorithms across problems for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRanking {
    pub indicator: IndicatorKind,
    /// Problems used as blocks.
    pub problems: Vec<String>,
    pub friedman: Statistic<Ranking>,
}

/// Every statistic of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub significance_level: f64,
    pub per_problem: Vec<ProblemStatistics>,
    pub across_problems: Vec<IndicatorRanking>,
}

impl StatisticsReport {
    /// Statistics of one (indicator, problem) pair.
    #[must_use]
    pub fn for_problem(&self, indicator: IndicatorKind, problem: &str) -> Option<&ProblemStatistics> {
        self.per_problem
            .iter()
            .find(|s| s.indicator == indicator && s.problem == problem)
    }
}

/// Compute summaries, pairwise tests and rankings for `table`.
#[must_use]
pub fn compare(experiment: &Experiment, table: &IndicatorTable) -> StatisticsReport {
    let settings = *experiment.statistics();
    let mut per_problem = Vec::new();
    let mut across_problems = Vec::new();

    for &indicator in experiment.indicators() {
        for problem in experiment.problems() {
            let algorithms: Vec<String> = experiment
                .variants_for(problem.tag())
                .map(|v| v.tag().to_string())
                .collect();
            per_problem.push(problem_statistics(
                indicator,
                problem.tag(),
                &algorithms,
                table,
                &settings,
            ));
        }
        across_problems.push(rank_across_problems(experiment, indicator, table, &settings));
    }

    info!(
        pairs = per_problem.len(),
        rankings = across_problems.len(),
        "statistics computed"
    );
    StatisticsReport {
        significance_level: settings.significance_level,
        per_problem,
        across_problems,
    }
}

fn problem_statistics(
    indicator: IndicatorKind,
    problem: &str,
    algorithms: &[String],
    table: &IndicatorTable,
    settings: &StatisticsSettings,
) -> ProblemStatistics {
    let samples: Vec<Vec<f64>> = algorithms
        .iter()
        .map(|a| table.samples(indicator, problem, a))
        .collect();

    let summaries = algorithms
        .iter()
        .zip(&samples)
        .map(|(algorithm, values)| {
            let cells = table
                .iter()
                .filter(|(k, _)| {
                    k.indicator == indicator && k.problem == problem && k.algorithm == *algorithm
                })
                .count();
            VariantSummary {
                algorithm: algorithm.clone(),
                summary: Summary::of(values),
                undefined: cells - values.len(),
            }
        })
        .collect();

    let pairwise = if algorithms.len() < 2 {
        Statistic::NotApplicable("fewer than 2 variants".into())
    } else {
        let mut pairs = Vec::new();
        for i in 0..algorithms.len() {
            for j in (i + 1)..algorithms.len() {
                pairs.push(compare_pair(
                    indicator,
                    (&algorithms[i], &samples[i]),
                    (&algorithms[j], &samples[j]),
                    settings,
                ));
            }
        }
        Statistic::Computed(pairs)
    };

    let blocks = complete_blocks(indicator, problem, algorithms, table);
    let friedman = rank(indicator, algorithms, &blocks, settings);

    ProblemStatistics {
        indicator,
        problem: problem.to_string(),
        summaries,
        pairwise,
        friedman,
    }
}

fn compare_pair(
    indicator: IndicatorKind,
    (first, a): (&String, &Vec<f64>),
    (second, b): (&String, &Vec<f64>),
    settings: &StatisticsSettings,
) -> PairwiseComparison {
    let Some(test) = rank_sum_test(a, b, settings.exact_limit) else {
        return PairwiseComparison {
            first: first.clone(),
            second: second.clone(),
            test: Statistic::NotApplicable("a variant has no defined value".into()),
            significant: false,
            better: None,
        };
    };
    let significant = test.rejects(settings.significance_level);
    let better = if significant {
        match (summary::median(a), summary::median(b)) {
            (Some(ma), Some(mb)) => match indicator.cmp_better(ma, mb) {
                Ordering::Less => Some(first.clone()),
                Ordering::Greater => Some(second.clone()),
                Ordering::Equal => None,
            },
            _ => None,
        }
    } else {
        None
    };
    PairwiseComparison {
        first: first.clone(),
        second: second.clone(),
        test: Statistic::Computed(test),
        significant,
        better,
    }
}

// Repetitions where every algorithm has a defined value, as rows of scores.
fn complete_blocks(
    indicator: IndicatorKind,
    problem: &str,
    algorithms: &[String],
    table: &IndicatorTable,
) -> Vec<Vec<f64>> {
    let by_run: Vec<_> = algorithms
        .iter()
        .map(|a| table.defined_by_run(indicator, problem, a))
        .collect();
    let Some(first) = by_run.first() else {
        return Vec::new();
    };
    first
        .keys()
        .filter_map(|run| -> Option<Vec<f64>> {
            by_run.iter().map(|m| m.get(run).copied()).collect()
        })
        .collect()
}

fn rank_across_problems(
    experiment: &Experiment,
    indicator: IndicatorKind,
    table: &IndicatorTable,
    settings: &StatisticsSettings,
) -> IndicatorRanking {
    let algorithms: Vec<String> = experiment
        .algorithm_tags()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut problems = Vec::new();
    let mut blocks = Vec::new();
    for problem in experiment.problems() {
        let means: Option<Vec<f64>> = algorithms
            .iter()
            .map(|a| summary::mean(&table.samples(indicator, problem.tag(), a)))
            .collect();
        if let Some(row) = means {
            problems.push(problem.tag().to_string());
            blocks.push(row);
        }
    }
    IndicatorRanking {
        indicator,
        problems,
        friedman: rank(indicator, &algorithms, &blocks, settings),
    }
}

fn rank(
    indicator: IndicatorKind,
    algorithms: &[String],
    blocks: &[Vec<f64>],
    settings: &StatisticsSettings,
) -> Statistic<Ranking> {
    if algorithms.len() < 3 {
        return Statistic::NotApplicable("fewer than 3 variants".into());
    }
    if blocks.len() < 2 {
        return Statistic::NotApplicable("fewer than 2 complete blocks".into());
    }
    // Friedman ranks ascending, so flip maximized indicators.
    let oriented: Vec<Vec<f64>> = if indicator.is_minimization() {
        blocks.to_vec()
    } else {
        blocks
            .iter()
            .map(|row| row.iter().map(|v| -v).collect())
            .collect()
    };
    match friedman_test(&oriented) {
        Some(test) => Statistic::Computed(Ranking {
            algorithms: algorithms.to_vec(),
            significant: test.rejects(settings.significance_level),
            ordering: test.ordering.iter().map(|&i| algorithms[i].clone()).collect(),
            test,
        }),
        None => Statistic::NotApplicable("insufficient samples".into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use moebench_core::algorithm::AlgorithmVariant;
    use moebench_core::algorithms::{RandomSearch, RandomSearchParams};
    use moebench_core::experiment::ExperimentBuilder;
    use moebench_core::indicator::{Measurement, UndefinedReason};
    use moebench_core::problem::{ExperimentProblem, Problem};
    use moebench_core::problems::{Zdt1, Zdt2};
    use moebench_core::table::CellKey;

    fn experiment(algorithms: &[&str], problems: &[&str]) -> Experiment {
        let algo = Arc::new(RandomSearch::new(
            Arc::new(Zdt1::new(2)),
            RandomSearchParams::default(),
        ));
        let mut builder = ExperimentBuilder::new("stats")
            .indicators(&["IGD", "HV"])
            .repetitions(5)
            .workers(1);
        for &p in problems {
            let problem: Arc<dyn Problem> = if p == "ZDT1" {
                Arc::new(Zdt1::new(2))
            } else {
                Arc::new(Zdt2::new(2))
            };
            builder = builder.problem(ExperimentProblem::new(problem, p));
            for &a in algorithms {
                builder = builder.variant(AlgorithmVariant::new(algo.clone(), a, p));
            }
        }
        builder.build().unwrap()
    }

    // `quality(algorithm index, run)`: lower index is better.
    fn fill(exp: &Experiment, quality: impl Fn(usize, usize) -> f64) -> IndicatorTable {
        let mut table = IndicatorTable::new();
        let tags = exp.algorithm_tags();
        for &indicator in exp.indicators() {
            for problem in exp.problems() {
                for (a, tag) in tags.iter().enumerate() {
                    for run in 0..exp.repetitions() {
                        let q = quality(a, run);
                        let value = if indicator.is_minimization() { q } else { 1.0 - q };
                        let key = CellKey {
                            indicator,
                            problem: problem.tag().to_string(),
                            algorithm: (*tag).to_string(),
                            run,
                        };
                        table.insert(key, Measurement::Defined(value)).unwrap();
                    }
                }
            }
        }
        table
    }

    #[allow(clippy::cast_precision_loss)]
    fn separated(a: usize, run: usize) -> f64 {
        0.1 + 0.3 * a as f64 + 0.01 * run as f64
    }

    #[test]
    fn consistent_winner_is_ranked_first() {
        let exp = experiment(&["A", "B", "C"], &["ZDT1"]);
        let report = compare(&exp, &fill(&exp, separated));
        for kind in [IndicatorKind::InvertedGenerationalDistance, IndicatorKind::Hypervolume] {
            let stats = report.for_problem(kind, "ZDT1").unwrap();
            let ranking = stats.friedman.computed().unwrap();
            assert!(ranking.significant);
            assert_eq!(ranking.ordering, vec!["A", "B", "C"]);
            assert!((ranking.test.statistic - 10.0).abs() < 1e-12);

            let pairs = stats.pairwise.computed().unwrap();
            assert_eq!(pairs.len(), 3);
            assert_eq!(pairs[0].first, "A");
            assert_eq!(pairs[0].second, "B");
            assert!(pairs[0].significant);
            assert_eq!(pairs[0].better.as_deref(), Some("A"));
            assert_eq!(pairs[2].better.as_deref(), Some("B"));
        }
    }

    #[test]
    fn summaries_cover_defined_values() {
        let exp = experiment(&["A", "B", "C"], &["ZDT1"]);
        let mut table = fill(&exp, separated);
        // replace a run of C with an undefined cell
        let mut rebuilt = IndicatorTable::new();
        for (key, value) in table.iter() {
            let value = if key.algorithm == "C" && key.run == 4 {
                Measurement::Undefined(UndefinedReason::EmptyApproximation)
            } else {
                value
            };
            rebuilt.insert(key.clone(), value).unwrap();
        }
        table = rebuilt;
        let report = compare(&exp, &table);
        let stats = report
            .for_problem(IndicatorKind::InvertedGenerationalDistance, "ZDT1")
            .unwrap();
        let c = &stats.summaries[2];
        assert_eq!(c.undefined, 1);
        assert_eq!(c.summary.unwrap().count, 4);
        // only four complete blocks remain
        assert_eq!(stats.friedman.computed().unwrap().test.blocks, 4);
    }

    #[test]
    fn identical_variants_are_not_significant() {
        let exp = experiment(&["A", "B", "C"], &["ZDT1"]);
        #[allow(clippy::cast_precision_loss)]
        let report = compare(&exp, &fill(&exp, |_, run| 0.1 * run as f64));
        let stats = report
            .for_problem(IndicatorKind::InvertedGenerationalDistance, "ZDT1")
            .unwrap();
        for pair in stats.pairwise.computed().unwrap() {
            assert_eq!(pair.test.computed().unwrap().p_value, 1.0);
            assert!(!pair.significant);
            assert!(pair.better.is_none());
        }
        let ranking = stats.friedman.computed().unwrap();
        assert!(!ranking.significant);
        assert_eq!(ranking.test.p_value, 1.0);
    }

    #[test]
    fn too_few_variants_are_not_applicable() {
        let exp = experiment(&["A"], &["ZDT1"]);
        let report = compare(&exp, &fill(&exp, separated));
        let stats = report
            .for_problem(IndicatorKind::Hypervolume, "ZDT1")
            .unwrap();
        assert!(matches!(stats.pairwise, Statistic::NotApplicable(_)));
        assert!(matches!(stats.friedman, Statistic::NotApplicable(_)));

        let exp = experiment(&["A", "B"], &["ZDT1"]);
        let report = compare(&exp, &fill(&exp, separated));
        let stats = report
            .for_problem(IndicatorKind::Hypervolume, "ZDT1")
            .unwrap();
        assert!(stats.pairwise.computed().is_some());
        assert!(matches!(stats.friedman, Statistic::NotApplicable(_)));
    }

    #[test]
    fn ranking_across_problems_uses_problem_means() {
        let exp = experiment(&["A", "B", "C"], &["ZDT1", "ZDT2"]);
        let report = compare(&exp, &fill(&exp, separated));
        let igd = &report.across_problems[0];
        assert_eq!(igd.indicator, IndicatorKind::InvertedGenerationalDistance);
        assert_eq!(igd.problems, vec!["ZDT1", "ZDT2"]);
        let ranking = igd.friedman.computed().unwrap();
        assert_eq!(ranking.ordering, vec!["A", "B", "C"]);
        assert_eq!(ranking.test.blocks, 2);

        let single = experiment(&["A", "B", "C"], &["ZDT1"]);
        let report = compare(&single, &fill(&single, separated));
        assert!(matches!(
            report.across_problems[0].friedman,
            Statistic::NotApplicable(_)
        ));
    }

    #[test]
    fn reports_are_deterministic() {
        let exp = experiment(&["A", "B", "C"], &["ZDT1", "ZDT2"]);
        let table = fill(&exp, separated);
        let a = compare(&exp, &table);
        let b = compare(&exp, &table);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
