//! CLI result presenter.

use moebench_orchestration::comparison::{
    IndicatorRanking, PairwiseComparison, ProblemStatistics, Ranking, Statistic, StatisticsReport,
};
use moebench_orchestration::interfaces::{ResultPresenter, Run};

use crate::output::{format_duration, format_p_value, format_score, NOT_APPLICABLE_MARKER};
use crate::ui;

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

/// Verdict of `row` against `column`: `+` when `row` is significantly
/// better, `-` when significantly worse, `=` otherwise.
fn verdict(pairs: &[PairwiseComparison], row: &str, column: &str) -> &'static str {
    let Some(pair) = pairs.iter().find(|p| {
        (p.first == row && p.second == column) || (p.first == column && p.second == row)
    }) else {
        return NOT_APPLICABLE_MARKER;
    };
    if pair.test.computed().is_none() {
        return NOT_APPLICABLE_MARKER;
    }
    match pair.better.as_deref() {
        Some(better) if pair.significant && better == row => "+",
        Some(_) if pair.significant => "-",
        _ => "=",
    }
}

/// Summary table of one (indicator, problem) pair.
#[must_use]
pub fn render_summaries(stats: &ProblemStatistics) -> String {
    let mut out = summary_row(["Algorithm", "Median", "IQR", "Mean", "Std", "Runs", "Undef"]);
    for variant in &stats.summaries {
        let undefined = variant.undefined.to_string();
        let row = match &variant.summary {
            Some(s) => summary_row([
                variant.algorithm.as_str(),
                format_score(s.median).as_str(),
                format_score(s.iqr).as_str(),
                format_score(s.mean).as_str(),
                format_score(s.std_dev).as_str(),
                s.count.to_string().as_str(),
                undefined.as_str(),
            ]),
            None => summary_row([
                variant.algorithm.as_str(),
                NOT_APPLICABLE_MARKER,
                NOT_APPLICABLE_MARKER,
                NOT_APPLICABLE_MARKER,
                NOT_APPLICABLE_MARKER,
                "0",
                undefined.as_str(),
            ]),
        };
        out.push_str(&row);
    }
    out
}

fn summary_row(cells: [&str; 7]) -> String {
    let [name, median, iqr, mean, std, runs, undefined] = cells;
    format!("  {name:<20} {median:>12} {iqr:>12} {mean:>12} {std:>12} {runs:>6} {undefined:>6}\n")
}

/// Upper-triangular matrix of rank-sum verdicts.
#[must_use]
pub fn render_pairwise(stats: &ProblemStatistics) -> String {
    pairwise_table(stats, str::to_string)
}

fn pairwise_table(stats: &ProblemStatistics, paint: impl Fn(&str) -> String) -> String {
    const WIDTH: usize = 12;
    let pairs = match &stats.pairwise {
        Statistic::Computed(pairs) => pairs,
        Statistic::NotApplicable(reason) => {
            return format!("  Rank-sum: {NOT_APPLICABLE_MARKER} ({reason})\n");
        }
    };
    let names: Vec<&str> = stats.summaries.iter().map(|s| s.algorithm.as_str()).collect();
    if names.len() < 2 {
        return String::new();
    }
    let mut out = format!("  {:<20}", "Rank-sum");
    for column in &names[1..] {
        out.push_str(&format!(" {column:>WIDTH$}"));
    }
    out.push('\n');
    for (i, row) in names[..names.len() - 1].iter().enumerate() {
        out.push_str(&format!("  {row:<20}"));
        for (j, column) in names.iter().enumerate().skip(1) {
            let cell = if j > i { verdict(pairs, row, column) } else { "" };
            let pad = WIDTH.saturating_sub(cell.len());
            out.push_str(&format!(" {}{}", " ".repeat(pad), paint(cell)));
        }
        out.push('\n');
    }
    out
}

fn render_ranking(label: &str, ranking: &Statistic<Ranking>) -> String {
    match ranking {
        Statistic::Computed(r) => {
            let ordered: Vec<String> = r
                .test
                .ordering
                .iter()
                .map(|&i| format!("{} ({:.2})", r.algorithms[i], r.test.average_ranks[i]))
                .collect();
            format!(
                "  {label}: Q = {:.4}, df = {}, p = {}{}\n    {}\n",
                r.test.statistic,
                r.test.degrees_of_freedom,
                format_p_value(r.test.p_value),
                if r.significant { " (significant)" } else { "" },
                ordered.join(" < ")
            )
        }
        Statistic::NotApplicable(reason) => {
            format!("  {label}: {NOT_APPLICABLE_MARKER} ({reason})\n")
        }
    }
}

/// Full block for one (indicator, problem) pair.
#[must_use]
pub fn render_problem(stats: &ProblemStatistics) -> String {
    let mut out = render_summaries(stats);
    out.push_str(&render_pairwise(stats));
    out.push_str(&render_ranking("Friedman", &stats.friedman));
    out
}

/// Ranking of algorithms across problems.
#[must_use]
pub fn render_across(ranking: &IndicatorRanking) -> String {
    let label = format!("Friedman over {} problems", ranking.problems.len());
    render_ranking(&label, &ranking.friedman)
}

impl ResultPresenter for CLIResultPresenter {
    fn present_runs(&self, runs: &[Run]) {
        if self.quiet {
            return;
        }
        let failed: Vec<&Run> = runs.iter().filter(|r| !r.succeeded()).collect();
        let succeeded = runs.len() - failed.len();
        ui::print_success(&format!("{succeeded} of {} runs succeeded", runs.len()));
        if failed.is_empty() {
            return;
        }
        ui::print_warning(&format!("{} runs failed", failed.len()));
        if self.verbose {
            for run in failed {
                if let Err(err) = &run.outcome {
                    eprintln!(
                        "  {:<20} {:<12} run {:>3} [{}] {err}",
                        run.algorithm,
                        run.problem,
                        run.run,
                        format_duration(run.duration)
                    );
                }
            }
        }
    }

    fn present_statistics(&self, report: &StatisticsReport) {
        if self.quiet {
            return;
        }
        for stats in &report.per_problem {
            println!();
            ui::print_header(&format!("{} on {}", stats.indicator, stats.problem));
            let summaries = render_summaries(stats);
            print!("{summaries}");
            print!("{}", pairwise_table(stats, ui::paint_verdict));
            print!("{}", render_ranking("Friedman", &stats.friedman));
        }
        if report.across_problems.is_empty() {
            return;
        }
        println!();
        ui::print_header(&format!("Across problems (alpha = {})", report.significance_level));
        for ranking in &report.across_problems {
            println!("{}", ranking.indicator);
            print!("{}", render_across(ranking));
        }
    }

    fn present_error(&self, error: &str) {
        ui::print_error(error);
    }
}
