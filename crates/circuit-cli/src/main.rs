// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Circuit CLI
//!
//! Reads a cost matrix (`n` followed by `n x n` costs) from a file or stdin,
//! solves it exactly and prints every improving tour to stdout. The last
//! line printed is the optimal tour.

use anyhow::{Context, Result};
use circuit_bnb::{
    bnb::BnbSolver,
    monitor::{
        composite::CompositeTreeSearchMonitor, improvement::ImprovementWriter,
        log::LogTreeSearchMonitor, node_limit::NodeLimitMonitor, time_limit::TimeLimitMonitor,
    },
    pivot::{PivotRule, first_zero::FirstZeroPivotRule, regret::RegretPivotRule},
    result::{BnbSolverOutcome, SolverResult},
};
use circuit_model::{loading::MatrixLoader, matrix::DistanceMatrix};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info, warn};
use std::{io, path::PathBuf, process::ExitCode, time::Duration};

type Cost = i64;

/// Which edge to branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PivotChoice {
    /// Zero cell whose exclusion raises the bound the most.
    Regret,
    /// First undecided zero cell in row-major order.
    FirstZero,
}

/// Exact solver for the directed travelling salesman problem.
#[derive(Parser, Debug)]
#[command(name = "circuit", author, version, about, long_about = None)]
struct Cli {
    /// Instance file; reads stdin when omitted
    #[arg(value_name = "INPUT_FILE")]
    input: Option<PathBuf>,

    /// Stop after this many seconds and report the best tour so far
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Stop after exploring this many search nodes
    #[arg(long, value_name = "NODES")]
    node_limit: Option<u64>,

    /// Only report tours strictly cheaper than this cost
    #[arg(long, value_name = "COST")]
    upper_bound: Option<Cost>,

    /// Pivot selection rule
    #[arg(long, value_enum, default_value_t = PivotChoice::Regret)]
    pivot: PivotChoice,

    /// Treat every cost at or above this value as a missing edge
    #[arg(long, value_name = "COST")]
    forbid_at_least: Option<Cost>,

    /// Print search statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn load(cli: &Cli) -> Result<DistanceMatrix<Cost>> {
    let mut loader = MatrixLoader::<Cost>::new();
    if let Some(limit) = cli.forbid_at_least {
        loader = loader.forbid_at_least(limit);
    }

    match &cli.input {
        Some(path) => loader
            .from_path(path)
            .with_context(|| format!("failed to load instance from {}", path.display())),
        None => loader
            .from_reader(io::stdin().lock())
            .context("failed to load instance from stdin"),
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let matrix = load(cli)?;
    info!(
        "Loaded {} nodes ({} possible tours)",
        matrix.num_nodes(),
        matrix.complexity()
    );

    let mut boxed_rule: Box<dyn PivotRule<Cost>> = match cli.pivot {
        PivotChoice::Regret => Box::new(RegretPivotRule::preallocated(matrix.num_nodes())),
        PivotChoice::FirstZero => Box::new(FirstZeroPivotRule::new()),
    };
    let mut rule = boxed_rule.as_mut();

    let mut writer = ImprovementWriter::<Cost, _>::new(io::stdout().lock());
    let outcome = {
        let mut monitor = CompositeTreeSearchMonitor::<Cost>::with_capacity(4);
        if let Some(seconds) = cli.time_limit {
            let limit = Duration::try_from_secs_f64(seconds)
                .with_context(|| format!("invalid time limit: {}", seconds))?;
            monitor.add_monitor(TimeLimitMonitor::<Cost>::with_default_check_interval(limit));
        }
        if let Some(nodes) = cli.node_limit {
            monitor.add_monitor(NodeLimitMonitor::<Cost>::new(nodes));
        }
        monitor.add_monitor(&mut writer);
        monitor.add_monitor(LogTreeSearchMonitor::<Cost>::default());

        let mut solver = BnbSolver::new();
        match cli.upper_bound {
            Some(bound) => solver.solve_with_upper_bound(&matrix, &mut rule, monitor, bound),
            None => solver.solve_with_rule(&matrix, &mut rule, monitor),
        }
    };
    writer
        .into_inner()
        .context("failed to write tours to stdout")?;

    report(cli, &matrix, &outcome);

    Ok(match outcome.result() {
        SolverResult::Optimal(_) | SolverResult::Feasible(_) => ExitCode::SUCCESS,
        SolverResult::Infeasible => {
            match cli.upper_bound {
                Some(bound) => eprintln!("no tour cheaper than {}", bound),
                None => eprintln!("no tour exists"),
            }
            ExitCode::from(2)
        }
        SolverResult::Unknown => {
            eprintln!("no tour found before the search was stopped");
            ExitCode::from(3)
        }
    })
}

fn report(cli: &Cli, matrix: &DistanceMatrix<Cost>, outcome: &BnbSolverOutcome<Cost>) {
    if outcome.is_optimal() {
        info!("{}", outcome);
    } else {
        warn!("{}", outcome);
    }

    if cli.stats {
        let stats = outcome.statistics();
        let complexity = matrix.complexity();
        eprint!("{}", stats);
        eprintln!("  Tour space:           {}", complexity);
        if let Some(coverage) = complexity.coverage(stats.nodes_explored) {
            eprintln!("  Nodes vs. tour space: {:.6}%", coverage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_all_options() {
        let cli = Cli::try_parse_from([
            "circuit",
            "data/classic4.txt",
            "--time-limit",
            "2.5",
            "--node-limit",
            "1000",
            "--pivot",
            "first-zero",
            "--forbid-at-least",
            "9999",
            "--upper-bound",
            "40",
            "--stats",
            "-vv",
        ])
        .expect("valid arguments");

        assert_eq!(cli.input, Some(PathBuf::from("data/classic4.txt")));
        assert_eq!(cli.time_limit, Some(2.5));
        assert_eq!(cli.node_limit, Some(1000));
        assert_eq!(cli.pivot, PivotChoice::FirstZero);
        assert_eq!(cli.forbid_at_least, Some(9999));
        assert_eq!(cli.upper_bound, Some(40));
        assert!(cli.stats);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["circuit"]).expect("no arguments are required");
        assert_eq!(cli.input, None);
        assert_eq!(cli.pivot, PivotChoice::Regret);
        assert!(!cli.stats);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_rejects_unknown_pivot() {
        assert!(Cli::try_parse_from(["circuit", "--pivot", "random"]).is_err());
    }
}
