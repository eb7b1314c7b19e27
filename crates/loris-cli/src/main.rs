use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use miette::{IntoDiagnostic, Report};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use loris_engine::{
    generate_pattern_collection, CegarOptions, GenerationReport, GenerationResult,
    InitialCollection, Plan,
};
use loris_task::{Task, Verbosity};

mod cli;
use cli::{Cli, Commands};

/// Exit code when a pattern is proven unsolvable.
const EXIT_UNSOLVABLE: u8 = 11;
/// Exit code for invalid tasks or configuration.
const EXIT_INPUT_ERROR: u8 = 33;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = match cli.verbosity.parse::<Verbosity>() {
        Ok(verbosity) => verbosity,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(EXIT_INPUT_ERROR);
        }
    };
    init_tracing(verbosity);

    let outcome = match cli.command {
        Commands::Generate {
            file,
            seed,
            max_refinements,
            max_pdb_size,
            max_collection_size,
            wildcard_plans,
            ignore_goal_violations,
            global_blacklist_size,
            initial,
            given_goal,
            max_time,
            json,
        } => run_generate(GenerateArgs {
            file,
            seed,
            max_refinements,
            max_pdb_size,
            max_collection_size,
            wildcard_plans,
            ignore_goal_violations,
            global_blacklist_size,
            initial,
            given_goal,
            max_time,
            json,
            verbosity,
        }),
        Commands::Validate { file } => run_validate(&file),
    };

    match outcome {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: Verbosity) {
    let default_filter = match verbosity {
        Verbosity::Silent => "warn",
        Verbosity::Normal => "info",
        Verbosity::Verbose => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

struct GenerateArgs {
    file: std::path::PathBuf,
    seed: u64,
    max_refinements: Option<u64>,
    max_pdb_size: u64,
    max_collection_size: Option<u64>,
    wildcard_plans: bool,
    ignore_goal_violations: bool,
    global_blacklist_size: String,
    initial: String,
    given_goal: Option<usize>,
    max_time: Option<f64>,
    json: bool,
    verbosity: Verbosity,
}

fn run_generate(args: GenerateArgs) -> miette::Result<ExitCode> {
    let task = match load_task(&args.file) {
        Ok(task) => task,
        Err(message) => {
            eprintln!("error: {message}");
            return Ok(ExitCode::from(EXIT_INPUT_ERROR));
        }
    };

    let global_blacklist_size = match args.global_blacklist_size.as_str() {
        "all" => usize::MAX,
        count => count
            .parse::<usize>()
            .map_err(|_| Report::msg(format!("invalid --global-blacklist-size '{count}'")))?,
    };
    let initial = args
        .initial
        .parse::<InitialCollection>()
        .map_err(Report::msg)?;
    let max_time = match args.max_time {
        Some(secs) if secs < 0.0 => {
            return Err(Report::msg("--max-time must be non-negative"));
        }
        Some(secs) => Some(Duration::from_secs_f64(secs)),
        None => None,
    };

    let options = CegarOptions {
        max_refinements: args.max_refinements.unwrap_or(u64::MAX),
        max_pdb_size: args.max_pdb_size,
        max_collection_size: args.max_collection_size.unwrap_or(u64::MAX),
        wildcard_plans: args.wildcard_plans,
        ignore_goal_violations: args.ignore_goal_violations,
        global_blacklist_size,
        initial,
        given_goal: args.given_goal,
        max_time,
        verbosity: args.verbosity,
    };

    let rng = ChaCha8Rng::seed_from_u64(args.seed);
    match generate_pattern_collection(&task, options, rng) {
        Ok(result) => {
            print_result(&task, &result, args.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_unsolvable() => {
            eprintln!("error: {err}");
            Ok(ExitCode::from(EXIT_UNSOLVABLE))
        }
        Err(err) if err.is_input_error() => {
            eprintln!("error: {err}");
            Ok(ExitCode::from(EXIT_INPUT_ERROR))
        }
        Err(err) => Err(Report::msg(err.to_string())),
    }
}

fn run_validate(file: &Path) -> miette::Result<ExitCode> {
    match load_task(file) {
        Ok(task) => {
            println!(
                "task is valid: {} variables, {} goals, {} operators",
                task.num_variables(),
                task.goal.len(),
                task.operators.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            eprintln!("error: {message}");
            Ok(ExitCode::from(EXIT_INPUT_ERROR))
        }
    }
}

fn load_task(file: &Path) -> Result<Task, String> {
    let source = fs::read_to_string(file)
        .map_err(|err| format!("cannot read {}: {err}", file.display()))?;
    Task::from_json_str(&source).map_err(|err| format!("{}: {err}", file.display()))
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a GenerationReport,
    concrete_plan: Option<&'a Plan>,
}

fn print_result(task: &Task, result: &GenerationResult, json: bool) -> miette::Result<()> {
    if json {
        let output = JsonOutput {
            report: &result.report,
            concrete_plan: result.concrete_plan.as_ref(),
        };
        let rendered = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{rendered}");
        return Ok(());
    }

    let report = &result.report;
    println!("termination: {:?}", report.termination);
    println!("refinements: {}", report.refinements);
    println!("elapsed: {:.3}s", report.elapsed_secs);
    println!(
        "collection: {} pattern(s), {} abstract states",
        report.patterns.len(),
        report.collection_size
    );
    for pattern in &report.patterns {
        println!("  {pattern}");
    }
    if let Some(plan) = &result.concrete_plan {
        println!("concrete plan ({} step(s), cost {}):", plan.len(), plan.cost);
        for &op in &plan.operators {
            println!("  {}", task.operators[op].name);
        }
    }
    Ok(())
}
