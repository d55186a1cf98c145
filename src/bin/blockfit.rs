//! blockfit CLI
//!
//! Runs a randomised workload against one or all placement strategies and
//! prints the memory state and external fragmentation after every step.

use anyhow::Context;
use blockfit::{Simulation, StepAction, Strategy, StrategyReport, Workload};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "blockfit")]
#[command(about = "Compare memory placement strategies on a random workload")]
struct Args {
    /// Workload file (TOML, or JSON with a .json extension)
    #[arg(short = 'w', long)]
    workload: Option<PathBuf>,

    /// Strategy to run (first-fit, next-fit, best-fit, worst-fit, quick-fit) [default: all]
    #[arg(short = 's', long)]
    strategy: Option<String>,

    /// RNG seed (overrides the workload)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of operations per strategy (overrides the workload)
    #[arg(short = 'n', long)]
    operations: Option<usize>,

    /// Memory size in blocks (overrides the workload)
    #[arg(short = 'c', long)]
    capacity: Option<usize>,

    /// Print reports as JSON instead of step-by-step text
    #[arg(long)]
    json: bool,
}

/// Build the workload from the file (or the default) plus CLI overrides
fn load_workload(args: &Args) -> anyhow::Result<Workload> {
    let mut workload = match &args.workload {
        Some(path) => Workload::load(path)
            .with_context(|| format!("failed to load workload {:?}", path))?,
        None => Workload::default(),
    };

    if let Some(seed) = args.seed {
        workload = workload.with_seed(seed);
    }
    if let Some(operations) = args.operations {
        workload = workload.with_operations(operations);
    }
    if let Some(capacity) = args.capacity {
        workload = workload.with_capacity(capacity);
    }

    Ok(workload)
}

fn describe(action: &StepAction) -> String {
    match *action {
        StepAction::Allocated { pid, size, start } => {
            format!("Process {} ({} blocks) allocated at index {}.", pid, size, start)
        }
        StepAction::AllocationFailed { pid, size } => {
            format!("Error: process {} ({} blocks) could not be allocated.", pid, size)
        }
        StepAction::Deallocated { pid, .. } => format!("Process {} deallocated.", pid),
    }
}

fn print_report(report: &StrategyReport) {
    println!("\n== Strategy: {} ==", report.strategy);
    for step in &report.steps {
        println!("{}", describe(&step.action));
        println!("Memory: {:?}", step.memory);
        println!("External fragmentation: {}", step.fragmentation);
    }
}

fn print_summary(reports: &[StrategyReport]) {
    println!("\n== Summary ==");
    for report in reports {
        println!(
            "{:<10} allocations={:<3} failures={:<3} deallocations={:<3} failure_rate={:.2} mean_fragmentation={:.2} final_fragmentation={}",
            report.strategy.name(),
            report.allocations,
            report.failures,
            report.deallocations,
            report.failure_rate(),
            report.mean_fragmentation(),
            report.final_fragmentation
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let workload = load_workload(&args)?;
    let simulation = Simulation::new(workload)?;

    info!("Seed: {}", simulation.seed());

    let reports = match &args.strategy {
        Some(name) => {
            let strategy: Strategy = name.parse()?;
            vec![simulation.run(strategy)?]
        }
        None => simulation.run_all()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("Seed: {}", simulation.seed());
    for report in &reports {
        print_report(report);
    }
    print_summary(&reports);

    Ok(())
}
