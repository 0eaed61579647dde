//! Driver: multiply two random matrices with each executor and time it.

use std::time::Instant;

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{SeedableRng, random};
use tracing::info;

use matmul_tasks::{Matrix, Strategy, multiply};

/// Multiply a random rows×cols matrix by a random cols×rows matrix,
/// splitting the output into chunks that run concurrently.
#[derive(Parser, Debug)]
#[command(name = "matmul-tasks", about = "Compare thread-per-task and thread-pool matrix multiplication")]
struct Args {
    /// Rows of A (and of the rows×rows result)
    #[arg(long, default_value = "90", env = "MATMUL_ROWS")]
    rows: usize,

    /// Columns of A, rows of B
    #[arg(long, default_value = "90", env = "MATMUL_COLS")]
    cols: usize,

    /// Number of chunks the output is split into (and pool size)
    #[arg(long, default_value = "35", env = "MATMUL_TASKS")]
    tasks: usize,

    /// Seed for the input matrices (random if not set)
    #[arg(long)]
    seed: Option<u64>,

    /// Which executor(s) to run
    #[arg(long, value_enum, default_value = "both")]
    executor: Executor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Executor {
    Threads,
    Pool,
    Both,
}

impl Executor {
    fn strategies(self) -> &'static [Strategy] {
        match self {
            Executor::Threads => &[Strategy::ThreadPerTask],
            Executor::Pool => &[Strategy::Pool],
            Executor::Both => &Strategy::ALL,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    ensure!(args.tasks >= 1, "--tasks must be at least 1");

    let seed = args.seed.unwrap_or_else(random);
    info!(rows = args.rows, cols = args.cols, tasks = args.tasks, seed, "generating inputs");

    let mut rng = StdRng::seed_from_u64(seed);
    let a = Matrix::random(args.rows, args.cols, &mut rng);
    let b = Matrix::random(args.cols, args.rows, &mut rng);

    let mut results = Vec::new();
    for &strategy in args.executor.strategies() {
        // Fresh output for every run.
        let mut c = Matrix::zeros(args.rows, args.rows);

        let start = Instant::now();
        multiply(strategy, &a, &b, &mut c, args.tasks)
            .with_context(|| format!("multiplication with {strategy} failed"))?;
        let elapsed = start.elapsed();

        println!(
            "Time with {}: {:.3} ms",
            strategy,
            elapsed.as_secs_f64() * 1000.0
        );
        results.push((strategy, c));
    }

    if let [(_, first), (_, second)] = results.as_slice() {
        if first == second {
            println!("Results match.");
        } else {
            anyhow::bail!("executors produced different results");
        }
    }

    Ok(())
}
