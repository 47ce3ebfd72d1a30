use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use polycover::conflict::ConflictCfg;
use polycover::removal::{RemovalCfg, RemovalOrder};
use polycover::verify::verify;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod batch;
mod io;
mod provenance;

use batch::{run_batch, summary_totals, write_summary, Init, SolveOpts};

#[derive(Parser)]
#[command(name = "polycover")]
#[command(about = "Cover polygons with holes by few convex pieces")]
struct Cmd {
    /// Log at DEBUG level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve instance files (names read from stdin when none are given)
    Solve(SolveArgs),
    /// Check a solution file against its instance
    Verify {
        #[arg(long)]
        instance: PathBuf,
        #[arg(long)]
        solution: PathBuf,
    },
    /// Print a small provenance JSON block
    Report {
        /// Summary CSV from an earlier `solve --summary`
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Reverse,
    Shuffled,
    Score,
}

impl From<Order> for RemovalOrder {
    fn from(o: Order) -> Self {
        match o {
            Order::Reverse => RemovalOrder::Reverse,
            Order::Shuffled => RemovalOrder::Shuffled,
            Order::Score => RemovalOrder::ByScore,
        }
    }
}

#[derive(Args)]
struct SolveArgs {
    files: Vec<PathBuf>,
    #[arg(long, default_value = "solutions")]
    out_dir: PathBuf,
    /// Starting cover
    #[arg(long, value_enum, default_value_t = Init::Triangulate)]
    init: Init,
    /// Worker threads; 0 = one per core
    #[arg(long, default_value_t = 0)]
    threads: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Shuffle replacement candidates
    #[arg(long)]
    randomize: bool,
    /// Shrink pieces to what is needed before expanding
    #[arg(long)]
    minimize: bool,
    /// Candidates per removal; 0 = all
    #[arg(long, default_value_t = 0)]
    replacement_choices: usize,
    /// Removals per sweep; 0 = all
    #[arg(long, default_value_t = 0)]
    removal_attempts: usize,
    #[arg(long, value_enum, default_value_t = Order::Reverse)]
    order: Order,
    #[arg(long, default_value_t = 1)]
    sweeps: usize,
    /// Run the conflict optimizer after the removal sweeps
    #[arg(long)]
    optimize: bool,
    #[arg(long, default_value_t = 16)]
    max_attempts: usize,
    #[arg(long, default_value_t = 64)]
    max_iters: usize,
    #[arg(long, default_value_t = 8)]
    max_greedy_update: usize,
    /// 0 = no limit
    #[arg(long, default_value_t = 0)]
    max_cover_size: usize,
    /// 0 = all
    #[arg(long, default_value_t = 0)]
    max_candidates: usize,
    /// Start from an existing valid solution when it is smaller
    #[arg(long)]
    resume: bool,
    /// Per-instance table (CSV, or Parquet for `.parquet`)
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl SolveArgs {
    fn opts(&self) -> SolveOpts {
        SolveOpts {
            out_dir: self.out_dir.clone(),
            init: self.init,
            removal: RemovalCfg {
                randomize: self.randomize,
                minimize: self.minimize,
                replacement_choices: self.replacement_choices,
                removal_attempts: self.removal_attempts,
                order: self.order.into(),
            },
            sweeps: self.sweeps,
            conflict: self.optimize.then(|| ConflictCfg {
                max_attempts: self.max_attempts,
                max_iters: self.max_iters,
                max_greedy_update: self.max_greedy_update,
                max_cover_size: self.max_cover_size,
                max_candidates: self.max_candidates,
            }),
            seed: self.seed,
            resume: self.resume,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve(args) => solve(args),
        Action::Verify { instance, solution } => check(instance, solution),
        Action::Report { summary } => report(summary),
    }
}

fn solve(args: SolveArgs) -> Result<()> {
    let mut files = args.files.clone();
    if files.is_empty() {
        for line in std::io::stdin().lock().lines() {
            files.extend(line?.split_whitespace().map(PathBuf::from));
        }
    }
    if files.is_empty() {
        bail!("no instance files given");
    }
    let report = run_batch(&files, &args.opts(), args.threads)?;
    if let Some(path) = &args.summary {
        write_summary(path, &report.summaries)?;
    }
    for s in &report.summaries {
        eprintln!(
            "{}: {} -> {} -> {} pieces ({})",
            s.instance, s.initial, s.after_removal, s.final_size, s.outcome
        );
    }
    if report.failures > 0 {
        let total = report.failures + report.summaries.len();
        bail!("{} of {total} file(s) failed", report.failures);
    }
    Ok(())
}

fn check(instance: PathBuf, solution: PathBuf) -> Result<()> {
    let instance = io::read_instance(&instance)?;
    let loaded = io::read_solution(&solution)?;
    if loaded.instance != instance.name() {
        tracing::warn!(
            solution = loaded.instance.as_str(),
            instance = instance.name(),
            "solution names another instance"
        );
    }
    match verify(&instance, &loaded.cover) {
        Ok(()) => {
            println!("valid: {} pieces", loaded.cover.len());
            Ok(())
        }
        Err(e) => bail!("invalid: {e}"),
    }
}

fn report(summary: Option<PathBuf>) -> Result<()> {
    let totals = match &summary {
        Some(path) => {
            let (instances, pieces) = summary_totals(path)?;
            serde_json::json!({ "instances": instances, "pieces": pieces })
        }
        None => serde_json::Value::Null,
    };
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": polycover::VERSION,
        "params": {},
        "summary": totals,
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
