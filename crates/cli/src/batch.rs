//! Batch driver: solve many instance files on a worker pool.
//!
//! Each file runs initial cover (triangulation or flood) -> removal sweeps
//! -> optional conflict optimizer -> verify -> write-if-better,
//! single-threaded. Files are
//! independent; a failure in one is logged and counted and the rest go on.

use anyhow::{Context, Result};
use clap::ValueEnum;
use polars::prelude::*;
use polycover::conflict::{conflict_optimizer, ConflictCfg};
use polycover::flood::flood_init;
use polycover::removal::{try_remove_all, RemovalCfg};
use polycover::rng::ReplayToken;
use polycover::triangulate::basic_triangulation;
use polycover::verify::verify;
use rayon::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::io::{read_instance, read_solution, solution_path, write_if_better, WriteOutcome};
use crate::provenance::{write_sidecar, Payload};

/// How the starting cover is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Init {
    /// One piece per triangle of the constrained triangulation.
    #[default]
    Triangulate,
    /// Ray-cast floods from every region vertex.
    Flood,
}

#[derive(Clone, Debug)]
pub struct SolveOpts {
    pub out_dir: PathBuf,
    pub init: Init,
    pub removal: RemovalCfg,
    /// Removal sweeps per instance; stops early once a sweep removes nothing.
    pub sweeps: usize,
    pub conflict: Option<ConflictCfg>,
    pub seed: u64,
    /// Start from the solution already on disk when it is valid and smaller.
    pub resume: bool,
}

impl Default for SolveOpts {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("solutions"),
            init: Init::Triangulate,
            removal: RemovalCfg::default(),
            sweeps: 1,
            conflict: None,
            seed: 0,
            resume: false,
        }
    }
}

/// One row of the batch summary.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSummary {
    pub file: String,
    pub instance: String,
    pub vertices: usize,
    /// Size of the starting cover.
    pub initial: usize,
    pub after_removal: usize,
    pub final_size: usize,
    pub outcome: String,
    pub millis: u64,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub summaries: Vec<InstanceSummary>,
    pub failures: usize,
}

/// Solve one instance file; `index` picks its random stream.
pub fn solve_file(path: &Path, index: u64, opts: &SolveOpts) -> Result<InstanceSummary> {
    let started = Instant::now();
    let instance = read_instance(path)?;
    tracing::info!(instance = instance.name(), file = %path.display(), "read");

    let mut cover = match opts.init {
        Init::Triangulate => basic_triangulation(&instance),
        Init::Flood => flood_init(&instance),
    };
    let initial = cover.len();
    tracing::info!(
        instance = instance.name(),
        init = ?opts.init,
        pieces = initial,
        "initial cover"
    );

    let out_path = solution_path(&opts.out_dir, instance.name());
    if opts.resume && out_path.exists() {
        match read_solution(&out_path) {
            Ok(prior)
                if prior.cover.len() < cover.len() && verify(&instance, &prior.cover).is_ok() =>
            {
                tracing::info!(instance = instance.name(), pieces = prior.cover.len(), "resuming");
                cover = prior.cover;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "cannot resume"),
        }
    }

    let mut rng = ReplayToken::new(opts.seed, index).to_std_rng();
    for sweep in 0..opts.sweeps.max(1) {
        if try_remove_all(&instance, &mut cover, &opts.removal, &mut rng) == 0 {
            tracing::debug!(sweep, "sweep removed nothing");
            break;
        }
    }
    let after_removal = cover.len();

    if let Some(cfg) = &opts.conflict {
        let report = conflict_optimizer(&instance, &mut cover, cfg, &mut rng);
        tracing::info!(
            instance = instance.name(),
            attempts = report.attempts,
            commits = report.commits,
            pieces = report.best_size,
            "conflict optimizer done"
        );
    }

    let outcome = write_if_better(&instance, &cover, &out_path)?;
    let label = match &outcome {
        WriteOutcome::Written { previous } => {
            tracing::info!(
                instance = instance.name(),
                pieces = cover.len(),
                previous = ?previous,
                "written"
            );
            write_sidecar(
                &out_path,
                Payload {
                    instance: instance.name().to_string(),
                    seed: opts.seed,
                    params: json!({
                        "index": index,
                        "removal": format!("{:?}", opts.removal),
                        "sweeps": opts.sweeps,
                        "conflict": opts.conflict.as_ref().map(|c| format!("{c:?}")),
                        "init": format!("{:?}", opts.init),
                        "initial": initial,
                        "after_removal": after_removal,
                        "final_size": cover.len(),
                    }),
                },
            )?;
            "written".to_string()
        }
        WriteOutcome::KeptExisting { existing } => {
            tracing::info!(
                instance = instance.name(),
                pieces = cover.len(),
                existing,
                "kept existing"
            );
            "kept".to_string()
        }
        WriteOutcome::Rejected(e) => {
            tracing::error!(instance = instance.name(), error = %e, "invalid cover, not written");
            format!("rejected: {e}")
        }
    };

    Ok(InstanceSummary {
        file: path.display().to_string(),
        instance: instance.name().to_string(),
        vertices: instance.region().vertex_count(),
        initial,
        after_removal,
        final_size: cover.len(),
        outcome: label,
        millis: started.elapsed().as_millis() as u64,
    })
}

/// Solve all files on `threads` workers (0 = one per core).
///
/// Duplicate paths are dropped up front so no two workers write the same
/// solution. Per-file errors are logged and counted.
pub fn run_batch(files: &[PathBuf], opts: &SolveOpts, threads: usize) -> Result<BatchReport> {
    let mut seen = HashSet::new();
    let files: Vec<&PathBuf> = files.iter().filter(|f| seen.insert(*f)).collect();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("building worker pool")?;
    tracing::info!(files = files.len(), threads = pool.current_num_threads(), "batch");

    let results: Vec<(&PathBuf, Result<InstanceSummary>)> = pool.install(|| {
        files
            .par_iter()
            .enumerate()
            .map(|(i, f)| (*f, solve_file(f, i as u64, opts)))
            .collect()
    });

    let mut report = BatchReport::default();
    for (file, result) in results {
        match result {
            Ok(summary) => report.summaries.push(summary),
            Err(e) => {
                report.failures += 1;
                tracing::error!(file = %file.display(), error = %format!("{e:#}"), "failed");
            }
        }
    }
    tracing::info!(
        solved = report.summaries.len(),
        failed = report.failures,
        "batch finished"
    );
    Ok(report)
}

fn summary_frame(summaries: &[InstanceSummary]) -> PolarsResult<DataFrame> {
    let strings = |f: fn(&InstanceSummary) -> &str| -> Vec<String> {
        summaries.iter().map(|s| f(s).to_string()).collect()
    };
    let counts = |f: fn(&InstanceSummary) -> usize| -> Vec<u64> {
        summaries.iter().map(|s| f(s) as u64).collect()
    };
    df!(
        "file" => strings(|s| s.file.as_str()),
        "instance" => strings(|s| s.instance.as_str()),
        "vertices" => counts(|s| s.vertices),
        "initial" => counts(|s| s.initial),
        "after_removal" => counts(|s| s.after_removal),
        "final_size" => counts(|s| s.final_size),
        "outcome" => strings(|s| s.outcome.as_str()),
        "millis" => summaries.iter().map(|s| s.millis).collect::<Vec<u64>>()
    )
}

/// Write the per-instance table as CSV, or Parquet for a `.parquet` path.
pub fn write_summary(path: &Path, summaries: &[InstanceSummary]) -> Result<()> {
    let mut df = summary_frame(summaries)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if path.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(file).finish(&mut df)?;
    } else {
        CsvWriter::new(file).include_header(true).finish(&mut df)?;
    }
    tracing::info!(path = %path.display(), rows = df.height(), "summary");
    Ok(())
}

/// Totals over a summary CSV: `(instances, pieces)`.
pub fn summary_totals(path: &Path) -> Result<(i64, i64)> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([
            col("instance").count().cast(DataType::Int64).alias("instances"),
            col("final_size").cast(DataType::Int64).sum().alias("pieces"),
        ])
        .collect()?;
    let instances = df.column("instances")?.i64()?.get(0).unwrap_or(0);
    let pieces = df.column("pieces")?.i64()?.get(0).unwrap_or(0);
    Ok((instances, pieces))
}
