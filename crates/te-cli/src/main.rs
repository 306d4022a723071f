//! TrigEff CLI

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use te_analysis::{run_scan, solve_thresholds};
use te_core::{Binning, QuantitySpec, SampleKind, ScanSpec};
use te_tables::{FileTableProvider, TableProvider};
use te_viz::{
    ArtifactInputMeta, ArtifactMeta, DistributionsArtifact, EfficiencyArtifact,
    RateCurveArtifact, ResolutionArtifact, ThresholdsArtifact,
};

mod spec_file;

use spec_file::read_scan_spec;

#[derive(Parser)]
#[command(name = "trigeff")]
#[command(about = "TrigEff - Fixed-rate L1 trigger thresholds and efficiencies")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every configuration's tables into the cache
    Extract {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Override the spec's cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Re-extract even when cached tables exist
        #[arg(long)]
        force: bool,
    },

    /// Rate-curve artifact for one quantity
    Rates {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Quantity name (defaults to the only configured quantity)
        #[arg(short, long)]
        quantity: Option<String>,

        /// Output file for the artifact (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Use 1 for deterministic output.
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Solved fixed-rate threshold sets
    Thresholds {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output file for the artifact (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Use 1 for deterministic output.
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Efficiency artifact for one quantity
    Efficiency {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Quantity name (defaults to the only configured quantity)
        #[arg(short, long)]
        quantity: Option<String>,

        /// Output file for the artifact (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Use 1 for deterministic output.
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Full pipeline: every artifact into an output directory
    Scan {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory for the artifacts
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Allow writing into a non-empty output directory
        #[arg(long)]
        overwrite: bool,

        /// Re-extract even when cached tables exist
        #[arg(long)]
        force: bool,

        /// Threads (0 = auto). Use 1 for deterministic output.
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Visualization artifacts (plot-friendly JSON)
    Viz {
        #[command(subcommand)]
        command: VizCommands,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum VizCommands {
    /// Signal spectra artifact (offline reference + per-configuration L1)
    Distributions {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Quantity name (defaults to the only configured quantity)
        #[arg(short, long)]
        quantity: Option<String>,

        /// Spectrum bins
        #[arg(long, default_value = "100")]
        bins: usize,

        /// Spectrum range minimum
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        min: f64,

        /// Spectrum range maximum
        #[arg(long, default_value = "200.0", allow_negative_numbers = true)]
        max: f64,

        /// Output file for the artifact (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Trigger-minus-offline resolution artifact
    Resolution {
        /// Scan spec (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Quantity name (defaults to the only configured quantity)
        #[arg(short, long)]
        quantity: Option<String>,

        /// Residual bins
        #[arg(long, default_value = "80")]
        bins: usize,

        /// Residual range minimum
        #[arg(long, default_value = "-100.0", allow_negative_numbers = true)]
        min: f64,

        /// Residual range maximum
        #[arg(long, default_value = "100.0", allow_negative_numbers = true)]
        max: f64,

        /// Output file for the artifact (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Extract { spec, cache_dir, force } => {
            cmd_extract(&spec, cache_dir, force)
        }
        Commands::Rates { spec, quantity, output, threads } => {
            cmd_rates(&spec, quantity.as_deref(), output.as_ref(), threads)
        }
        Commands::Thresholds { spec, output, threads } => {
            cmd_thresholds(&spec, output.as_ref(), threads)
        }
        Commands::Efficiency { spec, quantity, output, threads } => {
            cmd_efficiency(&spec, quantity.as_deref(), output.as_ref(), threads)
        }
        Commands::Scan { spec, out_dir, overwrite, force, threads } => {
            cmd_scan(&spec, &out_dir, overwrite, force, threads)
        }
        Commands::Viz { command } => match command {
            VizCommands::Distributions { spec, quantity, bins, min, max, output } => {
                cmd_viz_distributions(&spec, quantity.as_deref(), bins, min, max, output.as_ref())
            }
            VizCommands::Resolution { spec, quantity, bins, min, max, output } => {
                cmd_viz_resolution(&spec, quantity.as_deref(), bins, min, max, output.as_ref())
            }
        },
        Commands::Version => {
            println!("trigeff {}", te_core::VERSION);
            Ok(())
        }
    }
}

fn init_threads(threads: usize) {
    if threads > 0 {
        // Best-effort; if a global pool already exists, keep going.
        let _ = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global();
    }
}

fn load_spec(path: &Path) -> Result<(ScanSpec, ArtifactMeta)> {
    tracing::info!(path = %path.display(), "loading scan spec");
    let (spec, digest) = read_scan_spec(path)?;
    tracing::info!(
        configurations = spec.configurations.len(),
        quantities = spec.quantities.len(),
        "scan spec loaded"
    );
    let meta =
        ArtifactMeta::new(Some(ArtifactInputMeta { spec_sha256: Some(digest) }))?;
    Ok((spec, meta))
}

fn pick_quantity<'a>(spec: &'a ScanSpec, name: Option<&str>) -> Result<&'a QuantitySpec> {
    let configured = || {
        spec.quantities.iter().map(|q| q.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    match name {
        Some(n) => spec.quantities.iter().find(|q| q.name == n).ok_or_else(|| {
            anyhow::anyhow!("unknown quantity '{}' (configured: {})", n, configured())
        }),
        None => {
            if spec.quantities.len() == 1 {
                Ok(&spec.quantities[0])
            } else {
                anyhow::bail!("--quantity required (configured: {})", configured())
            }
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

fn cmd_extract(spec_path: &Path, cache_dir: Option<PathBuf>, force: bool) -> Result<()> {
    let (mut spec, _meta) = load_spec(spec_path)?;
    if cache_dir.is_some() {
        spec.cache_dir = cache_dir;
    }
    if spec.cache_dir.is_none() {
        anyhow::bail!("no cache directory: set `cache_dir` in the spec or pass --cache-dir");
    }

    let mut provider = FileTableProvider::new(&spec).with_force(force);
    let summaries = provider.extract_all()?;
    for s in &summaries {
        tracing::info!(
            label = %s.label,
            sample = %s.sample,
            rows = s.n_rows,
            from_cache = s.from_cache,
            "table ready"
        );
    }

    let output_json = serde_json::json!({
        "cache_dir": spec.cache_dir,
        "tables": summaries.iter().map(|s| serde_json::json!({
            "label": s.label,
            "sample": s.sample.as_str(),
            "n_rows": s.n_rows,
            "from_cache": s.from_cache,
        })).collect::<Vec<_>>(),
    });
    write_json(None, output_json)
}

fn cmd_rates(
    spec_path: &Path,
    quantity: Option<&str>,
    output: Option<&PathBuf>,
    threads: usize,
) -> Result<()> {
    init_threads(threads);
    let (spec, meta) = load_spec(spec_path)?;
    let q = pick_quantity(&spec, quantity)?;

    let mut provider = FileTableProvider::new(&spec);
    let scan = solve_thresholds(&spec, &mut provider)?;
    let rates = scan
        .quantities
        .iter()
        .find(|r| r.quantity == q.name)
        .ok_or_else(|| anyhow::anyhow!("quantity '{}' missing from scan result", q.name))?;

    let artifact = RateCurveArtifact::from_rates(rates, &scan.reference, meta);
    write_json(output, serde_json::to_value(artifact)?)
}

fn cmd_thresholds(spec_path: &Path, output: Option<&PathBuf>, threads: usize) -> Result<()> {
    init_threads(threads);
    let (spec, meta) = load_spec(spec_path)?;

    let mut provider = FileTableProvider::new(&spec);
    let scan = solve_thresholds(&spec, &mut provider)?;
    for q in &scan.quantities {
        tracing::debug!(quantity = %q.quantity, targets = ?q.target_rates, "thresholds solved");
    }

    let artifact = ThresholdsArtifact::from_rates(&scan, meta);
    write_json(output, serde_json::to_value(artifact)?)
}

fn cmd_efficiency(
    spec_path: &Path,
    quantity: Option<&str>,
    output: Option<&PathBuf>,
    threads: usize,
) -> Result<()> {
    init_threads(threads);
    let (spec, meta) = load_spec(spec_path)?;
    let q = pick_quantity(&spec, quantity)?;

    let mut provider = FileTableProvider::new(&spec);
    let result = run_scan(&spec, &mut provider)?;
    let scan = result
        .quantities
        .iter()
        .find(|s| s.quantity == q.name)
        .ok_or_else(|| anyhow::anyhow!("quantity '{}' missing from scan result", q.name))?;

    let artifact = EfficiencyArtifact::from_scan(scan, &q.offline_column, meta);
    write_json(output, serde_json::to_value(artifact)?)
}

fn ensure_out_dir(dir: &Path, overwrite: bool) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            anyhow::bail!("output path exists but is not a directory: {}", dir.display());
        }
        if !overwrite && dir.read_dir()?.next().is_some() {
            anyhow::bail!(
                "output directory not empty (pass --overwrite): {}",
                dir.display()
            );
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Default spectrum binning for the `scan` bundle (per-GeV style range).
const SCAN_DISTRIBUTION_BINNING: Binning = Binning { min: 0.0, max: 200.0, n_bins: 100 };
/// Default residual binning for the `scan` bundle.
const SCAN_RESOLUTION_BINNING: Binning = Binning { min: -100.0, max: 100.0, n_bins: 80 };

fn cmd_scan(
    spec_path: &Path,
    out_dir: &Path,
    overwrite: bool,
    force: bool,
    threads: usize,
) -> Result<()> {
    init_threads(threads);
    let (spec, meta) = load_spec(spec_path)?;
    ensure_out_dir(out_dir, overwrite)?;

    let mut provider = FileTableProvider::new(&spec).with_force(force);
    let result = run_scan(&spec, &mut provider)?;

    let thresholds = ThresholdsArtifact::from_rates(&result.rate_scan(), meta.clone());
    write_json(Some(&out_dir.join("thresholds.json")), serde_json::to_value(thresholds)?)?;

    for (q, scan) in spec.quantities.iter().zip(&result.quantities) {
        let rates = RateCurveArtifact::from_scan(scan, &result.reference, meta.clone());
        write_json(
            Some(&out_dir.join(format!("rates_{}.json", q.name))),
            serde_json::to_value(rates)?,
        )?;

        let efficiency = EfficiencyArtifact::from_scan(scan, &q.offline_column, meta.clone());
        write_json(
            Some(&out_dir.join(format!("efficiency_{}.json", q.name))),
            serde_json::to_value(efficiency)?,
        )?;

        let distributions = distributions_artifact(
            &spec,
            q,
            SCAN_DISTRIBUTION_BINNING,
            &mut provider,
            meta.clone(),
        )?;
        write_json(
            Some(&out_dir.join(format!("distributions_{}.json", q.name))),
            serde_json::to_value(distributions)?,
        )?;

        let resolution = resolution_artifact(
            &spec,
            q,
            SCAN_RESOLUTION_BINNING,
            &mut provider,
            meta.clone(),
        )?;
        write_json(
            Some(&out_dir.join(format!("resolution_{}.json", q.name))),
            serde_json::to_value(resolution)?,
        )?;

        tracing::info!(quantity = %q.name, "artifacts written");
    }

    println!("{}", out_dir.display());
    Ok(())
}

/// Offline reference spectrum (from the reference configuration's signal
/// table) plus each configuration's trigger-quantity spectrum.
fn distributions_artifact(
    spec: &ScanSpec,
    q: &QuantitySpec,
    binning: Binning,
    provider: &mut dyn TableProvider,
    meta: ArtifactMeta,
) -> Result<DistributionsArtifact> {
    let mut columns: Vec<(String, Vec<f64>)> = Vec::with_capacity(spec.configurations.len() + 1);

    let reference_table = provider.table(&spec.reference, SampleKind::Signal)?;
    columns.push((
        q.offline_column.clone(),
        reference_table.column(&q.offline_column)?.to_vec(),
    ));

    for cfg in &spec.configurations {
        let table = provider.table(&cfg.label, SampleKind::Signal)?;
        columns.push((cfg.label.clone(), table.column(cfg.trigger_column(&q.name)?)?.to_vec()));
    }

    let views: Vec<(String, &[f64])> =
        columns.iter().map(|(name, values)| (name.clone(), values.as_slice())).collect();
    Ok(DistributionsArtifact::from_columns(&q.name, binning, &views, meta)?)
}

/// Per-configuration `trigger - offline` residual histograms.
fn resolution_artifact(
    spec: &ScanSpec,
    q: &QuantitySpec,
    binning: Binning,
    provider: &mut dyn TableProvider,
    meta: ArtifactMeta,
) -> Result<ResolutionArtifact> {
    let mut columns: Vec<(String, Vec<f64>, Vec<f64>)> =
        Vec::with_capacity(spec.configurations.len());
    for cfg in &spec.configurations {
        let table = provider.table(&cfg.label, SampleKind::Signal)?;
        columns.push((
            cfg.label.clone(),
            table.column(cfg.trigger_column(&q.name)?)?.to_vec(),
            table.column(&q.offline_column)?.to_vec(),
        ));
    }

    let views: Vec<(String, &[f64], &[f64])> = columns
        .iter()
        .map(|(label, trigger, offline)| (label.clone(), trigger.as_slice(), offline.as_slice()))
        .collect();
    Ok(ResolutionArtifact::from_columns(&q.name, &q.offline_column, binning, &views, meta)?)
}

fn cmd_viz_distributions(
    spec_path: &Path,
    quantity: Option<&str>,
    bins: usize,
    min: f64,
    max: f64,
    output: Option<&PathBuf>,
) -> Result<()> {
    let (spec, meta) = load_spec(spec_path)?;
    let q = pick_quantity(&spec, quantity)?;
    let binning = Binning::new(min, max, bins)?;

    let mut provider = FileTableProvider::new(&spec);
    let artifact = distributions_artifact(&spec, q, binning, &mut provider, meta)?;
    write_json(output, serde_json::to_value(artifact)?)
}

fn cmd_viz_resolution(
    spec_path: &Path,
    quantity: Option<&str>,
    bins: usize,
    min: f64,
    max: f64,
    output: Option<&PathBuf>,
) -> Result<()> {
    let (spec, meta) = load_spec(spec_path)?;
    let q = pick_quantity(&spec, quantity)?;
    let binning = Binning::new(min, max, bins)?;

    let mut provider = FileTableProvider::new(&spec);
    let artifact = resolution_artifact(&spec, q, binning, &mut provider, meta)?;
    write_json(output, serde_json::to_value(artifact)?)
}
