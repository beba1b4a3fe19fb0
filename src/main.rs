use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use faldisco::engine::TableLabels;
use faldisco::io::{reader, writer};
use faldisco::FaldiscoConfig;

/// Discovers semantic field alignments between a reference and a target
/// table sampled on a shared join key.
#[derive(Parser, Debug)]
#[command(name = "faldisco", version, about)]
struct Cli {
    /// Pre-joined sample file (CSV/TSV with r_j__/r__/t__ prefixed columns).
    /// The SQL sampler that produces this file is out of scope for this
    /// binary; point it at a file someone else's query already produced.
    sample: PathBuf,

    /// Directory the three output CSVs are written into.
    output_dir: PathBuf,

    /// Reference table's namespace, written into output rows verbatim.
    #[arg(long)]
    reference_namespace: String,

    /// Reference table's name, written into output rows verbatim.
    #[arg(long)]
    reference_table: String,

    /// Target table's namespace, written into output rows verbatim.
    #[arg(long)]
    target_namespace: String,

    /// Target table's name, written into output rows verbatim.
    #[arg(long)]
    target_table: String,

    /// Optional TOML file overriding the built-in threshold defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cap on the number of sample rows loaded, overriding the config/default.
    #[arg(long)]
    sample_size: Option<usize>,

    /// r__x / t__y field to log at debug level even without -v, for tracing
    /// a specific pair's per-value accumulation.
    #[arg(long = "trace-field")]
    trace_fields: Vec<String>,

    /// Verbosity: none = info, -v = debug, -vv = trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Log file path.
    #[arg(long, default_value = "faldisco.log")]
    log_file: PathBuf,
}

fn setup_logging(verbosity: u8, log_file: &PathBuf) -> Result<(), fern::InitError> {
    let mut base_config = fern::Dispatch::new();
    base_config = match verbosity {
        0 => base_config.level(log::LevelFilter::Info),
        1 => base_config.level(log::LevelFilter::Debug),
        _ => base_config.level(log::LevelFilter::Trace),
    };

    let file_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::log_file(log_file)?);

    let stdout_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%H:%M"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(io::stdout());

    base_config.chain(file_config).chain(stdout_config).apply()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbosity, &cli.log_file)?;

    let mut cfg = match &cli.config {
        Some(path) => FaldiscoConfig::from_file(path)?,
        None => FaldiscoConfig::default(),
    };
    if let Some(sample_size) = cli.sample_size {
        cfg.sample_size = sample_size;
    }
    cfg.trace_fields = cli.trace_fields.clone();

    info!("loading sample from {}", cli.sample.display());
    let sample = reader::load_sample(&cli.sample, cfg.sample_size)?;
    info!("loaded {} rows", sample.num_rows());

    let labels = TableLabels {
        reference_table_namespace: cli.reference_namespace.clone(),
        reference_table_name: cli.reference_table.clone(),
        target_table_namespace: cli.target_namespace.clone(),
        target_table_name: cli.target_table.clone(),
    };

    let output = faldisco::find_field_alignment(&sample, &labels, &cfg);

    std::fs::create_dir_all(&cli.output_dir)?;
    writer::write_csv(&cli.output_dir.join("field_alignments.csv"), &output.field_alignments)?;
    writer::write_csv(&cli.output_dir.join("value_alignments.csv"), &output.value_alignments)?;
    writer::write_csv(&cli.output_dir.join("profiles.csv"), &output.profiles)?;

    info!("wrote output to {}", cli.output_dir.display());
    Ok(())
}
