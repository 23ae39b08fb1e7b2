use anyhow::{Context, Result};
use clap::Parser;
use donation_analytics::{run, Percentile};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Running percentiles of repeat-donor contributions.
#[derive(Debug, Parser)]
#[command(name = "donation-analytics", version, about)]
struct Args {
    /// FEC individual contributions file (pipe-delimited `itcont.txt`)
    itcont: PathBuf,
    /// File whose first line is the target percentile, in (0, 100]
    percentile: PathBuf,
    /// Output file, one line per repeat-donor contribution
    output: PathBuf,
}

fn read_percentile(path: &Path) -> Result<Percentile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading percentile file {}", path.display()))?;
    let first_line = contents.lines().next().unwrap_or_default();
    first_line
        .parse()
        .with_context(|| format!("parsing percentile file {}", path.display()))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let percentile = read_percentile(&args.percentile)?;

    let input = File::open(&args.itcont)
        .with_context(|| format!("opening {}", args.itcont.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    info!(%percentile, input = %args.itcont.display(), "processing contributions");
    let started = Instant::now();
    let stats = run(percentile, BufReader::new(input), BufWriter::new(output))
        .with_context(|| format!("processing {}", args.itcont.display()))?;

    info!(
        records = stats.records,
        rejected = stats.rejected,
        new_donors = stats.new_donors,
        prior_year = stats.prior_year,
        emitted = stats.emitted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}
