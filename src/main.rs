//! # vcfsumm: Streaming VCF Summary Statistics
//!
//! Converts a VCF into a per-variant summary table with per-population
//! allele frequencies, cross-referencing sample columns against a
//! population designation file.
//!
//! ## Usage
//! ```bash
//! vcfsumm --vcf variants.vcf.gz --pop-file populations.txt
//! ```

use std::time::Instant;

use tracing_subscriber::EnvFilter;

use vcfsumm::config::Config;
use vcfsumm::error::Result;
use vcfsumm::pipelines::SummarizePipeline;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate()?;

    let default_level = if config.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    eprintln!("vcfsumm v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("VCF: {:?}", config.vcf);
    eprintln!("Populations: {:?}", config.pop_file);
    eprintln!("Minimum INFO depth: {}", config.min_depth);

    let mut pipeline = SummarizePipeline::new(config);
    let summary = pipeline.run()?;

    eprintln!(
        "Records: {} ({} kept, {} discarded)",
        summary.records, summary.kept, summary.discarded
    );
    eprintln!("Summary table: {:?}", summary.summary_path);
    eprintln!("Discarded lines: {:?}", summary.audit_path);

    let elapsed = start.elapsed();
    eprintln!("Completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
