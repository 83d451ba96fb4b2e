use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::conversion::{BadRecordPolicy, ConversionOptions, ConversionSummary, convert};
use crate::report::{self, RunReport};
use crate::smart_reader;

#[derive(Debug, Parser)]
#[command(author, version, about = "Flatten VCF genotypes into a two-column-per-sample haplotype table", long_about = None)]
struct Cli {
    /// Input VCF file, plain or gzip-compressed
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output haplotype table path (default: input with .gz stripped and .hap appended)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// What to do with records that fail to decode
    #[arg(long, value_enum, default_value_t = BadRecordPolicy::Strict)]
    on_bad_record: BadRecordPolicy,

    /// Write a JSON run report next to the output
    #[arg(long)]
    report: bool,

    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&cli.input));
    ensure_writable_dir(&output)?;

    let options = ConversionOptions {
        policy: cli.on_bad_record,
    };

    tracing::info!(
        input = %cli.input.display(),
        output = %output.display(),
        policy = ?options.policy,
        "starting conversion",
    );

    let reader = smart_reader::open_input(&cli.input)?;
    let writer = File::create(&output)
        .map(BufWriter::new)
        .with_context(|| format!("failed to create output {}", output.display()))?;

    let summary = convert(reader, writer, &options)?;

    if cli.report {
        let report_path = PathBuf::from(format!("{}.report.json", output.display()));
        let run_report = RunReport::new(&cli.input, &output, options.policy, &summary);
        report::write_report(&report_path, &run_report)?;
        tracing::info!(report = %report_path.display(), "wrote run report");
    }

    print_summary(&output, &summary);

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
    Ok(())
}

/// Default output path: the input path with a trailing `.gz` stripped
/// and `.hap` appended.
fn derive_output_path(input: &Path) -> PathBuf {
    let raw = input.to_string_lossy();
    let base = raw.strip_suffix(".gz").unwrap_or(&raw);
    PathBuf::from(format!("{base}.hap"))
}

fn ensure_writable_dir(output: &Path) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let metadata = fs::metadata(dir)
        .with_context(|| format!("output directory does not exist: {}", dir.display()))?;
    if metadata.permissions().readonly() {
        anyhow::bail!("output directory is not writable: {}", dir.display());
    }
    Ok(())
}

fn print_summary(output: &Path, summary: &ConversionSummary) {
    println!(
        "Processed {records} records for {samples} samples; wrote {rows} rows to {output}.",
        records = summary.total_records,
        samples = summary.samples,
        rows = summary.emitted_rows,
        output = output.display(),
    );

    if summary.skipped_before_header > 0 {
        println!(
            "Skipped {count} data lines seen before the #CHROM header.",
            count = summary.skipped_before_header
        );
    }

    if summary.unresolved_allele_records > 0 {
        println!(
            "Marked {count} records with multi-character alleles as unresolved.",
            count = summary.unresolved_allele_records
        );
    }

    if summary.missing_calls > 0 {
        println!(
            "Encountered {count} missing genotype calls.",
            count = summary.missing_calls
        );
    }

    if summary.skipped_bad_records > 0 {
        println!(
            "Skipped {count} malformed records.",
            count = summary.skipped_bad_records
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["vcf2hap", "input.vcf"]);
        assert_eq!(cli.input, PathBuf::from("input.vcf"));
        assert_eq!(cli.output, None);
        assert_eq!(cli.on_bad_record, BadRecordPolicy::Strict);
        assert!(!cli.report);
    }

    #[test]
    fn parses_explicit_output_and_policy() {
        let cli = Cli::parse_from([
            "vcf2hap",
            "input.vcf.gz",
            "-o",
            "table.hap",
            "--on-bad-record",
            "skip",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("table.hap")));
        assert_eq!(cli.on_bad_record, BadRecordPolicy::Skip);
    }

    #[test]
    fn output_path_strips_gz_and_appends_hap() {
        assert_eq!(
            derive_output_path(Path::new("sample.vcf.gz")),
            PathBuf::from("sample.vcf.hap")
        );
        assert_eq!(
            derive_output_path(Path::new("sample.vcf")),
            PathBuf::from("sample.vcf.hap")
        );
        assert_eq!(
            derive_output_path(Path::new("data/calls.txt")),
            PathBuf::from("data/calls.txt.hap")
        );
    }
}
