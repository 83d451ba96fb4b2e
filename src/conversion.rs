use std::io::{self, BufRead};
use std::num::ParseIntError;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::hap;
use crate::vcf;

/// Symbol emitted for missing calls and unresolved alleles.
pub const PLACEHOLDER: char = '.';

/// What to do with a data line that fails to parse or decode.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum BadRecordPolicy {
    /// Abort the run on the first malformed record.
    #[default]
    Strict,
    /// Log malformed records and drop them.
    Skip,
}

/// Options for a single conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    pub policy: BadRecordPolicy,
}

/// Counters accumulated over one conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionSummary {
    /// Samples named on the column-header line.
    pub samples: usize,
    /// Data lines seen after the header, including skipped ones.
    pub total_records: u64,
    /// Rows written to the haplotype table (header excluded).
    pub emitted_rows: u64,
    /// Sample calls that decoded to a placeholder pair.
    pub missing_calls: u64,
    /// Records whose allele table degraded to placeholders.
    pub unresolved_allele_records: u64,
    /// Data-like lines discarded before the header line.
    pub skipped_before_header: u64,
    /// Records dropped under the skip policy.
    pub skipped_bad_records: u64,
}

/// Errors raised while decoding a single genotype subfield.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("genotype '{genotype}' does not split into two alleles")]
    MalformedGenotype { genotype: String },
    #[error("allele index '{raw}' is not an integer")]
    InvalidIndex {
        raw: String,
        #[source]
        source: ParseIntError,
    },
    #[error("allele index {index} out of range for {table_len} alleles")]
    AlleleIndex { index: usize, table_len: usize },
}

/// A decode failure tied back to the record and sample it came from.
#[derive(Debug, Error)]
#[error("invalid genotype for sample {sample} at {chromosome}:{position}: {source}")]
pub struct RecordDecodeError {
    pub chromosome: String,
    pub position: String,
    pub sample: String,
    #[source]
    pub source: DecodeError,
}

/// Per-record mapping from genotype index to allele symbol.
///
/// Index 0 is REF, indices 1+ are the ALTs in declaration order. If any
/// allele is longer than one character the whole table degrades to
/// placeholders of the same length, so indel records are marked
/// unresolved instead of half-resolved.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AlleleTable {
    symbols: Vec<char>,
    resolved: bool,
}

impl AlleleTable {
    pub fn build(reference: &str, alternates: &[String]) -> Self {
        let single = |allele: &str| allele.len() == 1;
        if single(reference) && alternates.iter().all(|a| single(a)) {
            let symbols = std::iter::once(reference)
                .chain(alternates.iter().map(String::as_str))
                .map(|a| a.as_bytes()[0] as char)
                .collect();
            Self {
                symbols,
                resolved: true,
            }
        } else {
            Self {
                symbols: vec![PLACEHOLDER; 1 + alternates.len()],
                resolved: false,
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// False when the table was degraded to placeholders.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
}

/// Whether the allele copies of a genotype are ordered.
///
/// Only controls how the subfield is split; the emitted symbols are the
/// same either way.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Phasing {
    Phased,
    Unphased,
}

impl Phasing {
    fn detect(genotype: &str) -> Self {
        if genotype.contains('|') {
            Self::Phased
        } else {
            Self::Unphased
        }
    }

    fn separator(self) -> char {
        match self {
            Self::Phased => '|',
            Self::Unphased => '/',
        }
    }
}

/// Decode one per-sample genotype field into a pair of allele symbols.
///
/// Only the subfield before the first colon is inspected; trailing
/// fields such as read depth are ignored. A subfield drawn entirely from
/// `.` and `/` is a missing call and yields a placeholder pair.
pub fn decode_genotype(field: &str, table: &AlleleTable) -> Result<(char, char), DecodeError> {
    let genotype = field.split(':').next().unwrap_or(field);

    if genotype.chars().all(|c| c == '.' || c == '/') {
        return Ok((PLACEHOLDER, PLACEHOLDER));
    }

    let separator = Phasing::detect(genotype).separator();
    let mut parts = genotype.split(separator);
    let (first, second) = match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => (first, second),
        _ => {
            return Err(DecodeError::MalformedGenotype {
                genotype: genotype.to_string(),
            });
        }
    };

    Ok((
        resolve_allele(first, table)?,
        resolve_allele(second, table)?,
    ))
}

fn resolve_allele(part: &str, table: &AlleleTable) -> Result<char, DecodeError> {
    if part == "." {
        return Ok(PLACEHOLDER);
    }
    let index: usize = part.parse().map_err(|source| DecodeError::InvalidIndex {
        raw: part.to_string(),
        source,
    })?;
    table.get(index).ok_or(DecodeError::AlleleIndex {
        index,
        table_len: table.len(),
    })
}

/// Decode every sample of a record into one output row.
pub fn transcode_record(
    record: &vcf::Record,
    samples: &[String],
    summary: &mut ConversionSummary,
) -> Result<hap::Row, RecordDecodeError> {
    let table = AlleleTable::build(&record.reference, &record.alternates);
    if !table.is_resolved() {
        summary.unresolved_allele_records += 1;
    }

    let mut alleles = Vec::with_capacity(2 * record.genotypes.len());
    for (index, field) in record.genotypes.iter().enumerate() {
        let (first, second) =
            decode_genotype(field, &table).map_err(|source| RecordDecodeError {
                chromosome: record.chromosome.clone(),
                position: record.position.clone(),
                sample: samples
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| index.to_string()),
                source,
            })?;
        if first == PLACEHOLDER && second == PLACEHOLDER {
            summary.missing_calls += 1;
        }
        alleles.push(first);
        alleles.push(second);
    }

    Ok(hap::Row {
        id: record.id.clone(),
        position: record.position.clone(),
        alleles,
    })
}

/// Convert one VCF text stream into one haplotype table stream.
///
/// The header row is emitted as soon as the `#CHROM` line is seen, so an
/// input with no header produces no output at all. Each data line is
/// transcoded and written before the next is read.
pub fn convert<R, W>(input: R, output: W, options: &ConversionOptions) -> Result<ConversionSummary>
where
    R: BufRead,
    W: io::Write,
{
    let mut reader = vcf::Reader::new(input);
    let mut writer = hap::Writer::new(output);
    let mut summary = ConversionSummary::default();
    let mut header_written = false;

    while let Some(result) = reader.next() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                if matches!(err.kind, vcf::ParseErrorKind::Io(_)) {
                    return Err(err).context("failed to read input stream");
                }
                summary.total_records += 1;
                match options.policy {
                    BadRecordPolicy::Strict => {
                        return Err(err).context("malformed VCF record");
                    }
                    BadRecordPolicy::Skip => {
                        tracing::warn!(error = %err, "skipping malformed record");
                        summary.skipped_bad_records += 1;
                        continue;
                    }
                }
            }
        };

        if !header_written
            && let Some(samples) = reader.samples()
        {
            summary.samples = samples.len();
            writer
                .write_header(samples)
                .context("failed to write haplotype header")?;
            header_written = true;
        }

        summary.total_records += 1;
        let samples = reader.samples().unwrap_or_default();
        match transcode_record(&record, samples, &mut summary) {
            Ok(row) => {
                writer
                    .write_row(&row)
                    .context("failed to write haplotype row")?;
                summary.emitted_rows += 1;
            }
            Err(err) => match options.policy {
                BadRecordPolicy::Strict => {
                    return Err(err).context("malformed VCF record");
                }
                BadRecordPolicy::Skip => {
                    tracing::warn!(error = %err, "skipping malformed record");
                    summary.skipped_bad_records += 1;
                }
            },
        }
    }

    if !header_written
        && let Some(samples) = reader.samples()
    {
        summary.samples = samples.len();
        writer
            .write_header(samples)
            .context("failed to write haplotype header")?;
    }

    summary.skipped_before_header = reader.skipped_before_header();
    writer.flush().context("failed to flush output stream")?;

    Ok(summary)
}
