use std::io::{self, BufRead};

use thiserror::Error;

/// Meta lines carry file-level annotations and are never structural.
pub const META_PREFIX: &str = "##";
/// The column-header line fixes the sample list.
pub const HEADER_PREFIX: &str = "#CHROM";
/// CHROM, POS, ID, REF, ALT, QUAL, FILTER, INFO, FORMAT.
pub const FIXED_FIELD_COUNT: usize = 9;

/// One VCF data line, decomposed into the fields the haplotype
/// conversion consumes. QUAL, FILTER, INFO, and FORMAT are skipped over
/// and never inspected; the chromosome is carried for error context only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub chromosome: String,
    pub position: String,
    pub id: String,
    pub reference: String,
    pub alternates: Vec<String>,
    pub genotypes: Vec<String>,
}

/// Streaming reader over the data lines of a VCF file.
///
/// Meta lines are discarded wherever they appear. The first `#CHROM`
/// line captures the sample list; data-like lines seen before it are
/// counted and skipped, and any later `#CHROM`-prefixed line is parsed
/// as ordinary data.
pub struct Reader<R> {
    inner: R,
    line: u64,
    buf: String,
    samples: Option<Vec<String>>,
    skipped_before_header: u64,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
            samples: None,
            skipped_before_header: 0,
        }
    }

    /// Sample names from the column-header line, once it has been seen.
    pub fn samples(&self) -> Option<&[String]> {
        self.samples.as_deref()
    }

    /// Data-like lines encountered before the column-header line.
    pub fn skipped_before_header(&self) -> u64 {
        self.skipped_before_header
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let trimmed = self.buf.trim_end_matches(&['\n', '\r'][..]);
                    if trimmed.is_empty() || trimmed.starts_with(META_PREFIX) {
                        continue;
                    }

                    let Some(samples) = &self.samples else {
                        if trimmed.starts_with(HEADER_PREFIX) {
                            self.samples = Some(parse_sample_names(trimmed));
                        } else {
                            self.skipped_before_header += 1;
                        }
                        continue;
                    };

                    let expected = samples.len();
                    return Some(parse_record(trimmed, expected).map_err(|kind| ParseError {
                        line: self.line,
                        raw: trimmed.to_string(),
                        kind,
                    }));
                }
                Err(e) => {
                    return Some(Err(ParseError {
                        line: self.line,
                        raw: String::new(),
                        kind: ParseErrorKind::Io(e),
                    }));
                }
            }
        }
    }
}

/// Errors that can arise while reading VCF data lines.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    pub raw: String,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("expected at least 9 tab-delimited fields, found {0}")]
    FieldCount(usize),
    #[error("expected {expected} genotype fields to match the sample list, found {found}")]
    GenotypeCount { expected: usize, found: usize },
}

fn parse_sample_names(line: &str) -> Vec<String> {
    line.split('\t')
        .skip(FIXED_FIELD_COUNT)
        .map(str::to_string)
        .collect()
}

fn parse_record(line: &str, expected_samples: usize) -> Result<Record, ParseErrorKind> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < FIXED_FIELD_COUNT {
        return Err(ParseErrorKind::FieldCount(fields.len()));
    }

    let genotypes: Vec<String> = fields[FIXED_FIELD_COUNT..]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if genotypes.len() != expected_samples {
        return Err(ParseErrorKind::GenotypeCount {
            expected: expected_samples,
            found: genotypes.len(),
        });
    }

    let id = match fields[2] {
        "" | "." => String::from("."),
        other => other.to_string(),
    };

    Ok(Record {
        chromosome: fields[0].to_string(),
        position: fields[1].to_string(),
        id,
        reference: fields[3].to_string(),
        alternates: fields[4].split(',').map(str::to_string).collect(),
        genotypes,
    })
}
