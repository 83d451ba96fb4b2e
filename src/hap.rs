//! Writer for the flattened haplotype table format.
//!
//! One header line, then one tab-separated row per variant record with
//! two allele columns per sample.

use std::io::{self, Write as _};

/// Column suffixes for the two allele copies of a sample.
pub const ALLELE_SUFFIXES: [&str; 2] = ["_A", "_B"];

/// One output row: variant id, position, then the decoded allele
/// symbols in sample order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row {
    pub id: String,
    pub position: String,
    pub alleles: Vec<char>,
}

/// Header columns for the given sample list: `ID`, `POS`, then
/// `<S>_A`/`<S>_B` for every sample in order.
pub fn header_columns(samples: &[String]) -> Vec<String> {
    let mut columns = Vec::with_capacity(2 + 2 * samples.len());
    columns.push(String::from("ID"));
    columns.push(String::from("POS"));
    for sample in samples {
        for suffix in ALLELE_SUFFIXES {
            columns.push(format!("{sample}{suffix}"));
        }
    }
    columns
}

/// Serializes header and rows as tab-joined lines, in call order.
pub struct Writer<W> {
    inner: W,
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_header(&mut self, samples: &[String]) -> io::Result<()> {
        self.inner
            .write_all(header_columns(samples).join("\t").as_bytes())?;
        self.inner.write_all(b"\n")
    }

    pub fn write_row(&mut self, row: &Row) -> io::Result<()> {
        write!(self.inner, "{}\t{}", row.id, row.position)?;
        for allele in &row.alleles {
            write!(self.inner, "\t{allele}")?;
        }
        self.inner.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
