#![doc = include_str!("../README.md")]

pub mod cli;
pub mod conversion;
pub mod hap;
pub mod report;
pub mod smart_reader;
pub mod vcf;

pub use conversion::{
    BadRecordPolicy, ConversionOptions, ConversionSummary, convert,
};
