use std::io::Write;

use assert_fs::prelude::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use vcf2hap::{ConversionOptions, convert, smart_reader};

const VCF: &str = "##fileformat=VCFv4.2\n\
                   #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
                   1\t100\trs1\tA\tG\t.\t.\t.\tGT\t0/1\n\
                   1\t200\trs2\tC\tT\t.\t.\t.\tGT\t1|1\n";

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn convert_file(file: &assert_fs::fixture::ChildPath) -> String {
    let reader = smart_reader::open_input(file.path()).unwrap();
    let mut output = Vec::new();
    convert(reader, &mut output, &ConversionOptions::default()).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn plain_and_gzip_inputs_produce_identical_output() {
    let temp = assert_fs::TempDir::new().unwrap();

    let plain = temp.child("calls.vcf");
    plain.write_str(VCF).unwrap();

    let compressed = temp.child("calls.vcf.gz");
    compressed.write_binary(&gzip(VCF.as_bytes())).unwrap();

    assert_eq!(convert_file(&plain), convert_file(&compressed));
}

#[test]
fn gzip_is_detected_by_magic_not_extension() {
    let temp = assert_fs::TempDir::new().unwrap();

    // gzip payload behind a plain-looking name
    let misnamed = temp.child("calls.vcf");
    misnamed.write_binary(&gzip(VCF.as_bytes())).unwrap();

    let output = convert_file(&misnamed);
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn nested_gzip_layers_are_unwrapped() {
    let temp = assert_fs::TempDir::new().unwrap();

    let nested = temp.child("calls.vcf.gz.gz");
    nested
        .write_binary(&gzip(&gzip(VCF.as_bytes())))
        .unwrap();

    let output = convert_file(&nested);
    assert_eq!(output.lines().count(), 3);
    assert!(output.starts_with("ID\tPOS\tS1_A\tS1_B\n"));
}

#[test]
fn empty_gzip_member_produces_no_output() {
    let temp = assert_fs::TempDir::new().unwrap();

    let empty = temp.child("empty.vcf.gz");
    empty.write_binary(&gzip(b"")).unwrap();

    let output = convert_file(&empty);
    assert!(output.is_empty());
}
