use std::io::Cursor;

use proptest::prelude::*;
use vcf2hap::conversion::{AlleleTable, decode_genotype};
use vcf2hap::{BadRecordPolicy, ConversionOptions, convert, vcf};

fn synthetic_vcf(samples: usize, records: usize) -> String {
    let mut input = String::from("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
    for i in 0..samples {
        input.push_str(&format!("\tS{i}"));
    }
    input.push('\n');
    for i in 0..records {
        input.push_str(&format!("1\t{pos}\trs{i}\tA\tC\t.\t.\t.\tGT", pos = 100 + i));
        for _ in 0..samples {
            input.push_str("\t0/1");
        }
        input.push('\n');
    }
    input
}

proptest! {
    #[test]
    fn reader_never_panics_on_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let reader = vcf::Reader::new(Cursor::new(data));
        for result in reader.take(1000) {
            let _ = result;
        }
    }

    #[test]
    fn conversion_never_panics_on_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let mut output = Vec::new();
        let options = ConversionOptions { policy: BadRecordPolicy::Skip };
        let _ = convert(Cursor::new(data), &mut output, &options);
    }

    #[test]
    fn in_range_genotypes_always_decode(a in 0usize..4, b in 0usize..4, phased in any::<bool>()) {
        let alternates = vec![String::from("C"), String::from("G"), String::from("T")];
        let table = AlleleTable::build("A", &alternates);
        let separator = if phased { '|' } else { '/' };
        let genotype = format!("{a}{separator}{b}");

        let (first, second) = decode_genotype(&genotype, &table).unwrap();
        prop_assert!("ACGT".contains(first));
        prop_assert!("ACGT".contains(second));
    }

    #[test]
    fn output_width_is_fixed_by_sample_count(samples in 0usize..8, records in 0usize..20) {
        let input = synthetic_vcf(samples, records);
        let mut output = Vec::new();
        convert(Cursor::new(input.as_bytes()), &mut output, &ConversionOptions::default()).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        prop_assert_eq!(lines.len(), records + 1);
        for line in lines {
            prop_assert_eq!(line.split('\t').count(), 2 + 2 * samples);
        }
    }
}
