#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let cursor = Cursor::new(data);
    let reader = vcf2hap::vcf::Reader::new(cursor);

    // Iterate all records - should never panic
    for result in reader.take(1000) {
        match result {
            Ok(record) => {
                // Exercise the fields the transcoder consumes
                let _ = record.alternates.len();
                let _ = record.genotypes.len();
            }
            Err(_) => {
                // Parse errors are expected for random input
            }
        }
    }
});
