use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use flate2::read::MultiGzDecoder;

/// Opens a VCF file and transparently peels off GZIP layers to expose
/// the underlying text stream.
///
/// Detection is by magic bytes rather than file extension, so misnamed
/// files still open. Nested layers (e.g. .vcf.gz.gz) are unwrapped up
/// to a fixed depth.
pub fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input {}", path.display()))?;
    let mut reader: Box<dyn BufRead + Send> = Box::new(BufReader::new(file));

    // Limit recursion depth to avoid infinite loops on malformed inputs
    let mut depth = 0;
    const MAX_DEPTH: usize = 10;

    while depth < MAX_DEPTH {
        let is_gzip = {
            let buf = reader.fill_buf()?;
            // GZIP magic: 1f 8b
            buf.len() >= 2 && buf[0] == 0x1f && buf[1] == 0x8b
        };
        if !is_gzip {
            break;
        }

        tracing::debug!("detected gzip layer");
        // MultiGzDecoder also handles BGZF and concatenated members
        reader = Box::new(BufReader::new(MultiGzDecoder::new(reader)));
        depth += 1;
    }

    Ok(reader)
}
