use anyhow::Result;

fn main() -> Result<()> {
    vcf2hap::cli::run()
}
