use std::io::{stdout, BufWriter, Write};

use anyhow::Result;
use clap::Parser;

use chainx_bin::{cli::Cli, init_logger};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut out = BufWriter::new(stdout().lock());
    cli.run(&mut out)?;
    out.flush()?;
    Ok(())
}
