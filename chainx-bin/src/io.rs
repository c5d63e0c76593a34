//! Reading sequences from (optionally gzipped) FASTA and FASTQ files.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use bio::io::{fasta, fastq};
use flate2::read::MultiGzDecoder;
use log::info;

use chainx::{Sequence, I};

/// A named sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub seq: Sequence,
}

impl Record {
    /// The sequence length as an anchor coordinate.
    pub fn coord_len(&self) -> Result<I> {
        I::try_from(self.seq.len()).with_context(|| {
            format!("Sequence {} with {} residues is too long", self.id, self.seq.len())
        })
    }
}

fn reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    Ok(if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}

/// All records in `path`, with upper-cased sequences.
///
/// The format is detected from the first byte: `>` for FASTA, `@` for FASTQ.
pub fn read_sequences(path: &Path) -> Result<Vec<Record>> {
    let mut input = reader(path)?;
    let first = input
        .fill_buf()
        .with_context(|| format!("Could not read {}", path.display()))?
        .first()
        .copied();
    let records = match first {
        Some(b'>') => fasta::Reader::new(input)
            .records()
            .map(|r| {
                let r = r.with_context(|| format!("Invalid FASTA record in {}", path.display()))?;
                Ok(Record {
                    id: r.id().to_string(),
                    seq: r.seq().to_ascii_uppercase(),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(b'@') => fastq::Reader::new(input)
            .records()
            .map(|r| {
                let r = r.with_context(|| format!("Invalid FASTQ record in {}", path.display()))?;
                Ok(Record {
                    id: r.id().to_string(),
                    seq: r.seq().to_ascii_uppercase(),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(c) => bail!(
            "{} is neither FASTA nor FASTQ: unexpected first character {:?}",
            path.display(),
            c as char
        ),
        None => bail!("{} is empty", path.display()),
    };
    if records.is_empty() {
        bail!("{} contains no sequences", path.display());
    }
    info!("Read {} sequences from {}", records.len(), path.display());
    Ok(records)
}
