use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Args, Parser, Subcommand};
use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use chainx::{AnchorSet, ChainParams, ChainStats, Cost, Mode, Strategy};

use crate::io::{read_sequences, Record};
use crate::matches::{find_anchors, AnchorArgs, MatchIndex};
use crate::report::DistanceMatrix;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {
    /// Log more. Pass twice for trace output.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Anchor-restricted edit distance between the target and each query.
    Distance(DistanceArgs),
    /// Print the anchors between the target and each query.
    Anchors(AnchorsArgs),
    /// Unrestricted edit distance between the target and each query.
    Edit(EditArgs),
}

/// Input files.
#[derive(Args, Debug, Clone)]
#[clap(next_help_heading = "Input")]
pub struct Input {
    /// Target sequence in FASTA or FASTQ format, optionally gzipped.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub target: PathBuf,

    /// Query sequences in FASTA or FASTQ format, optionally gzipped.
    #[clap(short, long = "query", value_parser = value_parser!(PathBuf), display_order = 1)]
    pub queries: PathBuf,
}

impl Input {
    /// The first record of the target file, and all queries.
    fn read(&self) -> Result<(Record, Vec<Record>)> {
        let mut targets = read_sequences(&self.target)?;
        if targets.len() > 1 {
            warn!(
                "{} contains {} sequences; only the first is used as target",
                self.target.display(),
                targets.len()
            );
        }
        let target = targets.swap_remove(0);
        info!("Read target {}, {} residues", target.id, target.seq.len());
        let queries = read_sequences(&self.queries)?;
        info!(
            "Read {} queries, {} residues",
            queries.len(),
            queries.iter().map(|q| q.seq.len()).sum::<usize>()
        );
        Ok((target, queries))
    }

    /// Both files must be the same to compute a distance matrix.
    fn check_all2all(&self, mode: Mode) -> Result<()> {
        if self.target != self.queries {
            bail!("Query and target sequence file paths must be the same with --all2all");
        }
        if mode != Mode::Global {
            bail!("Only the global distance [-m g] can be used with --all2all");
        }
        Ok(())
    }
}

fn init_threads(threads: Option<usize>) -> Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Could not initialize the thread pool")?;
    }
    Ok(())
}

#[derive(Args, Debug, Clone)]
pub struct DistanceArgs {
    #[clap(flatten)]
    pub input: Input,

    #[clap(flatten)]
    pub anchors: AnchorArgs,

    #[clap(flatten)]
    pub params: ChainParams,

    /// Use the slow 2D DP for a correctness check. Same as `--strategy naive`.
    #[clap(long)]
    pub naive: bool,

    /// Print all-to-all global distances among the queries as a PHYLIP matrix.
    #[clap(long)]
    pub all2all: bool,

    /// Print one JSON object per query.
    #[clap(long, conflicts_with = "all2all")]
    pub json: bool,

    /// Number of threads.
    #[clap(short = 'j', long)]
    pub threads: Option<usize>,
}

/// One line of `--json` output.
#[derive(Serialize, Debug)]
struct QueryResult<'a> {
    index: usize,
    id: &'a str,
    len: usize,
    anchors: usize,
    distance: Cost,
    passes: usize,
    seconds: f64,
}

impl DistanceArgs {
    pub fn params(&self) -> ChainParams {
        let mut params = self.params;
        if self.naive {
            params.strategy = Strategy::Naive;
        }
        params
    }

    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let params = self.params();
        info!("{params}");
        info!(
            "Anchors: minimum length {}, type {:?}",
            self.anchors.min_len, self.anchors.anchor_type
        );
        init_threads(self.threads)?;

        if self.all2all {
            self.input.check_all2all(params.mode)?;
            let records = read_sequences(&self.input.queries)?;
            let start = Instant::now();
            let matrix = DistanceMatrix::all_to_all(&records, self.anchors, params)?;
            matrix.write_phylip(out)?;
            info!(
                "All-to-all distance computation took {:.6} seconds",
                start.elapsed().as_secs_f64()
            );
            return Ok(());
        }

        let (target, queries) = self.input.read()?;
        let start = Instant::now();
        let index = MatchIndex::new(&target.seq, self.anchors.min_len);
        info!(
            "Index computed in {:.6} seconds",
            start.elapsed().as_secs_f64()
        );

        let results = queries
            .par_iter()
            .enumerate()
            .map(|(i, query)| -> Result<ChainStats> {
                let start = Instant::now();
                let anchors = find_anchors(&index, &query.seq, self.anchors.anchor_type);
                let set = AnchorSet::new(anchors, target.coord_len()?, query.coord_len()?)?;
                if params.trace {
                    info!("Sorted anchors of query #{i} = [{}]", set.anchors().iter().join(", "));
                }
                let result = params
                    .distance(&set)
                    .with_context(|| format!("Query #{i} ({})", query.id))?;
                Ok(ChainStats::new(&set, result, start.elapsed().as_secs_f64()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut total = ChainStats::default();
        for (i, (query, stats)) in queries.iter().zip(results).enumerate() {
            info!(
                "Query #{i} ({} residues): {} anchors, average length {:.2}, {:.6} seconds",
                query.seq.len(),
                stats.anchors,
                if stats.anchors == 0 {
                    0.
                } else {
                    stats.anchor_len as f64 / stats.anchors as f64
                },
                stats.seconds
            );
            if self.json {
                let line = QueryResult {
                    index: i,
                    id: &query.id,
                    len: query.seq.len(),
                    anchors: stats.anchors,
                    distance: stats.distance,
                    passes: stats.passes,
                    seconds: stats.seconds,
                };
                writeln!(out, "{}", serde_json::to_string(&line)?)?;
            } else {
                writeln!(out, "distance = {}", stats.distance)?;
            }
            total += stats;
        }
        info!("Total: {total}");
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnchorsArgs {
    #[clap(flatten)]
    pub input: Input,

    #[clap(flatten)]
    pub anchors: AnchorArgs,
}

impl AnchorsArgs {
    /// Print `<qry_idx> <qry_st> <qry_end> <target_st> <target_end> <length>`
    /// in 1-based coordinates.
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let (target, queries) = self.input.read()?;
        let index = MatchIndex::new(&target.seq, self.anchors.min_len);
        info!("Format: <qry_idx> <qry_st> <qry_end> <target_st> <target_end> <length>, 1-based");
        for (i, query) in queries.iter().enumerate() {
            let anchors = find_anchors(&index, &query.seq, self.anchors.anchor_type);
            debug!("Query #{i}: {} anchors", anchors.len());
            for a in anchors {
                writeln!(
                    out,
                    "{i}\t{}\t{}\t{}\t{}\t{}",
                    a.qry_start + 1,
                    a.qry_end() + 1,
                    a.ref_start + 1,
                    a.ref_end() + 1,
                    a.len
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[clap(flatten)]
    pub input: Input,

    /// Global, or semi-global with free target ends.
    #[clap(short, long, default_value_t, value_enum)]
    pub mode: Mode,

    /// Print all-to-all global distances among the queries as a PHYLIP matrix.
    #[clap(long)]
    pub all2all: bool,

    /// Number of threads.
    #[clap(short = 'j', long)]
    pub threads: Option<usize>,
}

/// Unrestricted edit distance. In semi-global mode the query must be fully
/// aligned to some substring of the target.
pub fn edit_distance(target: &[u8], query: &[u8], mode: Mode) -> Cost {
    match mode {
        Mode::Global => triple_accel::levenshtein_exp(target, query) as Cost,
        Mode::SemiGlobal => triple_accel::levenshtein_search(query, target)
            .map(|m| m.k as Cost)
            .min()
            .unwrap_or(query.len() as Cost),
    }
}

impl EditArgs {
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        init_threads(self.threads)?;
        if self.all2all {
            self.input.check_all2all(self.mode)?;
            let records = read_sequences(&self.input.queries)?;
            let matrix = DistanceMatrix::compute(&records, |r, earlier| {
                Ok(earlier
                    .iter()
                    .map(|q| edit_distance(&r.seq, &q.seq, Mode::Global))
                    .collect())
            })?;
            matrix.write_phylip(out)?;
            return Ok(());
        }
        let (target, queries) = self.input.read()?;
        let distances = queries
            .par_iter()
            .map(|q| edit_distance(&target.seq, &q.seq, self.mode))
            .collect::<Vec<_>>();
        for (i, d) in distances.into_iter().enumerate() {
            info!("Query #{i} ({} residues)", queries[i].seq.len());
            writeln!(out, "distance = {d}")?;
        }
        Ok(())
    }
}

impl Cli {
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        match &self.command {
            Command::Distance(args) => args.run(out),
            Command::Anchors(args) => args.run(out),
            Command::Edit(args) => args.run(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_test() {
        Cli::command().debug_assert();
    }

    #[test]
    fn naive_flag() {
        let cli = Cli::parse_from(["chainx", "distance", "-t", "t.fa", "-q", "q.fa", "--naive"]);
        let Command::Distance(args) = cli.command else {
            panic!("Expected the distance subcommand");
        };
        assert_eq!(args.params().strategy, Strategy::Naive);
        assert_eq!(args.anchors, AnchorArgs::default());
        assert_eq!(args.params().mode, Mode::Global);
    }

    #[test]
    fn all2all_requires_same_files() {
        let input = Input {
            target: "a.fa".into(),
            queries: "b.fa".into(),
        };
        assert!(input.check_all2all(Mode::Global).is_err());
        let input = Input {
            target: "a.fa".into(),
            queries: "a.fa".into(),
        };
        assert!(input.check_all2all(Mode::SemiGlobal).is_err());
        assert!(input.check_all2all(Mode::Global).is_ok());
    }

    #[test]
    fn edit() {
        assert_eq!(edit_distance(b"ACGTACGT", b"ACGTTCGT", Mode::Global), 1);
        assert_eq!(edit_distance(b"GGGGACGTAAAA", b"ACGT", Mode::Global), 8);
        assert_eq!(edit_distance(b"GGGGACGTAAAA", b"ACGT", Mode::SemiGlobal), 0);
    }
}
