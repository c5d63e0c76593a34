//! Enumerating exact-match anchors between a reference and a query.
//!
//! Seeds are found by looking up every `min_len`-mer of the query in a hashmap
//! over all `min_len`-mers of the reference. Seeds that are left-maximal are
//! extended to the right into maximal exact matches (MEMs). Occurrence counts
//! for maximal unique matches (MUMs) come from suffix arrays.
use bio::data_structures::suffix_array::{suffix_array, RawSuffixArray};
use clap::{Args, ValueEnum};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use chainx::{Anchor, Seq, I};

/// Which exact matches to use as anchors.
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum AnchorType {
    /// All maximal exact matches.
    #[value(name = "MEM", alias = "mem")]
    Mem,
    /// Maximal exact matches occurring once in the reference and once in the query.
    #[default]
    #[value(name = "MUM", alias = "mum")]
    Mum,
}

fn default_min_len() -> usize {
    20
}

/// Anchor arguments.
#[derive(Args, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[clap(next_help_heading = "Anchors")]
#[serde(deny_unknown_fields)]
pub struct AnchorArgs {
    /// Minimal anchor length
    #[clap(short = 'l', long, default_value_t = 20, value_name = "LEN", display_order = 5)]
    #[serde(default = "default_min_len")]
    pub min_len: usize,

    /// Anchor type
    #[clap(short = 'a', long = "anchor", default_value_t, value_enum, display_order = 5)]
    #[serde(default)]
    pub anchor_type: AnchorType,
}

impl Default for AnchorArgs {
    fn default() -> Self {
        Self {
            min_len: default_min_len(),
            anchor_type: AnchorType::Mum,
        }
    }
}

/// A suffix array over `text`, used to count occurrences of substrings.
pub struct SuffixIndex {
    /// The text followed by the `$` sentinel.
    text: Vec<u8>,
    sa: RawSuffixArray,
}

impl SuffixIndex {
    pub fn new(text: Seq) -> Self {
        let mut text = text.to_owned();
        text.push(b'$');
        let sa = suffix_array(&text);
        Self { text, sa }
    }

    /// The number of occurrences of `pattern` in the text.
    pub fn count(&self, pattern: Seq) -> usize {
        let prefix = |s: usize| {
            let suffix = &self.text[s..];
            &suffix[..suffix.len().min(pattern.len())]
        };
        let lo = self.sa.partition_point(|&s| prefix(s) < pattern);
        let hi = self.sa.partition_point(|&s| prefix(s) <= pattern);
        hi - lo
    }
}

/// All `min_len`-mers of a reference, to find exact matches with queries.
pub struct MatchIndex<'a> {
    reference: Seq<'a>,
    min_len: usize,
    kmers: HashMap<&'a [u8], SmallVec<[I; 2]>>,
    suffixes: SuffixIndex,
}

impl<'a> MatchIndex<'a> {
    pub fn new(reference: Seq<'a>, min_len: usize) -> Self {
        // Anchors have length at least 1.
        let min_len = min_len.max(1);
        let mut kmers = HashMap::<&[u8], SmallVec<[I; 2]>>::default();
        if reference.len() >= min_len {
            kmers.reserve(reference.len() - min_len + 1);
            for (i, kmer) in reference.windows(min_len).enumerate() {
                kmers.entry(kmer).or_default().push(i as I);
            }
        }
        Self {
            reference,
            min_len,
            kmers,
            suffixes: SuffixIndex::new(reference),
        }
    }

    /// All maximal exact matches of length at least `min_len` between the reference and `query`.
    pub fn mems(&self, query: Seq) -> Vec<Anchor> {
        let r = self.reference;
        let mut anchors = vec![];
        if query.len() < self.min_len {
            return anchors;
        }
        for (j, kmer) in query.windows(self.min_len).enumerate() {
            let Some(is) = self.kmers.get(kmer) else {
                continue;
            };
            for &i in is {
                let i = i as usize;
                // Matches that extend to the left are found from an earlier seed.
                if i > 0 && j > 0 && r[i - 1] == query[j - 1] {
                    continue;
                }
                let len = self.min_len
                    + r[i + self.min_len..]
                        .iter()
                        .zip(&query[j + self.min_len..])
                        .take_while(|(x, y)| x == y)
                        .count();
                anchors.push(Anchor::new(i as I, j as I, len as I));
            }
        }
        anchors
    }

    /// MEMs whose string occurs exactly once in the reference and once in `query`.
    pub fn mums(&self, query: Seq) -> Vec<Anchor> {
        let mems = self.mems(query);
        if mems.is_empty() {
            return mems;
        }
        let query_suffixes = SuffixIndex::new(query);
        mems.into_iter()
            .filter(|a| {
                let s = &query[a.qry_start as usize..(a.qry_end() + 1) as usize];
                self.suffixes.count(s) == 1 && query_suffixes.count(s) == 1
            })
            .collect()
    }
}

/// Anchors of the given type between the indexed reference and `query`, in 0-based coordinates.
pub fn find_anchors(index: &MatchIndex, query: Seq, anchor_type: AnchorType) -> Vec<Anchor> {
    match anchor_type {
        AnchorType::Mem => index.mems(query),
        AnchorType::Mum => index.mums(query),
    }
}
