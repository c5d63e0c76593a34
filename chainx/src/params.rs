//! Solver configuration and the single `distance` entry point used by drivers.
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::chain::{chain_banded, chain_plain, ChainCost, Mode};
use crate::cost::Precedence;
use crate::dp::exact_dp;
use crate::prelude::*;

/// How the distance is computed.
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// The O(n^2) chaining DP over all predecessors.
    Plain,
    /// Chaining restricted to a band that is widened until the distance fits.
    #[default]
    Banded,
    /// The exact quadratic DP over the full grid.
    Naive,
}

/// Parameters of a single distance computation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[cfg_attr(feature = "cli", clap(next_help_heading = "Chaining"))]
#[serde(deny_unknown_fields)]
pub struct ChainParams {
    /// Which anchor pairs may be chained.
    #[cfg_attr(feature = "cli", clap(long, default_value_t, value_enum, display_order = 10))]
    #[serde(default)]
    pub precedence: Precedence,

    /// Global, or semi-global with free reference ends.
    #[cfg_attr(
        feature = "cli",
        clap(short, long, default_value_t, value_enum, display_order = 10)
    )]
    #[serde(default)]
    pub mode: Mode,

    #[cfg_attr(feature = "cli", clap(long, default_value_t, value_enum, display_order = 10))]
    #[serde(default)]
    pub strategy: Strategy,

    /// Log the cost table and the number of passes of each computation.
    #[cfg_attr(feature = "cli", clap(long, hide_short_help = true))]
    #[serde(default)]
    pub trace: bool,
}

impl ChainParams {
    /// The distance between the two sequences of `set`.
    ///
    /// The anchors are re-sorted on a private copy when the precedence policy
    /// requires a different order than the one `set` is in.
    pub fn distance(&self, set: &AnchorSet) -> Result<ChainCost> {
        if self.strategy == Strategy::Naive {
            let cost = exact_dp(set, self.mode, self.trace)?;
            return Ok(ChainCost { cost, passes: 1 });
        }
        let set = set.for_precedence(self.precedence);
        match self.strategy {
            Strategy::Plain => chain_plain(&set, self.precedence, self.mode, self.trace),
            _ => chain_banded(&set, self.precedence, self.mode, self.trace),
        }
    }
}

/// A one-line summary for log lines.
impl Display for ChainParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Global => "global",
            Mode::SemiGlobal => "semi-global",
        };
        match self.strategy {
            Strategy::Naive => write!(f, "Exact {mode} DP"),
            strategy => {
                let precedence = match self.precedence {
                    Precedence::Strict => "strict",
                    Precedence::WeakForward => "weak-forward",
                    Precedence::WeakReverse => "weak-reverse",
                };
                let strategy = if strategy == Strategy::Plain {
                    "Plain"
                } else {
                    "Banded"
                };
                write!(f, "{strategy} {mode} chaining ({precedence} precedence)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = ChainParams::default();
        assert_eq!(p.precedence, Precedence::Strict);
        assert_eq!(p.mode, Mode::Global);
        assert_eq!(p.strategy, Strategy::Banded);
        assert!(!p.trace);
        assert_eq!(p.to_string(), "Banded global chaining (strict precedence)");
    }

    #[test]
    fn summary() {
        let p = ChainParams {
            strategy: Strategy::Naive,
            mode: Mode::SemiGlobal,
            ..Default::default()
        };
        assert_eq!(p.to_string(), "Exact semi-global DP");
    }

    #[test]
    fn all_strategies_agree() {
        let set = AnchorSet::new(vec![Anchor::new(0, 0, 4), Anchor::new(5, 5, 3)], 8, 8).unwrap();
        for strategy in [Strategy::Plain, Strategy::Banded, Strategy::Naive] {
            for precedence in [
                Precedence::Strict,
                Precedence::WeakForward,
                Precedence::WeakReverse,
            ] {
                let p = ChainParams {
                    precedence,
                    strategy,
                    ..Default::default()
                };
                assert_eq!(p.distance(&set).unwrap().cost, 1, "{p}");
            }
        }
    }

    #[cfg(feature = "cli")]
    #[test]
    fn cli_args() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[clap(flatten)]
            params: ChainParams,
        }

        let cli = Cli::parse_from([
            "chainx",
            "-m",
            "sg",
            "--precedence",
            "weak-reverse",
            "--strategy",
            "plain",
        ]);
        assert_eq!(
            cli.params,
            ChainParams {
                precedence: Precedence::WeakReverse,
                mode: Mode::SemiGlobal,
                strategy: Strategy::Plain,
                trace: false,
            }
        );
    }
}
