//! Inputs and oracles for testing the chaining solvers.
pub mod generate;

use chainx::*;
use itertools::Itertools;

use generate::{generate_model, ErrorModel};

pub const PRECEDENCES: [Precedence; 3] = [
    Precedence::Strict,
    Precedence::WeakForward,
    Precedence::WeakReverse,
];

pub const MODES: [Mode; 2] = [Mode::Global, Mode::SemiGlobal];

pub fn test_sequences() -> Vec<(Seq<'static>, Seq<'static>)> {
    vec![
        (b"ACGTACGT", b"ACGTTCGT"),
        (b"TTGGGTCAATCAGCCAGTTTTTA", b"TTTGAGTGGGTCATCACCGATTTTAT"),
        (b"ACTGACCAGT", b"CCGACAGGA"),
        (b"AGTTTTAT", b"ACCGATTTTTA"),
        (b"CTCTCTTCTCTCTCTA", b"CCTCTCTCTCTCCTCTC"),
        (b"AGTGGGTTGCCTTCATTCCG", b"AGTGGTGTCTTCAGGCCTTCATTCCG"),
        (b"GCACGTCGCCCCCCGCCCGCG", b"GCCCGCCCGCCCGCCCCCGCCCCC"),
    ]
}

/// Sequence pairs over lengths x error rates x error models, with a fixed seed per pair.
pub fn gen_pairs() -> impl Iterator<Item = ((Sequence, Sequence), (usize, f32, ErrorModel, u64))> {
    let ns = [0usize, 1, 2, 5, 10, 20, 50, 100, 200, 500];
    let es = [0.0f32, 0.01, 0.05, 0.10, 0.20, 0.50];
    let models = [ErrorModel::Uniform, ErrorModel::Gap, ErrorModel::Move];
    ns.into_iter()
        .cartesian_product(es)
        .cartesian_product(models)
        .enumerate()
        .map(|(seed, ((n, e), error_model))| {
            let seed = 31415 + seed as u64;
            let pair = generate_model(n, e, error_model, seed);
            (pair, (n, e, error_model, seed))
        })
}

/// All maximal exact matches of length at least `min_len` between `a` (reference)
/// and `b` (query), by brute force over all cell pairs.
pub fn naive_mems(a: Seq, b: Seq, min_len: usize) -> Vec<Anchor> {
    let mut mems = vec![];
    for i in 0..a.len() {
        for j in 0..b.len() {
            // Only start at left-maximal positions.
            if a[i] != b[j] || (i > 0 && j > 0 && a[i - 1] == b[j - 1]) {
                continue;
            }
            let len = a[i..]
                .iter()
                .zip(&b[j..])
                .take_while(|(x, y)| x == y)
                .count();
            if len >= min_len.max(1) {
                mems.push(Anchor::new(i as I, j as I, len as I));
            }
        }
    }
    mems
}

/// Every pair of equal symbols as an anchor of length 1.
/// The anchored edit distance over these is the unrestricted edit distance.
pub fn all_matches(a: Seq, b: Seq) -> Vec<Anchor> {
    (0..a.len())
        .cartesian_product(0..b.len())
        .filter(|&(i, j)| a[i] == b[j])
        .map(|(i, j)| Anchor::new(i as I, j as I, 1))
        .collect()
}

pub fn anchor_set(a: Seq, b: Seq, anchors: Vec<Anchor>) -> AnchorSet {
    AnchorSet::new(anchors, a.len() as I, b.len() as I).unwrap()
}

/// Check the relations between all solver configurations on one input:
/// - plain and banded chaining agree with the exact DP over the same MEMs for
///   every precedence and mode,
/// - semi-global is never more expensive than global,
/// - the exact DP over the MEMs is bounded below by the unrestricted edit
///   distance, and equal to it when every symbol match is an anchor,
/// - strict chaining over all symbol matches equals the exact DP over them.
pub fn test_solvers_on_input(a: Seq, b: Seq, min_len: usize, params: &str) {
    // Set to true for local debugging.
    const D: bool = false;
    if D {
        eprintln!("{params}");
        eprintln!("a {}\nb {}", seq_to_string(a), seq_to_string(b));
    }
    let set = anchor_set(a, b, naive_mems(a, b, min_len));
    let repr = || {
        format!(
            "\n{params}\nlet a = \"{}\".as_bytes();\nlet b = \"{}\".as_bytes();",
            seq_to_string(a),
            seq_to_string(b)
        )
    };

    for precedence in PRECEDENCES {
        let mut costs = vec![];
        for mode in MODES {
            let sorted = set.for_precedence(precedence);
            let plain = chain_plain(&sorted, precedence, mode, false).unwrap();
            let banded = chain_banded(&sorted, precedence, mode, false).unwrap();
            assert_eq!(
                plain.cost,
                banded.cost,
                "{precedence:?} {mode:?} {}",
                repr()
            );
            assert!(banded.passes >= 1);
            assert_eq!(
                Ok(plain.cost),
                exact_dp(&set, mode, false),
                "{precedence:?} {mode:?} {}",
                repr()
            );
            costs.push(plain.cost);
        }
        assert!(costs[1] <= costs[0], "{precedence:?} {}", repr());
    }

    let edit = triple_accel::levenshtein_exp(a, b) as Cost;
    let anchored = exact_dp(&set, Mode::Global, false).unwrap();
    assert!(edit <= anchored, "{}", repr());
    let full = anchor_set(a, b, all_matches(a, b));
    assert_eq!(exact_dp(&full, Mode::Global, false), Ok(edit), "{}", repr());

    // Chaining unit anchors is quadratic in their number, so keep the grid small.
    if a.len() * b.len() <= MAX_UNIT_CHAIN_CELLS {
        for mode in MODES {
            let chained = chain_banded(&full, Precedence::Strict, mode, false).unwrap();
            assert_eq!(
                Ok(chained.cost),
                exact_dp(&full, mode, false),
                "unit anchors {mode:?} {}",
                repr()
            );
        }
    }
}

/// Largest `|a| * |b|` for which all symbol matches are chained.
const MAX_UNIT_CHAIN_CELLS: usize = 20_000;

/// Run `test_solvers_on_input` on the hardcoded and the generated pairs with
/// length at most `max_n`.
pub fn test_solvers_up_to(min_len: usize, max_n: usize) {
    for (a, b) in test_sequences() {
        test_solvers_on_input(a, b, min_len, "hardcoded test_sequences");
    }
    for ((a, b), (n, e, error_model, seed)) in gen_pairs() {
        if n > max_n {
            continue;
        }
        test_solvers_on_input(
            &a,
            &b,
            min_len,
            &format!("seed {seed:>10} n {n:>5} e {e:>.2} error_model {error_model:?}"),
        );
    }
}

pub fn seq_to_string(seq: Seq) -> String {
    String::from_utf8_lossy(seq).into_owned()
}
