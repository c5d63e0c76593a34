//! Random sequence pairs with a given error rate.
use chainx::Sequence;
use itertools::Itertools;
use rand::{Rng, SeedableRng};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorModel {
    /// Substitutions, insertions and deletions at uniformly random positions.
    #[default]
    Uniform,
    /// Make a single gap (insertion or deletion) of size e*n.
    Gap,
    /// Delete a region of size e*n and insert it elsewhere.
    Move,
}

pub struct GenerateOptions {
    pub length: usize,
    pub error_rate: f32,
    pub error_model: ErrorModel,
}

const ALPH: [u8; 4] = *b"ACGT";

enum Mutation {
    // Replace char at pos.
    Substitution(usize, u8),
    // Insert char before pos.
    Insertion(usize, u8),
    // Delete char at pos.
    Deletion(usize),
}

fn rand_char(rng: &mut impl Rng) -> u8 {
    ALPH[rng.gen_range(0..4)]
}

fn random_mutation(len_b: usize, rng: &mut impl Rng) -> Mutation {
    // Substitution / insertion / deletion all with equal probability.
    // For length 0 sequences, only generate insertions.
    match if len_b == 0 {
        1
    } else {
        rng.gen_range(0..3usize)
    } {
        0 => Mutation::Substitution(rng.gen_range(0..len_b), rand_char(rng)),
        1 => Mutation::Insertion(rng.gen_range(0..len_b + 1), rand_char(rng)),
        _ => Mutation::Deletion(rng.gen_range(0..len_b)),
    }
}

/// A random reference of the given length and a query derived from it.
pub fn generate_pair(opt: &GenerateOptions, rng: &mut impl Rng) -> (Sequence, Sequence) {
    let a = (0..opt.length).map(|_| rand_char(rng)).collect_vec();
    let num_mutations = ((opt.error_rate * opt.length as f32).ceil() as usize).min(opt.length);
    let mut b = a.clone();
    match opt.error_model {
        ErrorModel::Uniform => {
            for _ in 0..num_mutations {
                match random_mutation(b.len(), rng) {
                    Mutation::Substitution(i, c) => b[i] = c,
                    Mutation::Insertion(i, c) => b.insert(i, c),
                    Mutation::Deletion(i) => {
                        b.remove(i);
                    }
                }
            }
        }
        ErrorModel::Gap => {
            if rng.gen_bool(0.5) {
                // deletion
                let start = rng.gen_range(0..=b.len() - num_mutations);
                b.drain(start..start + num_mutations);
            } else {
                // insertion
                let start = rng.gen_range(0..=b.len());
                let text = (0..num_mutations).map(|_| rand_char(rng)).collect_vec();
                b.splice(start..start, text);
            }
        }
        ErrorModel::Move => {
            let start = rng.gen_range(0..=b.len() - num_mutations);
            let piece = b.drain(start..start + num_mutations).collect_vec();
            let start = rng.gen_range(0..=b.len());
            b.splice(start..start, piece);
        }
    }
    (a, b)
}

pub fn generate_model(
    length: usize,
    error_rate: f32,
    error_model: ErrorModel,
    seed: u64,
) -> (Sequence, Sequence) {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    generate_pair(
        &GenerateOptions {
            length,
            error_rate,
            error_model,
        },
        &mut rng,
    )
}

pub fn setup_sequences(n: usize, e: f32) -> (Sequence, Sequence) {
    generate_model(n, e, ErrorModel::Uniform, 31415)
}
