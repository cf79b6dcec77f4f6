//! Decoy pool generation
//!
//! Decoys come from two places: the required tokens of the other challenges in
//! the set (plausible words in the same register) and the language's static
//! corpus. The caller always adds the full required-token list separately.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::Challenge;
use crate::corpus::DecoyCorpus;
use crate::normalize_token;
use crate::settings::{Difficulty, Settings};

/// Shuffled, deduplicated decoys for `challenge`, at most `count` long
///
/// Never returns a token equal (ignoring case) to one of the challenge's
/// required tokens.
pub fn generate_candidates<R: Rng + ?Sized>(
    challenge: &Challenge,
    all_challenges: &[Challenge],
    corpus_words: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let excluded: HashSet<String> = challenge
        .required_tokens
        .iter()
        .map(|t| normalize_token(t))
        .collect();
    let mut seen = HashSet::new();

    let cross_sentence = all_challenges
        .iter()
        .filter(|other| *other != challenge)
        .flat_map(|other| other.required_tokens.iter());

    let mut candidates: Vec<String> = cross_sentence
        .chain(corpus_words.iter())
        .filter(|token| {
            let key = normalize_token(token);
            !key.is_empty() && !excluded.contains(&key) && seen.insert(key)
        })
        .map(|token| token.trim().to_string())
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}

/// Decoy pool for a challenge using the tunables' count policy
///
/// The challenge's own language tag picks the corpus when the corpus knows it;
/// otherwise the engine-wide `language` is used.
pub fn decoy_pool<R: Rng + ?Sized>(
    challenge: &Challenge,
    all_challenges: &[Challenge],
    difficulty: Difficulty,
    language: &str,
    corpus: &DecoyCorpus,
    settings: &Settings,
    rng: &mut R,
) -> Vec<String> {
    let words = corpus
        .words(&challenge.language)
        .or_else(|| corpus.words(language))
        .unwrap_or(&[]);
    let pool = generate_candidates(
        challenge,
        all_challenges,
        words,
        settings.decoy_count(difficulty),
        rng,
    );
    if pool.len() < settings.decoy_count(difficulty) {
        log::debug!(
            "Decoy pool for '{}' short: {} of {} requested",
            challenge.id,
            pool.len(),
            settings.decoy_count(difficulty)
        );
    }
    pool
}
