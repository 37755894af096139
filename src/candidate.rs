//! Component F — candidate enumerator and scorer.
//!
//! Builds per-token candidate lists from the [`FuzzyDictionary`], enumerates
//! their Cartesian product, scores each sequence against the
//! [`FrequencyStore`]'s n-gram probabilities combined with edit-distance
//! penalties, and retains a fixed-size top-K buffer via binary-search insert
//! into a capped ranking.

use std::collections::HashSet;

use crate::dictionary::{FuzzyDictionary, Level, LookupOptions};
use crate::frequency_store::FrequencyStore;

/// Fallback bounds used directly by the in-module tests; [`crate::Corrector`]
/// always threads its own `Config::candidates_per_token` / `Config::top_k`
/// through explicitly instead of relying on these.
const K_PER_TOKEN: usize = 10;
const K_OUT: usize = 10;

/// A dictionary suggestion for one input token, with its effective
/// (rank-penalized) distance.
#[derive(Debug, Clone)]
pub struct TokenCandidate {
    pub word: String,
    pub distance: f64,
}

/// A fully formed, scored token sequence.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub tokens: Vec<String>,
    pub score: f64,
}

fn alpha(d: f64) -> f64 {
    if d == 0.0 {
        0.0
    } else {
        100.0 * d.clamp(0.0, 5.0) / 5.0
    }
}

fn penalty(p: f64, d: f64) -> f64 {
    p.abs() * alpha(d) / 100.0
}

/// Builds the bounded candidate list for a single token, escalating the
/// edit-distance budget and suggestion level on empty results.
pub fn token_candidates(
    token: &str,
    dict: &FuzzyDictionary,
    penalty_step: f64,
    k_per_token: usize,
) -> Vec<TokenCandidate> {
    if token.chars().count() < 2 || token.chars().any(|c| c.is_ascii_digit()) {
        return vec![TokenCandidate {
            word: token.to_string(),
            distance: 0.0,
        }];
    }

    let mut opts = LookupOptions {
        max_edit_distance: 2.0,
        level: Level::All,
        ..Default::default()
    };
    let mut results = dict.lookup(token, &opts);
    if results.is_empty() {
        opts.max_edit_distance = 3.0;
        opts.level = Level::Closest;
        results = dict.lookup(token, &opts);
        if results.is_empty() {
            opts.level = Level::All;
            results = dict.lookup(token, &opts);
        }
    }
    if results.is_empty() {
        return vec![TokenCandidate {
            word: token.to_string(),
            distance: 0.0,
        }];
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (rank, s) in results.into_iter().enumerate() {
        if out.len() >= k_per_token {
            break;
        }
        if !seen.insert(s.word.clone()) {
            continue;
        }
        out.push(TokenCandidate {
            word: s.word,
            distance: s.edit_distance + rank as f64 * penalty_step,
        });
    }
    out
}

/// A term that carries its order's additive weight bonus before the penalty
/// is subtracted — used for every order except the highest one actually
/// attested in a window.
fn term_with_weight(p: f64, w: f64, d: f64) -> f64 {
    p + w - penalty(p, d)
}

/// A term with no weight bonus — used for the highest attested order in a
/// window (real or substituted, see [`score_sequence`]).
fn term_without_weight(p: f64, d: f64) -> f64 {
    p - penalty(p, d)
}

fn unigram_term(fs: &FrequencyStore, w1: f64, t: &str, d: f64) -> f64 {
    term_with_weight(fs.unigram_prob(t), w1, d)
}

/// Scores a window of 1-3 tokens with their per-token effective distances.
/// Each order below the window's length contributes its
/// probability term plus that order's weight bonus; the top order contributes
/// its term with no bonus. When the top order's n-gram was never observed
/// (probability 0), "fall back to the doubled unigram/bigram score" is read
/// as: substitute the missing top-order probability with the probability of
/// the next order down evaluated over the *trailing* sub-window, so the
/// window is scored using two evaluations of the lower order instead of one
/// evaluation of the (unseen) higher order — keeping exactly the same number
/// of weight bonuses as the real-data case, so a genuine higher-order match
/// always outscores an absence of one. Windows longer than 3 (never produced
/// by the orchestrator) degrade to scoring the leading trigram plus a
/// unigram bonus per trailing token, rather than panicking.
pub fn score_sequence(
    fs: &FrequencyStore,
    w1: f64,
    w2: f64,
    _w3: f64,
    tokens: &[String],
    distances: &[f64],
) -> f64 {
    debug_assert_eq!(tokens.len(), distances.len());
    let raw = match tokens.len() {
        0 => 0.0,
        1 => unigram_term(fs, w1, &tokens[0], distances[0]),
        2 => {
            let head = unigram_term(fs, w1, &tokens[0], distances[0]);
            let p_bi = fs.bigram_prob(&tokens[0], &tokens[1]);
            let tail = if p_bi != 0.0 {
                term_without_weight(p_bi, distances[0] + distances[1])
            } else {
                term_without_weight(fs.unigram_prob(&tokens[1]), distances[1])
            };
            head + tail
        }
        3 => {
            let u_term = unigram_term(fs, w1, &tokens[0], distances[0]);
            let p_bi = fs.bigram_prob(&tokens[0], &tokens[1]);
            let bi_term = term_with_weight(p_bi, w2, distances[0] + distances[1]);
            let p_tri = fs.trigram_prob(&tokens[0], &tokens[1], &tokens[2]);
            let tail = if p_tri != 0.0 {
                term_without_weight(p_tri, distances[0] + distances[1] + distances[2])
            } else {
                let p_bi23 = fs.bigram_prob(&tokens[1], &tokens[2]);
                term_without_weight(p_bi23, distances[1] + distances[2])
            };
            u_term + bi_term + tail
        }
        n => {
            let head = score_sequence(fs, w1, w2, _w3, &tokens[..3], &distances[..3]);
            let tail: f64 = (3..n)
                .map(|i| unigram_term(fs, w1, &tokens[i], distances[i]))
                .sum();
            head + tail
        }
    };
    if raw == 0.0 {
        f64::NEG_INFINITY
    } else {
        raw
    }
}

/// Fixed-size, descending-score ranking with binary-search insertion.
pub struct TopKBuffer {
    capacity: usize,
    items: Vec<ScoredCandidate>,
}

impl TopKBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, candidate: ScoredCandidate) {
        if self.items.len() == self.capacity
            && candidate.score <= self.items[self.items.len() - 1].score
        {
            return;
        }
        let pos = self.items.partition_point(|c| c.score >= candidate.score);
        self.items.insert(pos, candidate);
        self.items.truncate(self.capacity);
    }

    pub fn into_vec(self) -> Vec<ScoredCandidate> {
        self.items
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.items.first()
    }
}

fn stable_hash(tokens: &[String]) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    tokens.hash(&mut hasher);
    hasher.finish()
}

/// Enumerates the Cartesian product of per-token candidates, scores every
/// distinct sequence, and returns up to `K_out` results in descending score.
pub fn enumerate_and_score(
    fs: &FrequencyStore,
    per_token: &[Vec<TokenCandidate>],
    weights: (f64, f64, f64),
    k_out: usize,
) -> Vec<ScoredCandidate> {
    if per_token.is_empty() {
        return Vec::new();
    }

    let mut buffer = TopKBuffer::new(k_out);
    let mut seen = HashSet::new();

    let mut indices = vec![0usize; per_token.len()];
    loop {
        let tokens: Vec<String> = indices
            .iter()
            .zip(per_token)
            .map(|(&i, cands)| cands[i].word.clone())
            .collect();
        let distances: Vec<f64> = indices
            .iter()
            .zip(per_token)
            .map(|(&i, cands)| cands[i].distance)
            .collect();

        if seen.insert(stable_hash(&tokens)) {
            let score = score_sequence(fs, weights.0, weights.1, weights.2, &tokens, &distances);
            buffer.insert(ScoredCandidate { tokens, score });
        }

        // Odometer-style increment over the index vector.
        let mut pos = indices.len();
        loop {
            if pos == 0 {
                return buffer.into_vec();
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < per_token[pos].len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}
