//! Component C — unigram/bigram/trigram frequency store.
//!
//! Counts are kept in dense arrays indexed through a [`MinimalPerfectHash`]
//! per order, mirroring `examples/original_source/internal/spellcorrect/frequencies.go`
//! but replacing its `map[uint64]float64` + word-trie pair with the MPH
//! table this crate builds in [`crate::mph`]. Probabilities are derived on
//! demand, never stored.

use std::collections::HashMap;
use std::io::{BufRead, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::CorrectorError;
use crate::mph::MinimalPerfectHash;
use crate::tokenizer::tokenize;

const BIGRAM_SEP: &str = " ";

fn bigram_key(w1: &str, w2: &str) -> String {
    format!("{w1}{BIGRAM_SEP}{w2}")
}

fn trigram_key(w1: &str, w2: &str, w3: &str) -> String {
    format!("{w1}{BIGRAM_SEP}{w2}{BIGRAM_SEP}{w3}")
}

/// A single order's MPH table plus its parallel dense count array.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderTable {
    mph: MinimalPerfectHash,
    counts: Vec<i32>,
}

impl OrderTable {
    fn empty() -> Self {
        Self {
            mph: MinimalPerfectHash::build(Vec::new()),
            counts: Vec::new(),
        }
    }

    fn build(counts: HashMap<String, u32>) -> Self {
        let mut keys: Vec<String> = counts.keys().cloned().collect();
        keys.sort();
        let table_counts: Vec<i32> = keys.iter().map(|k| counts[k] as i32).collect();
        Self {
            mph: MinimalPerfectHash::build(keys),
            counts: table_counts,
        }
    }

    fn freq(&self, key: &str) -> u32 {
        let (idx, present) = self.mph.lookup(key);
        if present {
            self.counts[idx as usize].max(0) as u32
        } else {
            0
        }
    }

    /// Bumps `key`'s count by `delta`, growing the table if the key is new.
    /// Used only by the online-ingest stub; the correction hot path never
    /// calls this.
    fn bump(&mut self, key: &str, delta: i32) {
        let (idx, present) = self.mph.lookup(key);
        if present {
            self.counts[idx as usize] += delta;
            return;
        }
        let old_mph = std::mem::replace(&mut self.mph, MinimalPerfectHash::build(Vec::new()));
        let old_counts = std::mem::take(&mut self.counts);
        let mut keys: Vec<String> = old_mph.keys().to_vec();
        keys.push(key.to_string());
        let new_mph = MinimalPerfectHash::build(keys);
        let mut new_counts = vec![0i32; new_mph.len()];
        for (i, k) in new_mph.keys().iter().enumerate() {
            let (old_idx, old_present) = old_mph.lookup(k);
            if old_present {
                new_counts[i] = old_counts[old_idx as usize];
            }
        }
        self.mph = new_mph;
        self.counts = new_counts;
        let (idx, _) = self.mph.lookup(key);
        self.counts[idx as usize] += delta;
    }
}

#[derive(Serialize, Deserialize)]
struct Artifact {
    min_word_length: usize,
    min_word_freq: u32,
    total_token_count: u64,
    unigram: OrderTable,
    bigram: OrderTable,
    trigram: OrderTable,
}

/// Unigram/bigram/trigram counts trained from a sentences corpus.
pub struct FrequencyStore {
    min_word_length: usize,
    min_word_freq: u32,
    total_token_count: u64,
    unigram: OrderTable,
    bigram: OrderTable,
    trigram: OrderTable,
}

impl FrequencyStore {
    pub fn new(min_word_length: usize, min_word_freq: u32) -> Self {
        Self {
            min_word_length,
            min_word_freq,
            total_token_count: 0,
            unigram: OrderTable::empty(),
            bigram: OrderTable::empty(),
            trigram: OrderTable::empty(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.total_token_count > 0
    }

    /// Streams a sentences corpus (one sentence per line) and builds the
    /// three frequency tables. A no-op if the store is already populated.
    pub fn train<R: BufRead>(&mut self, reader: R) -> Result<(), CorrectorError> {
        if self.is_trained() {
            return Ok(());
        }

        let min_len = self.min_word_length;
        let lines: Vec<Vec<String>> = reader
            .lines()
            .map(|l| l.map(|s| tokenize(&s)))
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|tokens| {
                tokens
                    .into_iter()
                    .filter(|t| t.chars().count() >= min_len)
                    .collect()
            })
            .collect();

        let mut raw_unigram: HashMap<String, u32> = HashMap::new();
        let mut total: u64 = 0;
        for line in &lines {
            for tok in line {
                *raw_unigram.entry(tok.clone()).or_insert(0) += 1;
                total += 1;
            }
        }

        let min_freq = self.min_word_freq;
        let survives = |w: &str| raw_unigram.get(w).copied().unwrap_or(0) >= min_freq;

        let vocab_unigram: HashMap<String, u32> = raw_unigram
            .iter()
            .filter(|(w, _)| survives(w))
            .map(|(w, c)| (w.clone(), *c))
            .collect();

        let mut bigram_counts: HashMap<String, u32> = HashMap::new();
        let mut trigram_counts: HashMap<String, u32> = HashMap::new();
        for line in &lines {
            for w in line.windows(2) {
                if survives(&w[0]) && survives(&w[1]) {
                    *bigram_counts.entry(bigram_key(&w[0], &w[1])).or_insert(0) += 1;
                }
            }
            for w in line.windows(3) {
                if survives(&w[0]) && survives(&w[1]) && survives(&w[2]) {
                    *trigram_counts
                        .entry(trigram_key(&w[0], &w[1], &w[2]))
                        .or_insert(0) += 1;
                }
            }
        }

        self.unigram = OrderTable::build(vocab_unigram);
        self.bigram = OrderTable::build(bigram_counts);
        self.trigram = OrderTable::build(trigram_counts);
        self.total_token_count = total;

        tracing::info!(
            total_tokens = total,
            unigrams = self.unigram.mph.len(),
            bigrams = self.bigram.mph.len(),
            trigrams = self.trigram.mph.len(),
            "frequency store trained"
        );

        Ok(())
    }

    /// Online-ingest hook: folds an already-tokenized batch of sentences
    /// into the live counts without a full retrain. Narrow surface for an
    /// external learning worker; this crate does not implement the worker.
    pub fn observe_batch(&mut self, sentences: &[Vec<String>]) {
        for line in sentences {
            let filtered: Vec<&String> = line
                .iter()
                .filter(|t| t.chars().count() >= self.min_word_length)
                .collect();
            for t in &filtered {
                self.unigram.bump(t, 1);
                self.total_token_count += 1;
            }
            for w in filtered.windows(2) {
                self.bigram.bump(&bigram_key(w[0], w[1]), 1);
            }
            for w in filtered.windows(3) {
                self.trigram.bump(&trigram_key(w[0], w[1], w[2]), 1);
            }
        }
    }

    pub fn total_token_count(&self) -> u64 {
        self.total_token_count
    }

    pub fn unigram_freq(&self, w: &str) -> u32 {
        self.unigram.freq(w)
    }

    pub fn bigram_freq(&self, w1: &str, w2: &str) -> u32 {
        self.bigram.freq(&bigram_key(w1, w2))
    }

    pub fn trigram_freq(&self, w1: &str, w2: &str, w3: &str) -> u32 {
        self.trigram.freq(&trigram_key(w1, w2, w3))
    }

    pub fn unigram_prob(&self, w: &str) -> f64 {
        if self.total_token_count == 0 {
            return 0.0;
        }
        self.unigram_freq(w) as f64 / self.total_token_count as f64
    }

    pub fn bigram_prob(&self, w1: &str, w2: &str) -> f64 {
        let denom = self.unigram_freq(w1);
        if denom == 0 {
            return 0.0;
        }
        self.bigram_freq(w1, w2) as f64 / denom as f64
    }

    pub fn trigram_prob(&self, w1: &str, w2: &str, w3: &str) -> f64 {
        let denom = self.bigram_freq(w1, w2);
        if denom == 0 {
            return 0.0;
        }
        self.trigram_freq(w1, w2, w3) as f64 / denom as f64
    }

    pub fn unigram_logprob(&self, w: &str) -> f64 {
        let p = self.unigram_prob(w);
        if p == 0.0 {
            f64::NEG_INFINITY
        } else {
            p.ln()
        }
    }

    pub fn bigram_logprob(&self, w1: &str, w2: &str) -> f64 {
        let p = self.bigram_prob(w1, w2);
        if p == 0.0 {
            f64::NEG_INFINITY
        } else {
            p.ln()
        }
    }

    pub fn trigram_logprob(&self, w1: &str, w2: &str, w3: &str) -> f64 {
        let p = self.trigram_prob(w1, w2, w3);
        if p == 0.0 {
            f64::NEG_INFINITY
        } else {
            p.ln()
        }
    }

    /// Serializes the store as a single gzip-compressed bincode stream.
    pub fn save<W: Write>(&self, sink: W) -> Result<(), CorrectorError> {
        let artifact = Artifact {
            min_word_length: self.min_word_length,
            min_word_freq: self.min_word_freq,
            total_token_count: self.total_token_count,
            unigram: self.unigram.clone(),
            bigram: self.bigram.clone(),
            trigram: self.trigram.clone(),
        };
        let mut encoder = GzEncoder::new(sink, Compression::default());
        bincode::serialize_into(&mut encoder, &artifact)?;
        encoder.finish()?;
        Ok(())
    }

    /// Loads a store previously produced by [`FrequencyStore::save`].
    pub fn load<R: Read>(source: R) -> Result<Self, CorrectorError> {
        let mut decoder = GzDecoder::new(source);
        let mut bytes = Vec::new();
        decoder.read_to_end(&mut bytes)?;
        let artifact: Artifact = bincode::deserialize(&bytes)
            .map_err(|e| CorrectorError::CorruptArtifact(e.to_string()))?;

        if artifact.unigram.mph.len() != artifact.unigram.counts.len()
            || artifact.bigram.mph.len() != artifact.bigram.counts.len()
            || artifact.trigram.mph.len() != artifact.trigram.counts.len()
        {
            return Err(CorrectorError::CorruptArtifact(
                "mph/count length mismatch".into(),
            ));
        }

        tracing::info!(
            total_tokens = artifact.total_token_count,
            "frequency store loaded"
        );

        Ok(Self {
            min_word_length: artifact.min_word_length,
            min_word_freq: artifact.min_word_freq,
            total_token_count: artifact.total_token_count,
            unigram: artifact.unigram,
            bigram: artifact.bigram,
            trigram: artifact.trigram,
        })
    }
}
