//! Component G — orchestrator and public engine API.
//!
//! Ties tokenizer, frequency store, fuzzy dictionary and candidate scorer
//! together: splits a query into short/long tokens, windows the long run
//! into overlapping trigrams, corrects each window, and stitches the result
//! back into a sentence.

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use crate::candidate::{enumerate_and_score, token_candidates};
use crate::config::Config;
use crate::dictionary::{FuzzyDictionary, Level, LookupOptions, DEFAULT_DICTIONARY, SHORT_WORDS_DICTIONARY};
use crate::error::CorrectorError;
use crate::frequency_store::FrequencyStore;
use crate::io_util::open_maybe_gzip;
use crate::tokenizer::tokenize;

/// The context-aware spelling correction engine.
///
/// Readiness: `correct`/`suggestions` never error (per the propagation
/// policy — internal failure modes degrade to "return the original
/// token/query"). Calling them before `train`/`load` is one such mode: the
/// engine degrades to returning the query unchanged rather than blocking or
/// raising `NotReady`. Use [`Corrector::is_ready`] if a caller wants to
/// distinguish that case explicitly.
pub struct Corrector {
    config: Config,
    frequency_store: FrequencyStore,
    dictionary: FuzzyDictionary,
    ready: bool,
}

impl Corrector {
    /// Builds an unready engine from `config`. Fails only on an invalid
    /// configuration — no I/O happens here.
    pub fn new(config: Config) -> Result<Self, CorrectorError> {
        config.validate()?;
        let frequency_store = FrequencyStore::new(config.min_word_length, config.min_word_freq);
        Ok(Self {
            config,
            frequency_store,
            dictionary: FuzzyDictionary::new(),
            ready: false,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Trains the frequency store and loads the fuzzy dictionary from the
    /// paths named in `config`. A no-op store-side if already trained (the
    /// store itself enforces that); the dictionary is always (re)loaded.
    pub fn train(&mut self) -> Result<(), CorrectorError> {
        if let Some(path) = self.config.sentences_path.clone() {
            let reader = open_maybe_gzip(&path)?;
            self.frequency_store.train(reader)?;
        }
        if let Some(path) = self.config.dict_path.clone() {
            self.dictionary = self.read_dictionary(&path)?;
        }
        self.ready = true;
        tracing::info!("corrector trained and ready");
        Ok(())
    }

    fn read_dictionary(&self, path: &str) -> Result<FuzzyDictionary, CorrectorError> {
        let reader = open_maybe_gzip(path)?;
        let mut dict = FuzzyDictionary::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            let mut parts = trimmed.split_whitespace();
            let (word, freq_str, extra) = (parts.next(), parts.next(), parts.next());
            let (word, freq_str) = match (word, freq_str, extra) {
                (Some(w), Some(f), None) => (w, f),
                _ => {
                    return Err(CorrectorError::InvalidDictEntry {
                        line: i + 1,
                        text: line,
                    })
                }
            };
            let freq: u64 = freq_str.parse().map_err(|_| CorrectorError::InvalidDictEntry {
                line: i + 1,
                text: line.clone(),
            })?;
            if freq < self.config.min_word_freq as u64 {
                continue;
            }
            let sub_dict = if word.chars().count() < self.config.min_word_length {
                SHORT_WORDS_DICTIONARY
            } else {
                DEFAULT_DICTIONARY
            };
            dict.add_entry(word, freq, sub_dict);
        }
        Ok(dict)
    }

    /// Serializes the frequency store — the only part of the model the
    /// artifact format covers. The fuzzy dictionary is always rebuilt from
    /// `dict_path` on `train`/`load`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CorrectorError> {
        let file = File::create(path)?;
        self.frequency_store.save(file)?;
        tracing::info!("model artifact saved");
        Ok(())
    }

    /// Loads a frequency store artifact and refreshes the dictionary from
    /// `config.dict_path`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CorrectorError> {
        let file = File::open(path)?;
        self.frequency_store = FrequencyStore::load(file)?;
        if let Some(dict_path) = self.config.dict_path.clone() {
            self.dictionary = self.read_dictionary(&dict_path)?;
        }
        self.ready = true;
        tracing::info!("model artifact loaded");
        Ok(())
    }

    /// The top-1 correction for `query`. Always returns a string; an empty
    /// query returns the empty string.
    pub fn correct(&self, query: &str) -> String {
        let alternatives = self.corrected_alternatives(query);
        alternatives.into_iter().next().unwrap_or_default()
    }

    /// Up to `top_k` alternative corrections for `query`, best first.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        self.corrected_alternatives(query)
    }

    fn corrected_alternatives(&self, query: &str) -> Vec<String> {
        if query.is_empty() || !self.ready {
            return vec![query.to_string()];
        }

        let tokens = tokenize(query);
        if tokens.is_empty() {
            return vec![String::new()];
        }

        let min_len = self.config.min_word_length;
        // (index in `tokens`, is_long)
        let mut long_positions = Vec::new();
        let mut short_results: Vec<(usize, String)> = Vec::new();
        let mut long_tokens = Vec::new();

        for (i, tok) in tokens.iter().enumerate() {
            if tok.chars().count() < min_len {
                short_results.push((i, self.correct_short_token(tok)));
            } else {
                long_positions.push(i);
                long_tokens.push(tok.clone());
            }
        }

        let long_alternatives = self.correct_long_tokens(&long_tokens);

        long_alternatives
            .into_iter()
            .map(|long_result| {
                let mut out = vec![String::new(); tokens.len()];
                for (pos, word) in &short_results {
                    out[*pos] = word.clone();
                }
                for (pos, word) in long_positions.iter().zip(long_result.iter()) {
                    out[*pos] = word.clone();
                }
                out.join(" ")
            })
            .collect()
    }

    fn correct_short_token(&self, token: &str) -> String {
        let opts = LookupOptions {
            max_edit_distance: 2.0,
            level: Level::Closest,
            dictionary: Some(SHORT_WORDS_DICTIONARY),
            ..Default::default()
        };
        self.dictionary
            .lookup(token, &opts)
            .into_iter()
            .next()
            .map(|s| s.word)
            .unwrap_or_else(|| token.to_string())
    }

    /// Returns up to `top_k` full-length alternative corrections for the
    /// long-token run, best first. Earlier windows are deterministic (their
    /// best candidate always wins, per the take-first stitch); only the
    /// final window's ranking varies across alternatives.
    fn correct_long_tokens(&self, long_tokens: &[String]) -> Vec<Vec<String>> {
        if long_tokens.is_empty() {
            return vec![Vec::new()];
        }

        // "Already known" means more than each token existing in isolation —
        // a pair of individually common words can still be a miscorrected
        // bigram (see the томат/дорожный scenario in the test module below).
        // The fast path only bypasses scoring when every adjacent pair in
        // the run is itself an attested bigram.
        let all_known = long_tokens
            .iter()
            .all(|t| self.frequency_store.unigram_freq(t) > 0)
            && long_tokens
                .windows(2)
                .all(|w| self.frequency_store.bigram_freq(&w[0], &w[1]) > 0);
        if all_known {
            return vec![long_tokens.to_vec()];
        }

        let windows = Self::trigram_windows(long_tokens);
        let weights = (
            self.config.unigram_weight,
            self.config.bigram_weight,
            self.config.trigram_weight,
        );

        let mut prefix = vec![String::new(); long_tokens.len()];
        let last = windows.len() - 1;
        for (i, window) in windows.iter().enumerate() {
            if i == last {
                continue;
            }
            let best = self.best_window_tokens(window, weights);
            prefix[i] = best
                .and_then(|w| w.into_iter().next())
                .unwrap_or_else(|| window[0].clone());
        }

        let final_window = &windows[last];
        let final_alternatives = self.ranked_window_tokens(final_window, weights);
        let final_alternatives = if final_alternatives.is_empty() {
            vec![final_window.clone()]
        } else {
            final_alternatives
        };

        final_alternatives
            .into_iter()
            .map(|tail| {
                let mut result = prefix.clone();
                for (k, tok) in tail.into_iter().enumerate() {
                    result[last + k] = tok;
                }
                result
            })
            .collect()
    }

    fn trigram_windows(long_tokens: &[String]) -> Vec<Vec<String>> {
        if long_tokens.len() < 3 {
            return vec![long_tokens.to_vec()];
        }
        (0..=long_tokens.len() - 3)
            .map(|i| long_tokens[i..i + 3].to_vec())
            .collect()
    }

    fn best_window_tokens(&self, window: &[String], weights: (f64, f64, f64)) -> Option<Vec<String>> {
        self.ranked_window_tokens(window, weights).into_iter().next()
    }

    fn ranked_window_tokens(&self, window: &[String], weights: (f64, f64, f64)) -> Vec<Vec<String>> {
        let per_token: Vec<_> = window
            .iter()
            .map(|t| {
                token_candidates(
                    t,
                    &self.dictionary,
                    self.config.penalty_step,
                    self.config.candidates_per_token,
                )
            })
            .collect();
        enumerate_and_score(&self.frequency_store, &per_token, weights, self.config.top_k)
            .into_iter()
            .map(|c| c.tokens)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn trained_corrector(corpus: &str, dict: &str) -> Corrector {
        let sentences_path = write_temp("speller_test_sentences.txt", corpus);
        let dict_path = write_temp("speller_test_dict.txt", dict);
        let config = Config {
            sentences_path: Some(sentences_path.to_string_lossy().into_owned()),
            dict_path: Some(dict_path.to_string_lossy().into_owned()),
            min_word_freq: 0,
            min_word_length: 0,
            ..Default::default()
        };
        let mut corrector = Corrector::new(config).unwrap();
        corrector.train().unwrap();
        corrector
    }

    #[test]
    fn empty_query_returns_empty_string() {
        let corrector = Corrector::new(Config::default()).unwrap();
        assert_eq!(corrector.correct(""), "");
    }

    #[test]
    fn unready_corrector_returns_query_unchanged() {
        let corrector = Corrector::new(Config::default()).unwrap();
        assert_eq!(corrector.correct("some query"), "some query");
        assert!(!corrector.is_ready());
    }

    #[test]
    fn bigram_disambiguates_shared_noisy_substring() {
        let corpus = "органайзер дорожный\nтомат дородный";
        let dict = "органайзер 100\nдорожный 100\nтомат 100\nдородный 100\n";
        let corrector = trained_corrector(corpus, dict);
        assert_eq!(corrector.correct("томат дорожный"), "томат дородный");
        assert_eq!(
            corrector.correct("органайзер дородный"),
            "органайзер дорожный"
        );
    }

    #[test]
    fn unknown_tokens_pass_through_when_model_is_empty() {
        let corrector = trained_corrector("golang rocks", "golang 100\nrocks 100\n");
        assert_eq!(corrector.correct("restaurant in bonn"), "restaurant in bonn");
    }

    #[test]
    fn correction_is_deterministic() {
        let corrector = trained_corrector(
            "органайзер дорожный\nтомат дородный",
            "органайзер 100\nдорожный 100\nтомат 100\nдородный 100\n",
        );
        let a = corrector.correct("томат дорожный");
        let b = corrector.correct("томат дорожный");
        assert_eq!(a, b);
    }

    #[test]
    fn save_and_load_roundtrip_preserves_corrections() {
        let sentences_path = write_temp(
            "speller_test_sentences_roundtrip.txt",
            "органайзер дорожный\nтомат дородный",
        );
        let dict_path = write_temp(
            "speller_test_dict_roundtrip.txt",
            "органайзер 100\nдорожный 100\nтомат 100\nдородный 100\n",
        );
        let config = Config {
            sentences_path: Some(sentences_path.to_string_lossy().into_owned()),
            dict_path: Some(dict_path.to_string_lossy().into_owned()),
            min_word_freq: 0,
            min_word_length: 0,
            ..Default::default()
        };
        let mut corrector = Corrector::new(config.clone()).unwrap();
        corrector.train().unwrap();
        let artifact_path = std::env::temp_dir().join("speller_test_artifact.bin");
        corrector.save(&artifact_path).unwrap();

        let mut reloaded = Corrector::new(config).unwrap();
        reloaded.load(&artifact_path).unwrap();
        assert_eq!(
            reloaded.correct("томат дорожный"),
            corrector.correct("томат дорожный")
        );
        std::fs::remove_file(&artifact_path).unwrap();
    }

    #[test]
    fn malformed_dictionary_line_reports_invalid_dict_entry() {
        let sentences_path = write_temp("speller_test_sentences_bad_dict.txt", "a b c");
        let dict_path = write_temp("speller_test_dict_bad.txt", "word\nother 5\n");
        let config = Config {
            sentences_path: Some(sentences_path.to_string_lossy().into_owned()),
            dict_path: Some(dict_path.to_string_lossy().into_owned()),
            min_word_freq: 0,
            min_word_length: 0,
            ..Default::default()
        };
        let mut corrector = Corrector::new(config).unwrap();
        let err = corrector.train().unwrap_err();
        assert!(matches!(
            err,
            CorrectorError::InvalidDictEntry { line: 1, .. }
        ));
    }

    #[test]
    fn non_numeric_frequency_reports_invalid_dict_entry() {
        let sentences_path = write_temp("speller_test_sentences_bad_freq.txt", "a b c");
        let dict_path = write_temp("speller_test_dict_bad_freq.txt", "word notanumber\n");
        let config = Config {
            sentences_path: Some(sentences_path.to_string_lossy().into_owned()),
            dict_path: Some(dict_path.to_string_lossy().into_owned()),
            min_word_freq: 0,
            min_word_length: 0,
            ..Default::default()
        };
        let mut corrector = Corrector::new(config).unwrap();
        let err = corrector.train().unwrap_err();
        assert!(matches!(err, CorrectorError::InvalidDictEntry { .. }));
    }
}
