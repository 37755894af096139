//! Engine configuration.
//!
//! Recognized keys, with their effects and defaults. Defaults match the
//! original `speller` program's `internal/config.setDefault`.

use serde::{Deserialize, Serialize};

use crate::error::CorrectorError;

/// Configuration recognized by [`crate::Corrector`].
///
/// `sentences_path` / `dict_path` are consumed by [`crate::Corrector::train`]
/// and are plain paths on disk; the crate does not know or care whether the
/// caller gzip-compressed them (both `train` helpers sniff the gzip magic
/// bytes and transparently decompress).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the training sentences corpus (one sentence per line).
    pub sentences_path: Option<String>,
    /// Path to the primary `word freq` frequency dictionary.
    pub dict_path: Option<String>,
    /// Unigram cutoff during training and dictionary load.
    pub min_word_freq: u32,
    /// Short/long token threshold.
    pub min_word_length: usize,
    /// Additive unigram bonus `w_1` in the scorer.
    pub unigram_weight: f64,
    /// Additive bigram bonus `w_2` in the scorer.
    pub bigram_weight: f64,
    /// n-gram mix weight `w_3` used for the trigram term.
    pub trigram_weight: f64,
    /// Per-rank penalty step added to suggestion edit distances.
    pub penalty_step: f64,
    /// Enables the optional online-learning ingest hook. The crate does not
    /// implement the learner; it only keeps the ingest point
    /// (`FrequencyStore::observe_batch`) callable when this is set.
    pub auto_train_mode: bool,
    /// Number of per-token suggestions kept before Cartesian enumeration.
    pub candidates_per_token: usize,
    /// Number of scored sequences retained by the top-K buffer.
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sentences_path: None,
            dict_path: None,
            min_word_freq: 5,
            min_word_length: 3,
            unigram_weight: 100.0,
            bigram_weight: 50.0,
            trigram_weight: 80.0,
            penalty_step: 1.0,
            auto_train_mode: false,
            candidates_per_token: 10,
            top_k: 10,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, CorrectorError> {
        let content = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)
            .map_err(|e| CorrectorError::ConfigInvalid(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), CorrectorError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CorrectorError::ConfigInvalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate numeric ranges, mirroring the original `setDefault`/`Validate` pair.
    pub fn validate(&self) -> Result<(), CorrectorError> {
        if self.min_word_length == 0 {
            return Err(CorrectorError::ConfigInvalid(
                "min_word_length must be non-zero".into(),
            ));
        }
        if self.unigram_weight <= 0.0 {
            return Err(CorrectorError::ConfigInvalid(
                "unigram_weight must be positive".into(),
            ));
        }
        if self.bigram_weight <= 0.0 {
            return Err(CorrectorError::ConfigInvalid(
                "bigram_weight must be positive".into(),
            ));
        }
        if self.trigram_weight <= 0.0 {
            return Err(CorrectorError::ConfigInvalid(
                "trigram_weight must be positive".into(),
            ));
        }
        if self.candidates_per_token == 0 || self.top_k == 0 {
            return Err(CorrectorError::ConfigInvalid(
                "candidates_per_token and top_k must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
