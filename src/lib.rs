//! speller-core
//!
//! A context-aware spelling corrector for short, noisy product-search
//! queries in Cyrillic and Latin script. Combines a minimal-perfect-hash
//! indexed n-gram frequency model with a fuzzy dictionary lookup over a
//! weighted, keyboard-adjacency-biased edit distance to disambiguate
//! between candidate corrections using their surrounding context, not just
//! per-token similarity.
//!
//! Public API:
//! - [`Corrector`] - trains, persists, and serves corrections end to end
//! - [`Config`] - tunable weights and thresholds, loadable from TOML
//! - [`FrequencyStore`] - unigram/bigram/trigram counts behind an MPH index
//! - [`FuzzyDictionary`] - bounded edit-distance lookup over known words
//! - [`CorrectorError`] - error type for training, persistence and config

pub mod candidate;
pub mod config;
pub mod corrector;
pub mod dictionary;
pub mod edit_distance;
pub mod error;
pub mod frequency_store;
pub mod io_util;
pub mod mph;
pub mod tokenizer;

pub use config::Config;
pub use corrector::Corrector;
pub use dictionary::{FuzzyDictionary, Level, LookupOptions, Suggestion};
pub use edit_distance::weighted_distance;
pub use error::{CorrectorError, Result};
pub use frequency_store::FrequencyStore;
pub use mph::MinimalPerfectHash;
