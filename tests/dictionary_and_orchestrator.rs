//! Literal dictionary and orchestrator scenarios, driven through the
//! public crate API.

use speller_core::{Config, Corrector, FuzzyDictionary, Level, LookupOptions};
use std::io::Write;

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn single_typo_within_budget_returns_one_suggestion() {
    let mut dict = FuzzyDictionary::new();
    dict.add_entry("example", 1, "default");

    let within_budget = LookupOptions {
        max_edit_distance: 2.0,
        level: Level::All,
        ..Default::default()
    };
    let hits = dict.lookup("eample", &within_budget);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].word, "example");
    assert_eq!(hits[0].edit_distance, 1.0);

    let zero_budget = LookupOptions {
        max_edit_distance: 0.0,
        level: Level::All,
        ..Default::default()
    };
    assert!(dict.lookup("eample", &zero_budget).is_empty());
}

#[test]
fn unicode_entry_round_trips_through_fuzzy_lookup() {
    let mut dict = FuzzyDictionary::new();
    dict.add_entry("ex\u{1D400}mple", 1, "default");
    let opts = LookupOptions {
        level: Level::Best,
        ..Default::default()
    };
    let hits = dict.lookup("ex\u{1D400}mple", &opts);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].word, "ex\u{1D400}mple");
}

#[test]
fn bigram_context_disambiguates_a_shared_noisy_substring() {
    // дорожный/дородный differ by one transposed pair of letters; only the
    // bigram context (what precedes them) picks the right one.
    let sentences = write_temp(
        "speller_integration_sentences.txt",
        "органайзер дорожный\nтомат дородный",
    );
    let dict_path = write_temp(
        "speller_integration_dict.txt",
        "органайзер 100\nдорожный 100\nтомат 100\nдородный 100\n",
    );
    let config = Config {
        sentences_path: Some(sentences.to_string_lossy().into_owned()),
        dict_path: Some(dict_path.to_string_lossy().into_owned()),
        min_word_freq: 0,
        min_word_length: 0,
        ..Default::default()
    };
    let mut corrector = Corrector::new(config).unwrap();
    corrector.train().unwrap();

    assert_eq!(corrector.correct("томат дорожный"), "томат дородный");
    assert_eq!(
        corrector.correct("органайзер дородный"),
        "органайзер дорожный"
    );
}

#[test]
fn no_matching_model_tokens_keeps_the_query_unchanged() {
    let sentences = write_temp("speller_integration_sentences_2.txt", "golang rocks");
    let dict_path = write_temp("speller_integration_dict_2.txt", "golang 100\nrocks 100\n");
    let config = Config {
        sentences_path: Some(sentences.to_string_lossy().into_owned()),
        dict_path: Some(dict_path.to_string_lossy().into_owned()),
        min_word_freq: 0,
        min_word_length: 0,
        ..Default::default()
    };
    let mut corrector = Corrector::new(config).unwrap();
    corrector.train().unwrap();
    assert_eq!(corrector.correct("restaurant in bonn"), "restaurant in bonn");
}

#[test]
fn empty_query_returns_empty_string() {
    let corrector = Corrector::new(Config::default()).unwrap();
    assert_eq!(corrector.correct(""), "");
}

#[test]
fn suggestions_surface_includes_the_top_correction() {
    let sentences = write_temp(
        "speller_integration_sentences_3.txt",
        "органайзер дорожный\nтомат дородный",
    );
    let dict_path = write_temp(
        "speller_integration_dict_3.txt",
        "органайзер 100\nдорожный 100\nтомат 100\nдородный 100\n",
    );
    let config = Config {
        sentences_path: Some(sentences.to_string_lossy().into_owned()),
        dict_path: Some(dict_path.to_string_lossy().into_owned()),
        min_word_freq: 0,
        min_word_length: 0,
        ..Default::default()
    };
    let mut corrector = Corrector::new(config).unwrap();
    corrector.train().unwrap();

    let alts = corrector.suggestions("томат дорожный");
    assert!(!alts.is_empty());
    assert_eq!(alts[0], corrector.correct("томат дорожный"));
}
