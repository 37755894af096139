//! Literal I/O scenarios exercised end to end through the public API rather
//! than internal modules.

use speller_core::FrequencyStore;
use std::io::Cursor;

#[test]
fn tiny_corpus_probabilities_match_spec_bounds() {
    let mut store = FrequencyStore::new(0, 0);
    store
        .train(Cursor::new("I program go I code and I cook code"))
        .unwrap();

    let p_i = store.unigram_prob("i");
    assert!((0.30..=0.34).contains(&p_i), "unigram_prob(i) = {p_i}");

    let p_i_code = store.bigram_prob("i", "code");
    assert!(
        (0.30..=0.34).contains(&p_i_code),
        "bigram_prob(i, code) = {p_i_code}"
    );

    let p_i_program_go = store.trigram_prob("i", "program", "go");
    assert!(
        (0.99..=1.00).contains(&p_i_program_go),
        "trigram_prob(i, program, go) = {p_i_program_go}"
    );
}

#[test]
fn unigram_probabilities_sum_to_one_over_trained_vocabulary() {
    let mut store = FrequencyStore::new(0, 0);
    store
        .train(Cursor::new("a b c a b a d e f g a b c"))
        .unwrap();
    let vocab = ["a", "b", "c", "d", "e", "f", "g"];
    let total: f64 = vocab.iter().map(|w| store.unigram_prob(w)).sum();
    assert!((total - 1.0).abs() < 1e-9, "sum = {total}");
}

#[test]
fn min_freq_blacklist_leaves_its_share_out_of_the_probability_mass() {
    // "rare" still counts toward total_token_count (mirroring the original
    // `totalWords` counter, which runs over every token before the MinFreq
    // filter is applied) but is excluded from the unigram table itself, so
    // the surviving vocabulary's probabilities fall short of summing to 1.
    let mut store = FrequencyStore::new(0, 2);
    store.train(Cursor::new("a b a b rare")).unwrap();
    let total = store.unigram_prob("a") + store.unigram_prob("b");
    assert!((total - 0.8).abs() < 1e-9, "sum = {total}");
    assert_eq!(store.unigram_freq("rare"), 0);
}
