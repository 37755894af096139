//! Component A — tokenizer.
//!
//! Stateless and deterministic: lowercase, split on whitespace runs, strip
//! trailing runes that are neither letters nor digits, drop empties.

/// Split `input` into lowercase tokens.
///
/// Mirrors the original `speller` tokenizer (`strings.Fields` + lowercase +
/// `TrimRightFunc(!IsLetter && !IsNumber)`), generalized to full Unicode via
/// `char::is_alphanumeric`.
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .filter_map(|word| {
            let lowered: String = word.chars().flat_map(|c| c.to_lowercase()).collect();
            let trimmed = lowered.trim_end_matches(|c: char| !c.is_alphanumeric());
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
