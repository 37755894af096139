//! Component E — fuzzy, frequency-weighted dictionary.
//!
//! A char-trie node shape (`children`, terminal payload) extended with a
//! per-terminal map of named sub-dictionaries to frequencies, so one trie
//! backs every `(default, shortWords, …)` slice at once instead of
//! duplicating nodes per sub-dictionary.

use std::collections::HashMap;

use crate::edit_distance::{self, OVER_BUDGET};

pub const DEFAULT_DICTIONARY: &str = "default";
pub const SHORT_WORDS_DICTIONARY: &str = "shortWords";

const DEFAULT_PREFIX_LENGTH: usize = 7;
const DEFAULT_MAX_EDIT_DISTANCE: f64 = 2.0;

/// One ranked suggestion returned from a fuzzy lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub word: String,
    pub edit_distance: f64,
    pub frequency: u64,
    pub dictionary: String,
}

/// How many matches [`FuzzyDictionary::lookup`] should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// At most one suggestion: lowest distance, ties broken by frequency.
    Best,
    /// Every suggestion at the minimum observed distance.
    Closest,
    /// Every suggestion within the distance cap.
    All,
}

/// A pluggable distance function: `(query, candidate, max_distance) -> cost`.
pub type DistanceFn = fn(&str, &str, f64) -> f64;

#[derive(Clone)]
pub struct LookupOptions<'a> {
    pub max_edit_distance: f64,
    pub level: Level,
    pub distance_fn: DistanceFn,
    pub dictionary: Option<&'a str>,
}

impl<'a> Default for LookupOptions<'a> {
    fn default() -> Self {
        Self {
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            level: Level::All,
            distance_fn: edit_distance::weighted_distance,
            dictionary: None,
        }
    }
}

#[derive(Debug, Default)]
struct DictNode {
    children: HashMap<char, Box<DictNode>>,
    /// Sub-dictionary name -> frequency. Empty means this node is not a
    /// terminal for any sub-dictionary.
    frequencies: HashMap<String, u64>,
}

impl DictNode {
    fn new() -> Self {
        Self::default()
    }
}

/// Frequency-weighted dictionary of words, partitioned into named
/// sub-dictionaries, supporting bounded fuzzy lookup.
pub struct FuzzyDictionary {
    root: DictNode,
    max_word_length: usize,
}

impl FuzzyDictionary {
    pub fn new() -> Self {
        Self {
            root: DictNode::new(),
            max_word_length: 0,
        }
    }

    /// Inserts or overwrites `word`'s frequency within `dict_name`.
    pub fn add_entry(&mut self, word: &str, frequency: u64, dict_name: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node
                .children
                .entry(ch)
                .or_insert_with(|| Box::new(DictNode::new()));
        }
        node.frequencies.insert(dict_name.to_string(), frequency);
        self.max_word_length = self.max_word_length.max(word.chars().count());
    }

    /// Removes `word` from `dict_name`. Returns whether it existed.
    pub fn remove_entry(&mut self, word: &str, dict_name: &str) -> bool {
        let mut node = &mut self.root;
        for ch in word.chars() {
            match node.children.get_mut(&ch) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.frequencies.remove(dict_name).is_some()
    }

    /// Online-ingest hook: adjusts `word`'s frequency within `dict_name` by
    /// `delta`, clamped at 0. A no-op if the entry does not exist.
    pub fn bump_frequency(&mut self, word: &str, dict_name: &str, delta: i64) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            match node.children.get_mut(&ch) {
                Some(child) => node = child,
                None => return,
            }
        }
        if let Some(freq) = node.frequencies.get_mut(dict_name) {
            let updated = *freq as i64 + delta;
            *freq = updated.max(0) as u64;
        }
    }

    /// Lower bound on edit distance from comparing the first
    /// `DEFAULT_PREFIX_LENGTH` runes of `query` and a partial candidate
    /// prefix position by position: each mismatch contributes at least the
    /// cheapest possible substitution weight. Monotonically non-decreasing
    /// as `prefix` grows, so a subtree can be abandoned the moment this
    /// exceeds the budget without ever producing a false reject — it only
    /// ever underestimates the true cost.
    fn prefix_lower_bound(query: &[char], prefix: &[char]) -> f64 {
        const CHEAPEST_SUBSTITUTION: f64 = 0.4;
        let n = query.len().min(prefix.len()).min(DEFAULT_PREFIX_LENGTH);
        let mismatches = (0..n).filter(|&i| query[i] != prefix[i]).count();
        mismatches as f64 * CHEAPEST_SUBSTITUTION
    }

    /// Recursive trie descent: extends `prefix` one rune at a time, checking
    /// each node as a possible terminal and pruning the whole subtree under
    /// it as soon as `prefix`'s partial lower bound exceeds the budget or its
    /// length already exceeds `max_len` — no dictionary entry is ever
    /// materialized unless its node lies on a surviving path.
    #[allow(clippy::too_many_arguments)]
    fn search_node(
        &self,
        node: &DictNode,
        prefix: &mut Vec<char>,
        query: &[char],
        word: &str,
        min_len: usize,
        max_len: usize,
        dict_name: &str,
        opts: &LookupOptions,
        out: &mut Vec<Suggestion>,
    ) {
        if !node.frequencies.is_empty() {
            if let Some(&frequency) = node.frequencies.get(dict_name) {
                let len = prefix.len();
                if len >= min_len && len <= max_len {
                    let candidate: String = prefix.iter().collect();
                    let distance = (opts.distance_fn)(word, &candidate, opts.max_edit_distance);
                    if distance != OVER_BUDGET && distance <= opts.max_edit_distance {
                        out.push(Suggestion {
                            word: candidate,
                            edit_distance: distance,
                            frequency,
                            dictionary: dict_name.to_string(),
                        });
                    }
                }
            }
        }

        if prefix.len() >= max_len {
            return;
        }
        if Self::prefix_lower_bound(query, prefix) > opts.max_edit_distance {
            return;
        }

        for (ch, child) in &node.children {
            prefix.push(*ch);
            self.search_node(child, prefix, query, word, min_len, max_len, dict_name, opts, out);
            prefix.pop();
        }
    }

    /// Bounded fuzzy lookup against a single sub-dictionary (`default` if
    /// `opts.dictionary` is absent). Walks the trie directly rather than
    /// materializing every stored word: a subtree is abandoned as soon as
    /// its accumulated prefix already exceeds the distance budget or the
    /// candidate length bound, so per-call work stays proportional to the
    /// surviving candidates, not the whole dictionary.
    pub fn lookup(&self, word: &str, opts: &LookupOptions) -> Vec<Suggestion> {
        let dict_name = opts.dictionary.unwrap_or(DEFAULT_DICTIONARY);
        let query: Vec<char> = word.chars().collect();

        // Length-bound pruning: no entry longer than max_word_length + cap
        // (or shorter than query.len() - cap) can satisfy the budget.
        let cap = opts.max_edit_distance.ceil() as usize;
        let min_len = query.len().saturating_sub(cap);
        let max_len = (query.len() + cap).min(self.max_word_length);

        let mut suggestions = Vec::new();
        let mut prefix = Vec::new();
        self.search_node(
            &self.root,
            &mut prefix,
            &query,
            word,
            min_len,
            max_len,
            dict_name,
            opts,
            &mut suggestions,
        );

        suggestions.sort_by(|a, b| {
            a.edit_distance
                .partial_cmp(&b.edit_distance)
                .unwrap()
                .then_with(|| b.frequency.cmp(&a.frequency))
        });

        match opts.level {
            Level::All => suggestions,
            Level::Best => suggestions.into_iter().take(1).collect(),
            Level::Closest => {
                if let Some(min_d) = suggestions.first().map(|s| s.edit_distance) {
                    suggestions
                        .into_iter()
                        .take_while(|s| s.edit_distance == min_d)
                        .collect()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Greedy longest-prefix segmentation of `s` into known words (any
    /// sub-dictionary). Not used by the correction hot path.
    pub fn segment(&self, s: &str) -> Vec<String> {
        let chars: Vec<char> = s.chars().collect();
        let mut out = Vec::new();
        let mut pos = 0usize;
        while pos < chars.len() {
            let mut node = &self.root;
            let mut best_end = None;
            let mut idx = pos;
            while idx < chars.len() {
                match node.children.get(&chars[idx]) {
                    Some(child) => {
                        node = child;
                        idx += 1;
                        if !node.frequencies.is_empty() {
                            best_end = Some(idx);
                        }
                    }
                    None => break,
                }
            }
            match best_end {
                Some(end) => {
                    out.push(chars[pos..end].iter().collect());
                    pos = end;
                }
                None => {
                    out.push(chars[pos].to_string());
                    pos += 1;
                }
            }
        }
        out
    }

    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }
}

impl Default for FuzzyDictionary {
    fn default() -> Self {
        Self::new()
    }
}
