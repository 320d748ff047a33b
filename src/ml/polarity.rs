//! Lexicon polarity scorer.
//!
//! Produces a scalar in [-1, 1] from a word-polarity lexicon, independent of
//! the classifiers:
//! 1. Look up each word's polarity
//! 2. Scale by any intensifiers directly before it
//! 3. Flip and halve it when a negation appeared within the last few words
//! 4. Average the scored words, boost for trailing exclamation marks, clamp

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").unwrap());

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    vec![
        // Positive
        ("love", 0.5),
        ("loved", 0.7),
        ("lovely", 0.5),
        ("like", 0.2),
        ("good", 0.7),
        ("great", 0.8),
        ("excellent", 1.0),
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("wonderful", 1.0),
        ("fantastic", 0.4),
        ("perfect", 1.0),
        ("best", 1.0),
        ("better", 0.5),
        ("happy", 0.8),
        ("glad", 0.5),
        ("nice", 0.6),
        ("beautiful", 0.85),
        ("fun", 0.3),
        ("cool", 0.35),
        ("enjoy", 0.4),
        ("excited", 0.4),
        ("thrilled", 0.6),
        ("proud", 0.8),
        ("grateful", 0.5),
        ("delightful", 1.0),
        ("pleasant", 0.73),
        ("helpful", 0.5),
        ("interesting", 0.5),
        ("funny", 0.25),
        ("win", 0.8),
        ("success", 0.3),
        // Negative
        ("bad", -0.7),
        ("worse", -0.4),
        ("worst", -1.0),
        ("terrible", -1.0),
        ("awful", -1.0),
        ("horrible", -1.0),
        ("poor", -0.4),
        ("hate", -0.8),
        ("hated", -0.9),
        ("angry", -0.5),
        ("furious", -0.5),
        ("mad", -0.625),
        ("sad", -0.5),
        ("unhappy", -0.6),
        ("miserable", -1.0),
        ("lonely", -0.5),
        ("scared", -0.4),
        ("afraid", -0.6),
        ("worried", -0.3),
        ("boring", -1.0),
        ("annoying", -0.8),
        ("annoyed", -0.4),
        ("frustrated", -0.7),
        ("disappointed", -0.75),
        ("disappointing", -0.6),
        ("disgusting", -1.0),
        ("ugly", -0.7),
        ("stupid", -0.8),
        ("wrong", -0.5),
        ("broken", -0.4),
        ("useless", -0.5),
        ("slow", -0.3),
        ("fail", -0.5),
        ("failed", -0.5),
        ("sick", -0.7),
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    vec![
        ("very", 1.3),
        ("really", 1.2),
        ("so", 1.3),
        ("extremely", 1.5),
        ("super", 1.3),
        ("totally", 1.3),
        ("absolutely", 1.5),
        ("incredibly", 1.5),
        ("quite", 1.1),
        ("slightly", 0.5),
        ("somewhat", 0.7),
        ("kinda", 0.7),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "cannot",
        "can't", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
        "won't", "wouldn't", "shouldn't", "couldn't", "hardly", "barely",
    ]
    .into_iter()
    .collect()
});

/// How many tokens a negation reaches forward.
const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;
const EXCLAMATION_BOOST: f64 = 0.15;
const MAX_EXCLAMATIONS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct PolarityScorer;

impl PolarityScorer {
    /// Polarity of `text` in [-1, 1]. Text without lexicon words scores 0.0.
    pub fn score(&self, text: &str) -> f64 {
        // Pasted posts often carry typographic apostrophes ("don’t").
        let lowercase_text = text
            .to_lowercase()
            .replace('\u{2019}', "'")
            .replace('\u{2018}', "'");
        let mut scores: Vec<f64> = Vec::new();
        let mut intensity = 1.0;
        let mut negation_left = 0usize;

        for token in TOKEN.find_iter(&lowercase_text).map(|m| m.as_str()) {
            if NEGATIONS.contains(token) {
                negation_left = NEGATION_WINDOW;
                continue;
            }

            if let Some(mult) = INTENSIFIERS.get(token) {
                intensity *= mult;
                continue;
            }

            if let Some(polarity) = LEXICON.get(token) {
                let mut score = polarity * intensity;
                if negation_left > 0 {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score);
                negation_left = 0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            intensity = 1.0;
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let exclamations = text
            .trim_end()
            .chars()
            .rev()
            .take_while(|c| *c == '!')
            .count()
            .min(MAX_EXCLAMATIONS);
        let boosted = mean * (1.0 + EXCLAMATION_BOOST * exclamations as f64);

        boosted.clamp(-1.0, 1.0)
    }
}
