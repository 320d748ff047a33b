//! Keyword-based classifiers.
//!
//! Lightweight offline stand-ins for the sentiment and emotion models. They
//! match lower-cased words against fixed word lists, so they need no model
//! files and no network.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::{LabelScore, TextClassifier};
use crate::error::AppResult;

// Common positive words for sentiment detection
static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "superb",
        "outstanding", "brilliant", "love", "loved", "loving", "best", "better",
        "positive", "happy", "joy", "joyful", "beautiful", "perfect", "awesome",
        "incredible", "delightful", "pleasant", "satisfied", "recommend", "impressive",
        "glad", "excited", "thrilled", "thanks", "thank", "nice", "cool", "fun",
        "win", "winning", "success", "proud", "enjoy", "enjoyed", "like", "liked",
        "helpful", "grateful", "congrats", "yay", "lol",
    ]
    .into_iter()
    .collect()
});

// Common negative words for sentiment detection
static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse", "hate",
        "hated", "dislike", "disappointing", "disappointed", "failure", "failed",
        "fail", "negative", "sad", "unhappy", "angry", "annoyed", "frustrated",
        "frustrating", "furious", "problem", "broken", "wrong", "useless", "waste",
        "scam", "fake", "slow", "expensive", "worthless", "garbage", "trash",
        "pathetic", "scared", "afraid", "worried", "upset", "miserable", "lonely",
        "sucks", "disgusting", "gross", "boring", "lost",
    ]
    .into_iter()
    .collect()
});

/// Emotion word lists, in label order. Earlier emotions win ties.
static EMOTION_WORDS: Lazy<Vec<(&'static str, HashSet<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            "anger",
            [
                "angry", "furious", "mad", "rage", "outraged", "annoyed", "irritated",
                "hate", "hated", "livid", "frustrated", "frustrating", "pissed", "infuriating",
            ]
            .into_iter()
            .collect(),
        ),
        (
            "disgust",
            [
                "disgusting", "disgusted", "gross", "nasty", "revolting", "sick", "vile",
                "yuck", "eww", "repulsive",
            ]
            .into_iter()
            .collect(),
        ),
        (
            "fear",
            [
                "afraid", "scared", "fear", "terrified", "worried", "anxious", "nervous",
                "panic", "frightened", "dread", "worry", "scary",
            ]
            .into_iter()
            .collect(),
        ),
        (
            "joy",
            [
                "happy", "love", "loved", "joy", "glad", "excited", "thrilled", "great",
                "awesome", "amazing", "wonderful", "fantastic", "delighted", "yay", "fun",
                "enjoy", "enjoyed", "proud", "grateful", "best",
            ]
            .into_iter()
            .collect(),
        ),
        (
            "sadness",
            [
                "sad", "unhappy", "depressed", "lonely", "miserable", "cry", "crying",
                "heartbroken", "down", "grief", "miss", "lost", "sorry", "hopeless",
            ]
            .into_iter()
            .collect(),
        ),
        (
            "surprise",
            [
                "surprised", "surprise", "wow", "shocked", "unexpected", "astonished",
                "unbelievable", "whoa", "omg", "suddenly",
            ]
            .into_iter()
            .collect(),
        ),
    ]
});

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Labels text POSITIVE, NEGATIVE or NEUTRAL from the ratio of positive to
/// negative keywords.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSentimentClassifier;

impl KeywordSentimentClassifier {
    pub fn score(&self, text: &str) -> LabelScore {
        let words = words(text);
        let positive_count = words.iter().filter(|w| POSITIVE_WORDS.contains(w.as_str())).count();
        let negative_count = words.iter().filter(|w| NEGATIVE_WORDS.contains(w.as_str())).count();

        let total_sentiment_words = positive_count + negative_count;
        if total_sentiment_words == 0 {
            return LabelScore::new("NEUTRAL", 0.5);
        }

        let positive_ratio = positive_count as f32 / total_sentiment_words as f32;
        let (label, score) = if positive_ratio > 0.6 {
            ("POSITIVE", positive_ratio)
        } else if positive_ratio < 0.4 {
            ("NEGATIVE", 1.0 - positive_ratio)
        } else {
            ("NEUTRAL", 0.5 + (positive_ratio - 0.5).abs())
        };

        tracing::debug!(
            "Keyword sentiment: {} words, {} positive, {} negative",
            words.len(),
            positive_count,
            negative_count
        );

        LabelScore::new(label, score)
    }
}

#[async_trait]
impl TextClassifier for KeywordSentimentClassifier {
    fn name(&self) -> &str {
        "keyword-sentiment"
    }

    async fn classify(&self, text: &str) -> AppResult<Vec<LabelScore>> {
        Ok(vec![self.score(text)])
    }
}

/// Scores each emotion by its share of the matched emotion keywords. Text
/// with no emotion keywords is `neutral`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEmotionClassifier;

impl KeywordEmotionClassifier {
    pub fn scores(&self, text: &str) -> Vec<LabelScore> {
        let words = words(text);
        let counts: Vec<(&str, usize)> = EMOTION_WORDS
            .iter()
            .map(|(label, set)| {
                (*label, words.iter().filter(|w| set.contains(w.as_str())).count())
            })
            .collect();

        let total: usize = counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return vec![LabelScore::new("neutral", 1.0)];
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| LabelScore::new(label, count as f32 / total as f32))
            .collect()
    }
}

#[async_trait]
impl TextClassifier for KeywordEmotionClassifier {
    fn name(&self) -> &str {
        "keyword-emotion"
    }

    async fn classify(&self, text: &str) -> AppResult<Vec<LabelScore>> {
        Ok(self.scores(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::top_label;

    fn top_emotion(text: &str) -> String {
        top_label(KeywordEmotionClassifier.scores(text)).unwrap().label
    }

    #[test]
    fn test_positive_sentiment() {
        let result = KeywordSentimentClassifier.score("This product is amazing and wonderful. I love it!");
        assert_eq!(result.label, "POSITIVE");
        assert!(result.score > 0.6 && result.score <= 1.0);
    }

    #[test]
    fn test_negative_sentiment() {
        let result = KeywordSentimentClassifier.score("This is terrible and horrible. I hate it.");
        assert_eq!(result.label, "NEGATIVE");
        assert!((result.score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_neutral_sentiment() {
        let result = KeywordSentimentClassifier.score("The item arrived on time.");
        assert_eq!(result.label, "NEUTRAL");
        assert!((result.score - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mixed_sentiment_is_neutral() {
        let result = KeywordSentimentClassifier.score("Great camera, terrible battery");
        assert_eq!(result.label, "NEUTRAL");
        assert!(result.score >= 0.5 && result.score <= 1.0);
    }

    #[test]
    fn test_emotions() {
        assert_eq!(top_emotion("I am furious about this!"), "anger");
        assert_eq!(top_emotion("I love this!"), "joy");
        assert_eq!(top_emotion("Feeling so sad and lonely tonight"), "sadness");
        assert_eq!(top_emotion("I'm scared of the exam tomorrow"), "fear");
        assert_eq!(top_emotion("Wow, I did not see that coming"), "surprise");
        assert_eq!(top_emotion("That smell is disgusting"), "disgust");
        assert_eq!(top_emotion("The meeting is at noon"), "neutral");
    }

    #[test]
    fn test_emotion_scores_sum_to_one() {
        let scores = KeywordEmotionClassifier.scores("happy but also worried and angry");
        let sum: f32 = scores.iter().map(|s| s.score).sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(scores.len(), 3);
    }
}
