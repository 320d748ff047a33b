//! Model handles used by every analysis call.
//!
//! Two classifiers (sentiment and emotion) sit behind the [`TextClassifier`]
//! trait so the keyword models and remote inference endpoints are
//! interchangeable. The lexicon polarity scorer is always local.

pub mod keyword;
pub mod polarity;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ClassifierBackend, Config};
use crate::error::{AppError, AppResult};
use keyword::{KeywordEmotionClassifier, KeywordSentimentClassifier};
use polarity::PolarityScorer;
use remote::RemoteClassifier;

/// One label scored by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LabelScore {
    #[schema(example = "joy")]
    pub label: String,
    #[schema(example = 0.97)]
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// A text classification model.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Scores `text`, returning every label the model produced.
    async fn classify(&self, text: &str) -> AppResult<Vec<LabelScore>>;
}

/// Picks the highest scoring label. On equal scores the earlier label wins.
pub fn top_label(scores: Vec<LabelScore>) -> Option<LabelScore> {
    scores.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.score >= candidate.score => Some(current),
        _ => Some(candidate),
    })
}

/// The loaded models. Built once at startup and shared read-only.
pub struct ModelHandles {
    sentiment: Arc<dyn TextClassifier>,
    emotion: Arc<dyn TextClassifier>,
    polarity: PolarityScorer,
}

impl ModelHandles {
    pub fn new(sentiment: Arc<dyn TextClassifier>, emotion: Arc<dyn TextClassifier>) -> Self {
        Self {
            sentiment,
            emotion,
            polarity: PolarityScorer,
        }
    }

    /// Constructs the classifiers selected by the config.
    pub fn load(config: &Config) -> AppResult<Self> {
        let handles = match &config.backend {
            ClassifierBackend::Keyword => Self::new(
                Arc::new(KeywordSentimentClassifier),
                Arc::new(KeywordEmotionClassifier),
            ),
            ClassifierBackend::Remote {
                sentiment_url,
                emotion_url,
            } => Self::new(
                Arc::new(RemoteClassifier::new(
                    "sentiment",
                    sentiment_url,
                    config.classifier_timeout,
                )?),
                Arc::new(RemoteClassifier::new(
                    "emotion",
                    emotion_url,
                    config.classifier_timeout,
                )?),
            ),
        };

        tracing::info!(
            "🧠 Models loaded: sentiment={}, emotion={}",
            handles.sentiment.name(),
            handles.emotion.name()
        );
        Ok(handles)
    }

    pub fn backend_names(&self) -> (String, String) {
        (
            self.sentiment.name().to_string(),
            self.emotion.name().to_string(),
        )
    }

    pub async fn top_sentiment(&self, text: &str) -> AppResult<LabelScore> {
        top_checked(self.sentiment.as_ref(), text).await
    }

    pub async fn top_emotion(&self, text: &str) -> AppResult<LabelScore> {
        top_checked(self.emotion.as_ref(), text).await
    }

    pub fn polarity(&self, text: &str) -> f64 {
        self.polarity.score(text)
    }
}

async fn top_checked(classifier: &dyn TextClassifier, text: &str) -> AppResult<LabelScore> {
    let scores = classifier.classify(text).await?;

    if let Some(bad) = scores
        .iter()
        .find(|s| !s.score.is_finite() || !(0.0..=1.0).contains(&s.score))
    {
        return Err(AppError::classifier(
            classifier.name(),
            format!("score {} for '{}' is outside [0, 1]", bad.score, bad.label),
        ));
    }

    top_label(scores)
        .ok_or_else(|| AppError::classifier(classifier.name(), "returned no labels"))
}


#[cfg(test)]
mod tests {
    use super::testing::FixedClassifier;
    use super::*;

    #[test]
    fn test_top_label_highest_wins() {
        let top = top_label(vec![
            LabelScore::new("neutral", 0.2),
            LabelScore::new("joy", 0.7),
            LabelScore::new("anger", 0.1),
        ]);
        assert_eq!(top.unwrap().label, "joy");
    }

    #[test]
    fn test_top_label_tie_keeps_first() {
        let top = top_label(vec![LabelScore::new("fear", 0.5), LabelScore::new("sadness", 0.5)]);
        assert_eq!(top.unwrap().label, "fear");
        assert!(top_label(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        let handles = ModelHandles::new(
            Arc::new(FixedClassifier(vec![LabelScore::new("POSITIVE", 1.4)])),
            Arc::new(FixedClassifier(vec![LabelScore::new("joy", 0.9)])),
        );
        let err = handles.top_sentiment("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Classifier { .. }));
        assert!(handles.top_emotion("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_label_list_is_rejected() {
        let handles = ModelHandles::new(
            Arc::new(FixedClassifier(Vec::new())),
            Arc::new(FixedClassifier(vec![LabelScore::new("joy", f32::NAN)])),
        );
        assert!(handles.top_sentiment("hello").await.is_err());
        assert!(handles.top_emotion("hello").await.is_err());
    }

    #[test]
    fn test_load_keyword_backend() {
        let config = Config::from_lookup(|_| None).unwrap();
        let handles = ModelHandles::load(&config).unwrap();
        let (sentiment, emotion) = handles.backend_names();
        assert_eq!(sentiment, "keyword-sentiment");
        assert_eq!(emotion, "keyword-emotion");
    }
}
