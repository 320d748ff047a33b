//! Per-post analysis: sentiment, emotion and polarity for one line of text,
//! and the batch form over a multi-line block.

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::ml::ModelHandles;

pub const BLANK_INPUT_WARNING: &str = "Please enter at least one post.";

/// Everything learned about one post. All fields come from the same text and
/// the same loaded models.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostRecord {
    #[schema(example = "I love this!")]
    pub text: String,
    #[schema(example = "POSITIVE")]
    pub sentiment_label: String,
    /// In [0, 1].
    #[schema(example = 0.99)]
    pub sentiment_confidence: f32,
    #[schema(example = "joy")]
    pub emotion_label: String,
    pub emotion_confidence: f32,
    /// In [-1, 1].
    #[schema(example = 0.58)]
    pub polarity: f64,
}

impl fmt::Display for PostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Post: {}", self.text)?;
        writeln!(
            f,
            "Sentiment: {} (Confidence: {:.2}) | Polarity: {:.2}",
            self.sentiment_label, self.sentiment_confidence, self.polarity
        )?;
        writeln!(f, "Emotion: {}", self.emotion_label)?;
        writeln!(f, "---")
    }
}

/// Result of analysing a block of posts.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub posts: Vec<PostRecord>,
    /// Set when the block had nothing to analyse.
    pub warning: Option<String>,
}

/// Analyses one post. `text` must be non-blank; callers check first.
pub async fn analyze(models: &ModelHandles, text: &str) -> AppResult<PostRecord> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("post text is blank".to_string()));
    }

    let sentiment = models.top_sentiment(text).await?;
    let emotion = models.top_emotion(text).await?;
    let polarity = models.polarity(text);

    tracing::debug!(
        "Analyzed post: sentiment={} ({:.2}) emotion={} polarity={:.2}",
        sentiment.label,
        sentiment.score,
        emotion.label,
        polarity
    );

    Ok(PostRecord {
        text: text.to_string(),
        sentiment_label: sentiment.label,
        sentiment_confidence: sentiment.score,
        emotion_label: emotion.label,
        emotion_confidence: emotion.score,
        polarity,
    })
}

/// Analyses each non-blank line of `input`, in order.
///
/// Blank lines are skipped silently. A block with no posts at all yields a
/// warning instead of records. The first failing post aborts the batch and no
/// records are returned.
pub async fn analyze_batch(models: &ModelHandles, input: &str) -> AppResult<BatchOutcome> {
    if input.trim().is_empty() {
        tracing::warn!("Analyze requested with blank input");
        return Ok(BatchOutcome {
            posts: Vec::new(),
            warning: Some(BLANK_INPUT_WARNING.to_string()),
        });
    }

    let mut posts = Vec::new();
    for (index, line) in input.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let record = analyze(models, line).await.map_err(|e| {
            tracing::warn!("Batch aborted at line {}: {}", index + 1, e);
            e
        })?;
        posts.push(record);
    }

    tracing::info!("📊 Analyzed {} posts", posts.len());
    Ok(BatchOutcome {
        posts,
        warning: None,
    })
}

/// Plain-text report of a batch, one block per post.
pub fn text_report(posts: &[PostRecord]) -> String {
    posts.iter().map(|p| p.to_string()).collect()
}
