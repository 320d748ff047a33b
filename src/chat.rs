//! Emotion-aware chat: per-session append-only transcripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;
use crate::ml::ModelHandles;
use crate::responder::select_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    fn now(speaker: Speaker, text: &str) -> Self {
        Self {
            speaker,
            text: text.to_string(),
            at: Utc::now(),
        }
    }
}

/// Ordered turn history of one session. Turns are only ever appended.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
}

impl ChatLog {
    pub fn record_exchange(&mut self, message: &str, reply: &str) {
        self.turns.push(ChatTurn::now(Speaker::User, message));
        self.turns.push(ChatTurn::now(Speaker::Assistant, reply));
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub emotion: String,
    pub reply: &'static str,
}

/// Detects the message's emotion and picks the matching reply.
/// Blank messages get no reply and no classifier call.
pub async fn reply_to(models: &ModelHandles, message: &str) -> AppResult<Option<ChatReply>> {
    if message.trim().is_empty() {
        return Ok(None);
    }

    let emotion = models.top_emotion(message).await?;
    let reply = select_response(&emotion.label);
    Ok(Some(ChatReply {
        emotion: emotion.label,
        reply,
    }))
}

#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub session_id: Uuid,
    pub reply: Option<ChatReply>,
    pub history: Vec<ChatTurn>,
}

/// Transcripts keyed by session id. Sessions never share a log and live until
/// the process exits.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, ChatLog>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one "Send". A missing session id starts a new session; an id
    /// the store has not seen yet is adopted as a new session. Blank messages
    /// and failed classifications leave the store untouched.
    pub async fn send(
        &self,
        models: &ModelHandles,
        session_id: Option<Uuid>,
        message: &str,
    ) -> AppResult<ChatExchange> {
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);

        // Classify before taking the lock so one slow model call does not
        // stall every other session.
        let reply = match reply_to(models, message).await? {
            Some(reply) => reply,
            None => {
                return Ok(ChatExchange {
                    session_id,
                    reply: None,
                    history: self.history(&session_id).await.unwrap_or_default(),
                })
            }
        };

        let mut sessions = self.sessions.write().await;
        let log = sessions.entry(session_id).or_insert_with(|| {
            tracing::info!("💬 New chat session {}", session_id);
            ChatLog::default()
        });
        log.record_exchange(message, reply.reply);
        tracing::debug!(
            "Session {} emotion={} turns={}",
            session_id,
            reply.emotion,
            log.turns().len()
        );

        Ok(ChatExchange {
            session_id,
            history: log.turns().to_vec(),
            reply: Some(reply),
        })
    }

    pub async fn history(&self, session_id: &Uuid) -> Option<Vec<ChatTurn>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|log| log.turns().to_vec())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::keyword::KeywordSentimentClassifier;
    use crate::ml::testing::{keyword_handles, FailingOn, FixedClassifier};
    use crate::ml::LabelScore;
    use crate::responder::{ANGER_REPLY, FALLBACK_REPLY};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_anger_message_appends_two_turns() {
        let models = keyword_handles();
        let store = SessionStore::new();

        let exchange = store.send(&models, None, "I am furious about this!").await.unwrap();
        let reply = exchange.reply.unwrap();
        assert_eq!(reply.emotion, "anger");
        assert_eq!(reply.reply, ANGER_REPLY);

        assert_eq!(exchange.history.len(), 2);
        assert_eq!(exchange.history[0].speaker, Speaker::User);
        assert_eq!(exchange.history[0].text, "I am furious about this!");
        assert_eq!(exchange.history[1].speaker, Speaker::Assistant);
        assert_eq!(exchange.history[1].text, ANGER_REPLY);
    }

    #[tokio::test]
    async fn test_turns_append_to_existing_log() {
        let models = keyword_handles();
        let store = SessionStore::new();

        let first = store.send(&models, None, "I love this!").await.unwrap();
        let second = store
            .send(&models, Some(first.session_id), "I am furious about this!")
            .await
            .unwrap();

        assert_eq!(second.session_id, first.session_id);
        assert_eq!(second.history.len(), 4);
        assert_eq!(second.history[..2], first.history[..]);
        assert_eq!(second.history[2].text, "I am furious about this!");
        assert_eq!(second.history[3].text, ANGER_REPLY);
    }

    #[tokio::test]
    async fn test_surprise_gets_fallback() {
        let models = ModelHandles::new(
            Arc::new(KeywordSentimentClassifier),
            Arc::new(FixedClassifier(vec![
                LabelScore::new("surprise", 0.88),
                LabelScore::new("joy", 0.1),
            ])),
        );
        let store = SessionStore::new();
        let exchange = store.send(&models, None, "Wow, really?").await.unwrap();
        assert_eq!(exchange.reply.unwrap().reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_blank_message_is_noop() {
        let models = keyword_handles();
        let store = SessionStore::new();
        let first = store.send(&models, None, "I love this!").await.unwrap();

        let exchange = store.send(&models, Some(first.session_id), "   ").await.unwrap();
        assert!(exchange.reply.is_none());
        assert_eq!(exchange.history.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_messages_create_no_sessions() {
        let models = keyword_handles();
        let store = SessionStore::new();

        for _ in 0..100 {
            let exchange = store.send(&models, None, "   ").await.unwrap();
            assert!(exchange.reply.is_none());
            assert!(exchange.history.is_empty());
        }
        let unseen = Uuid::new_v4();
        store.send(&models, Some(unseen), "\t\n").await.unwrap();

        assert_eq!(store.session_count().await, 0);
        assert!(store.history(&unseen).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let models = keyword_handles();
        let store = SessionStore::new();

        let a = store.send(&models, None, "I love this!").await.unwrap();
        let b = store.send(&models, None, "so sad today").await.unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(store.history(&a.session_id).await.unwrap().len(), 2);
        assert_eq!(store.history(&b.session_id).await.unwrap().len(), 2);
        assert_eq!(store.session_count().await, 2);
        assert!(store.history(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_classification_appends_nothing() {
        let models = ModelHandles::new(Arc::new(KeywordSentimentClassifier), Arc::new(FailingOn("boom")));
        let store = SessionStore::new();
        let first = store.send(&models, None, "I love this!").await.unwrap();

        assert!(store.send(&models, Some(first.session_id), "boom").await.is_err());
        assert_eq!(store.history(&first.session_id).await.unwrap().len(), 2);
    }
}
