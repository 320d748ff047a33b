//! Classifier backed by an HTTP inference endpoint (model sidecar or hosted
//! inference API).

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{LabelScore, TextClassifier};
use crate::error::{AppError, AppResult};

/// Response shapes emitted by common text-classification servers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Single(LabelScore),
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

impl ClassificationResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassificationResponse::Single(score) => vec![score],
            ClassificationResponse::Flat(scores) => scores,
            // One inner list per input; we only ever send one input.
            ClassificationResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        }
    }
}

pub struct RemoteClassifier {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(name: &str, url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client for '{}': {}", name, e)))?;

        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl TextClassifier for RemoteClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> AppResult<Vec<LabelScore>> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("⚠️ [ML] {} connection failed: {}. Is the model server running?", self.name, e);
                AppError::classifier(&self.name, format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("⚠️ [ML] {} request failed: {}", self.name, status);
            return Err(AppError::classifier(
                &self.name,
                format!("status {}: {}", status, body),
            ));
        }

        let parsed = response.json::<ClassificationResponse>().await.map_err(|e| {
            tracing::warn!("⚠️ [ML] {} parse error: {}", self.name, e);
            AppError::classifier(&self.name, format!("unreadable response: {}", e))
        })?;

        Ok(parsed.into_scores())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn classifier_for(server: &MockServer) -> RemoteClassifier {
        RemoteClassifier::new(
            "emotion",
            &format!("{}/ml/emotion", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_nested_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml/emotion"))
            .and(body_json(json!({ "inputs": "I am furious about this!" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
                { "label": "anger", "score": 0.91 },
                { "label": "neutral", "score": 0.05 }
            ]])))
            .mount(&mock_server)
            .await;

        let scores = classifier_for(&mock_server)
            .await
            .classify("I am furious about this!")
            .await
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], LabelScore::new("anger", 0.91));
    }

    #[tokio::test]
    async fn test_flat_and_single_responses() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml/emotion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "label": "joy", "score": 0.8 }
            ])))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ml/emotion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                { "label": "sadness", "score": 0.6 }
            )))
            .mount(&mock_server)
            .await;

        let classifier = classifier_for(&mock_server).await;
        assert_eq!(classifier.classify("yay").await.unwrap()[0].label, "joy");
        assert_eq!(classifier.classify("meh").await.unwrap()[0].label, "sadness");
    }

    #[tokio::test]
    async fn test_server_error_is_classifier_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml/emotion"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
            .mount(&mock_server)
            .await;

        let err = classifier_for(&mock_server).await.classify("hi").await.unwrap_err();
        match err {
            AppError::Classifier { model, message } => {
                assert_eq!(model, "emotion");
                assert!(message.contains("500"));
                assert!(message.contains("model exploded"));
            }
            other => panic!("Expected AppError::Classifier, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unexpected_body_is_classifier_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml/emotion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "category": "tech" })))
            .mount(&mock_server)
            .await;

        let result = classifier_for(&mock_server).await.classify("hi").await;
        assert!(matches!(result, Err(AppError::Classifier { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let classifier =
            RemoteClassifier::new("sentiment", "http://127.0.0.1:9/none", Duration::from_secs(1)).unwrap();
        assert!(classifier.classify("hello").await.is_err());
    }
}
