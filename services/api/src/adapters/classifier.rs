//! services/api/src/adapters/classifier.rs
//!
//! This module contains the adapter for the pre-trained emotion classification model.
//! It implements the `EmotionClassifier` port by calling a Hugging Face style
//! inference endpoint over HTTP.

use async_trait::async_trait;
use mood_journal_core::ports::{EmotionClassifier, LabelScore, PortError, PortResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `EmotionClassifier` against a text-classification endpoint.
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HuggingFaceClassifier {
    /// Creates a new `HuggingFaceClassifier` for `{base_url}/models/{model}`.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// The inference API nests results per input; a single input may also come back flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(scores) => scores,
        }
    }
}

/// Parses a raw inference response body into label scores.
pub fn parse_inference_body(body: &str) -> PortResult<Vec<LabelScore>> {
    let parsed: InferenceResponse = serde_json::from_str(body).map_err(|e| {
        PortError::Classification(format!("Malformed classifier response: {}", e))
    })?;
    Ok(parsed.into_scores())
}

//=========================================================================================
// `EmotionClassifier` Trait Implementation
//=========================================================================================

#[async_trait]
impl EmotionClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> PortResult<Vec<LabelScore>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "inputs": text, "parameters": { "top_k": null } }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!("Classifier request failed: {}", e);
            PortError::Classification(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Classification(e.to_string()))?;
        if !status.is_success() {
            error!(%status, "Classifier returned an error response");
            return Err(PortError::Classification(format!(
                "Classifier returned {}: {}",
                status, body
            )));
        }

        let scores = parse_inference_body(&body)?;
        debug!(labels = scores.len(), "Classifier responded");
        Ok(scores)
    }
}
