use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::{AiError, Result};
use crate::schema::ToolSchema;
use crate::wire::*;

/// Per-request ceiling. Scoring calls are short; the generous ceiling covers
/// slow upstream queueing without letting a worker hang forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for an OpenAI-compatible chat-completions API.
///
/// Structured results go through a forced tool call: the request pins
/// `tool_choice` to a single function whose parameters are the schema of the
/// expected Rust type, so a well-formed reply deserializes directly and
/// anything else is an [`AiError`], not a parse job.
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl AiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction");
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            embedding_model: String::new(),
        }
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| AiError::Connection(e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// One structured scoring call. No retries here: retry policy belongs to
    /// the caller, which knows what a safe default looks like.
    pub async fn tool_call<T: ToolSchema>(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<T> {
        let request = ToolCallRequest {
            model: self.model.clone(),
            messages: vec![
                WireMessage::system(system_prompt),
                WireMessage::user(user_text),
            ],
            tools: vec![ToolSpec {
                kind: "function",
                function: FunctionSpec {
                    name: T::tool_name(),
                    description: "Report the analysis result for the given text.".to_string(),
                    parameters: T::tool_parameters(),
                },
            }],
            tool_choice: ToolChoice {
                kind: "function",
                function: ToolChoiceFunction { name: T::tool_name() },
            },
            temperature,
            max_tokens,
        };

        debug!(model = %self.model, tool = %T::tool_name(), "structured scoring request");

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_status(status.as_u16(), body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::SchemaMismatch(e.to_string()))?;

        let arguments = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.tool_calls.into_iter().next())
            .map(|t| t.function.arguments)
            .ok_or(AiError::ToolCallMissing)?;

        serde_json::from_str(&arguments).map_err(|e| AiError::SchemaMismatch(e.to_string()))
    }

    /// Embed a single text. Returns a fixed-dimension vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_status(status.as_u16(), body));
        }

        let embed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AiError::Connection(e.to_string()))?;

        embed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(AiError::EmbeddingMissing)
    }
}
