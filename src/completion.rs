//! Completion requests: the CLI side talks to the backend proxy, the proxy
//! talks to the OpenAI-compatible `/completions` endpoint with fixed
//! generation parameters.

use std::future::Future;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{
    config,
    errors::{CompletionError, ConfigError},
    types::{
        CompletionChoice, CompletionRequest, CompletionResponse, UpstreamCompletionRequest,
        UpstreamCompletionResponse,
    },
};

pub trait CompletionSource {
    /// Raw multi-line suggestion text for `prompt`.
    fn request_completion(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, CompletionError>>;
}

/// Calls `POST {backend}/api/completion`.
pub struct BackendCompletionClient {
    client: Client,
    backend_url: String,
}

impl BackendCompletionClient {
    pub fn new(client: Client, backend_url: &str) -> Self {
        Self {
            client,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

impl CompletionSource for BackendCompletionClient {
    async fn request_completion(&self, prompt: &str) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(format!("{}/api/completion", self.backend_url))
            .json(&CompletionRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Quota(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let json = response.json::<CompletionResponse>().await?;
        json.result
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| CompletionError::Malformed("response carried no choices".to_string()))
    }
}

/// Server-side generation parameters. Callers only supply the prompt.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionParams {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: config::openai_api_url(),
            api_key: config::openai_api_key()?,
            model: config::openai_model(),
            temperature: config::openai_temperature()?,
            max_tokens: config::openai_max_tokens()?,
        })
    }

    pub fn request_for(&self, prompt: &str) -> UpstreamCompletionRequest {
        UpstreamCompletionRequest {
            model: self.model.clone(),
            prompt: format!("song list of {prompt}"),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[derive(Debug)]
pub enum UpstreamError {
    /// The completion API answered with a non-2xx status.
    Status(StatusCode, Value),
    Transport(String),
}

/// Asks the completion API for suggestions and returns its choices.
pub async fn request_upstream(
    client: &Client,
    params: &CompletionParams,
    prompt: &str,
) -> Result<Vec<CompletionChoice>, UpstreamError> {
    let response = client
        .post(format!(
            "{}/completions",
            params.api_url.trim_end_matches('/')
        ))
        .bearer_auth(&params.api_key)
        .json(&params.request_for(prompt))
        .send()
        .await
        .map_err(|e| UpstreamError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .json::<Value>()
            .await
            .unwrap_or_else(|e| Value::String(e.to_string()));
        return Err(UpstreamError::Status(status, body));
    }

    let json = response
        .json::<UpstreamCompletionResponse>()
        .await
        .map_err(|e| UpstreamError::Transport(e.to_string()))?;
    Ok(json.choices)
}
