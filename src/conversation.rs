//! Conversation client for an OpenAI-compatible chat completions API

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::{Error, Result};

/// Produces a reply for a free-form user prompt
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Generate a reply to `prompt`
    ///
    /// # Errors
    ///
    /// Returns error if the completion endpoint fails
    async fn reply(&self, prompt: &str) -> Result<String>;
}

/// Chat completions client
pub struct ChatCompletionClient {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl ChatCompletionClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if no `OpenAI` API key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .api_keys
            .openai
            .clone()
            .ok_or_else(|| Error::Config("OpenAI API key required for chat".to_string()))?;

        Ok(Self {
            client: config.http_client()?,
            api_key,
            endpoint: format!("{}/chat/completions", config.llm.base_url.trim_end_matches('/')),
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            system_prompt: config.llm.system_prompt.clone(),
        })
    }
}

#[async_trait]
impl Conversation for ChatCompletionClient {
    async fn reply(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &self.system_prompt,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: Some(self.max_tokens),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Conversation(format!("completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Conversation(format!("completion API error: {status} - {body}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Conversation(format!("failed to parse completion: {e}")))?;

        let text = first_reply(result)
            .ok_or_else(|| Error::Conversation("completion had no content".to_string()))?;

        tracing::debug!(model = %self.model, reply_len = text.len(), "completion received");
        Ok(text)
    }
}

fn first_reply(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
