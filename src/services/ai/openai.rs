use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{FunctionSpec, LlmProvider};
use crate::errors::AgentError;
use crate::models::{Invocation, Message, Reply};

/// Chat-completions client using the legacy `functions` calling format.
/// Works against OpenAI and compatible endpoints.
pub struct OpenAiProvider {
    api_key: String,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            api_url,
            model,
            client,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        functions: &[FunctionSpec],
    ) -> Result<Reply, AgentError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "functions": functions,
        });

        tracing::debug!(model = %self.model, messages = messages.len(), "sending completion request");

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(AgentError::Transport {
                message: format!(
                    "completion API error ({}): {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                ),
                transient: status.is_server_error() || status.as_u16() == 429,
            });
        }

        let data: serde_json::Value = serde_json::from_slice(&bytes)?;
        parse_completion(&data)
    }
}

/// Extracts the reply from `choices[0].message`. A `function_call` wins over
/// `content` when both are present.
pub fn parse_completion(data: &serde_json::Value) -> Result<Reply, AgentError> {
    let message = &data["choices"][0]["message"];

    if let Some(call) = message.get("function_call").filter(|v| !v.is_null()) {
        let name = call["name"]
            .as_str()
            .ok_or_else(|| AgentError::Decode("function_call without a name".to_string()))?;
        let raw_args = call["arguments"].as_str().ok_or_else(|| {
            AgentError::Decode(format!("arguments for {name} are not a JSON string"))
        })?;
        let arguments: HashMap<String, String> = serde_json::from_str(raw_args)
            .map_err(|e| AgentError::Decode(format!("bad arguments for {name}: {e}")))?;

        return Ok(Reply::Invocation(Invocation {
            name: name.to_string(),
            arguments,
        }));
    }

    message["content"]
        .as_str()
        .map(|s| Reply::Text(s.to_string()))
        .ok_or(AgentError::UnexpectedFormat)
}
