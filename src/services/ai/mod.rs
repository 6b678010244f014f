pub mod functions;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AgentError;
use crate::models::{Message, Reply};

/// A callable operation advertised to the model, in the shape of the
/// chat-completions `functions` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        functions: &[FunctionSpec],
    ) -> Result<Reply, AgentError>;
}
