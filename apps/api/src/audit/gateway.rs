//! Gateways: the seam between the audit core and the generative model.
//!
//! `AppState` holds `Arc<dyn ExtractionGateway>` and `Arc<dyn ChatGateway>`;
//! `LlmClient` implements both, tests swap in canned responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::audit::prompts::{extraction_system_prompt, ANALYZE_INSTRUCTION};
use crate::llm_client::{strip_data_url, LlmClient, LlmError, Role};

/// An uploaded document, base64-encoded (a `data:` URL prefix is tolerated).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    pub base64: String,
    pub mime_type: String,
}

impl DocumentInput {
    /// The base64 payload without any data-URL prefix.
    pub fn payload(&self) -> &str {
        strip_data_url(&self.base64)
    }
}

/// One prior chat turn, supplied by the caller on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// Turns a document into raw text expected to embed a fenced JSON block.
#[async_trait]
pub trait ExtractionGateway: Send + Sync {
    async fn extract(&self, document: &DocumentInput) -> Result<String, LlmError>;
}

/// Answers a follow-up question given the full conversation so far.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn reply(&self, system: &str, turns: &[ChatTurn]) -> Result<String, LlmError>;
}

#[async_trait]
impl ExtractionGateway for LlmClient {
    async fn extract(&self, document: &DocumentInput) -> Result<String, LlmError> {
        let system = extraction_system_prompt();
        self.read_document(
            &system,
            document.mime_type.trim(),
            document.payload(),
            ANALYZE_INSTRUCTION,
        )
        .await
    }
}

#[async_trait]
impl ChatGateway for LlmClient {
    async fn reply(&self, system: &str, turns: &[ChatTurn]) -> Result<String, LlmError> {
        let turns: Vec<(Role, &str)> = turns.iter().map(|t| (t.role, t.text.as_str())).collect();
        self.converse(system, &turns).await
    }
}
