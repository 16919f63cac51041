//! Azure OpenAI backend.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ForgeError;
use crate::types::Message;

use super::http::{azure_headers, shared_client};
use super::openai::{build_request_body, parse_response};
use super::{ChatBackend, Completion, CompletionOptions};

pub const DEFAULT_API_VERSION: &str = "2024-06-01";

/// Azure OpenAI Service backend. The model id passed to
/// [`ChatBackend::complete_chat`] is used as the deployment name.
pub struct AzureOpenAiBackend {
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl AzureOpenAiBackend {
    /// `endpoint`: e.g., "https://myresource.openai.azure.com"
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        }
    }

    fn url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }
}

#[async_trait]
impl ChatBackend for AzureOpenAiBackend {
    fn backend_name(&self) -> &str {
        "azure"
    }

    async fn complete_chat(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ForgeError> {
        let body = build_request_body(None, messages, options);

        debug!(deployment = model, tools = options.tools.len(), "Azure complete_chat");

        let resp = shared_client()
            .post(self.url(model))
            .headers(azure_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        parse_response(resp).await
    }
}
