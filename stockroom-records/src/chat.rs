//! Free-text query over the tenant's data

use stockroom_api_types::ChatDocument;
use stockroom_http::ApiClient;
use tracing::debug;

use crate::error::{RecordError, RecordResult, ValidationFailure};

#[derive(Debug, Clone)]
pub struct ChatService {
    api: ApiClient,
}

impl ChatService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Ranked result documents for `prompt`, in backend order
    pub async fn query(&self, prompt: &str) -> RecordResult<Vec<ChatDocument>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ValidationFailure::new("prompt", "Please enter a question").into());
        }
        debug!("Chat query ({} chars)", prompt.len());

        let documents: Option<Vec<ChatDocument>> = self
            .api
            .get_with_query(&["chat", "query"], &[("prompt", prompt)])
            .await
            .map_err(|e| RecordError::from_http("chat", e))?;
        Ok(documents.unwrap_or_default())
    }
}
