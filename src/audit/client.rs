use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::error::AuditError;
use super::request::AuditRequest;

/// Single-shot text-completion interface to the reasoning service.
///
/// Implementations hold no per-call mutable state and are safe to invoke
/// concurrently from any number of audit tasks.
pub trait AuditClient: Send + Sync {
    /// Sends one rendered audit prompt and returns the raw response text.
    fn call(
        &self,
        request: &AuditRequest,
    ) -> impl std::future::Future<Output = Result<String, AuditError>> + Send;
}

/// Reasoning-service client backed by `genai`.
#[derive(Clone)]
pub struct GenaiAuditClient {
    client: Client,
    model: String,
}

impl GenaiAuditClient {
    /// Creates a client invoking `model` through the default genai provider
    /// resolution (API keys come from the provider's usual environment
    /// variables).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AuditClient for GenaiAuditClient {
    async fn call(&self, request: &AuditRequest) -> Result<String, AuditError> {
        let chat_req = ChatRequest::new(vec![ChatMessage::user(request.prompt())]);

        let response = self
            .client
            .exec_chat(&self.model, chat_req, None)
            .await
            .map_err(|e| classify_provider_error(&e.to_string()))?;

        let verdict = response.first_text().unwrap_or_default().to_string();
        debug!(
            nct_id = %request.trial.nct_id,
            verdict_len = verdict.len(),
            "audit call completed"
        );

        Ok(verdict)
    }
}

/// Sorts a provider error into the retryable or terminal class.
///
/// genai flattens provider errors into display strings, so classification
/// matches on the markers the providers actually emit for rate limiting and
/// temporary unavailability. Anything unrecognized is treated as permanent:
/// retrying a bad request or an auth failure only burns quota.
pub(crate) fn classify_provider_error(message: &str) -> AuditError {
    const TRANSIENT_MARKERS: &[&str] = &[
        "429",
        "rate limit",
        "rate_limit",
        "quota",
        "resource_exhausted",
        "resource exhausted",
        "overloaded",
        "unavailable",
        "503",
        "502",
        "timeout",
        "timed out",
        "server busy",
        "try again",
    ];

    let lowered = message.to_lowercase();
    if TRANSIENT_MARKERS.iter().any(|m| lowered.contains(m)) {
        AuditError::transient(message)
    } else {
        AuditError::permanent(message)
    }
}
