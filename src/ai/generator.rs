use std::sync::Arc;

use log::{error, warn};

use super::prompt::build_feedback_prompt;
use super::provider::{CompletionProvider, ProviderError};
use crate::models::review::AiFeedback;

/// Why a fixed triple was substituted for a generated one.
#[derive(Debug)]
pub enum FallbackReason {
    MissingConfig,
    EmptyInput,
    Provider(ProviderError),
}

impl FallbackReason {
    pub fn feedback(&self) -> AiFeedback {
        match self {
            FallbackReason::MissingConfig => AiFeedback::new(
                "AI service temporarily unavailable.",
                "Missing API Key configuration",
                "Check server environment variables",
            ),
            FallbackReason::EmptyInput => AiFeedback::new(
                "Thank you for your rating. If you have a moment, we'd love to hear more details about your experience.",
                "Insufficient feedback provided",
                "Request clarification",
            ),
            FallbackReason::Provider(_) => AiFeedback::new(
                "Thank you for your feedback. We appreciate you taking the time to share your experience.",
                "AI processing failed",
                "Manual review required",
            ),
        }
    }
}

#[derive(Debug)]
pub enum Generation {
    Generated(AiFeedback),
    Fallback(FallbackReason),
}

impl Generation {
    pub fn into_feedback(self) -> AiFeedback {
        match self {
            Generation::Generated(feedback) => feedback,
            Generation::Fallback(reason) => reason.feedback(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback(_))
    }
}

/// Produces the user reply / admin summary / admin action triple for a submission.
#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ResponseGenerator {
    /// `None` means no credential is configured.
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    /// Resolves the outcome, tagging which fallback applied if any.
    /// Makes at most one provider call and never retries.
    pub async fn resolve(&self, rating: Option<i32>, text: Option<&str>) -> Generation {
        let Some(provider) = &self.provider else {
            error!("Missing OPENROUTER_API_KEY environment variable");
            return Generation::Fallback(FallbackReason::MissingConfig);
        };

        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Generation::Fallback(FallbackReason::EmptyInput),
        };

        // A missing rating is embedded as 0; the record schema rejects it afterwards.
        let prompt = build_feedback_prompt(rating.unwrap_or_default(), text);

        let parsed = match provider.complete_json(&prompt).await {
            Ok(content) => serde_json::from_str::<AiFeedback>(&content).map_err(ProviderError::from),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(feedback) => Generation::Generated(feedback),
            Err(e) => {
                warn!("AI generation failed, using fallback: {}", e);
                Generation::Fallback(FallbackReason::Provider(e))
            }
        }
    }

    /// Always returns a well-formed triple.
    pub async fn generate(&self, rating: Option<i32>, text: Option<&str>) -> AiFeedback {
        self.resolve(rating, text).await.into_feedback()
    }
}
