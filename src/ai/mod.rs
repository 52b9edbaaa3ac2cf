pub mod generator;
pub mod prompt;
pub mod provider;

pub use generator::{FallbackReason, Generation, ResponseGenerator};
pub use prompt::build_feedback_prompt;
pub use provider::{CompletionProvider, OpenRouterClient, ProviderError};
