use async_trait::async_trait;

use crate::error::{ChatError, ProviderError};
use crate::message::Message;

pub mod echo;

pub use echo::EchoChatProvider;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Produces the assistant reply for the conversation so far.
    async fn reply(&self, history: &[Message]) -> Result<String, ProviderError>;
}

/// Names of the providers compiled into this build.
pub const BUILTIN_PROVIDERS: &[&str] = &["echo"];

pub fn create_provider(name: &str) -> Result<Box<dyn ChatProvider>, ChatError> {
    match name.trim() {
        "echo" => Ok(Box::new(EchoChatProvider)),
        other => Err(ChatError::MissingDependency(format!(
            "chat provider '{other}' is not available (built-in providers: {})",
            BUILTIN_PROVIDERS.join(", ")
        ))),
    }
}
