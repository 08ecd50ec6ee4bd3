use async_trait::async_trait;

use crate::error::ProviderError;
use crate::message::{Message, Role};

use super::ChatProvider;

/// Replies with the text of the last user message.
pub struct EchoChatProvider;

#[async_trait]
impl ChatProvider for EchoChatProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn reply(&self, history: &[Message]) -> Result<String, ProviderError> {
        let Some(last) = history.last() else {
            return Err(ProviderError::new(
                "EchoChatProvider requires at least one message in history.",
            ));
        };
        if last.role != Role::User {
            return Err(ProviderError::new(
                "EchoChatProvider expects last history message to be user.",
            ));
        }
        Ok(last.content.clone())
    }
}
