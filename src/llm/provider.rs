use async_trait::async_trait;
use crate::error::Result;
use crate::llm::prompts::CompletionRequest;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
    fn name(&self) -> &str;
}
