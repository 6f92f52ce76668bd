mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::Result;

/// Opaque prompt-to-text service. The orchestrator only ever needs "give me
/// markup for this prompt"; which model answers is a deployment detail.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
