pub mod anthropic;
pub mod client;
pub mod openai;

pub use client::LlmClient;

use crate::domain::{Language, locale};

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// "draft" or "refine"; labels spans and metrics.
    pub stage: String,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
    pub provider: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
    fn name(&self) -> &str;
}

/// An empty successful response is surfaced as a localized fallback string in
/// place of the document body, not as an error. Deliberate contract carried
/// over from the original product; see DESIGN.md before changing it.
pub fn content_or_fallback(content: String, language: Language) -> String {
    if content.trim().is_empty() {
        locale::empty_response_fallback(language).to_string()
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_or_fallback_keeps_real_content() {
        assert_eq!(
            content_or_fallback("Dear Sir...".to_string(), Language::English),
            "Dear Sir..."
        );
    }

    #[test]
    fn test_content_or_fallback_replaces_empty() {
        for language in Language::ALL {
            let content = content_or_fallback("  \n".to_string(), language);
            assert_eq!(content, locale::empty_response_fallback(language));
        }
    }
}
