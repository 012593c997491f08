use super::{render_template, GeneratorError, TemplateVars, TextGenerator};
use crate::config::LlmConfig;
use crate::errors::EngineError;
use async_trait::async_trait;
use serde_json::json;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "STUDYCODER_API_KEY";

/// Provider for any OpenAI-compatible chat-completions endpoint (LiteLLM,
/// vLLM, OpenAI itself). The only provider the engine ships with.
pub struct OpenAIProvider {
    config: LlmConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a provider taking the credential from `STUDYCODER_API_KEY`.
    pub fn from_env(config: LlmConfig) -> Result<Self, EngineError> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| EngineError::MissingCredential(API_KEY_ENV))?;
        Ok(Self::new(config, api_key))
    }
}

#[async_trait]
impl TextGenerator for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        system_instructions: &str,
        user_query: &str,
        vars: &TemplateVars,
    ) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let system = render_template(system_instructions, vars);

        let payload = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user_query},
            ],
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => GeneratorError::AuthenticationFailed(text),
                429 => GeneratorError::RateLimitExceeded,
                500..=599 => GeneratorError::BackendUnavailable(text),
                _ => GeneratorError::InvalidRequest(text),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GeneratorError::ParseError(e.to_string()))?;

        data.get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(str::to_owned)
            .ok_or_else(|| GeneratorError::ParseError("no completion content in response".to_string()))
    }
}
