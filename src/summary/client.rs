//! LLM client for summary generation
//!
//! Credentials travel in request headers only. Errors carry the provider
//! name and HTTP status, never the request URL or the response body.

use super::{SummaryError, SummaryGenerator, SummaryResult};
use crate::config::{LlmProvider, SummaryConfig};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a geography expert who writes accurate, neutral country overviews.";

const TEMPERATURE: f32 = 0.3;

/// OpenAI chat completions
mod openai {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: [ChatMessage<'a>; 2],
        pub temperature: f32,
    }

    #[derive(Serialize)]
    pub struct ChatMessage<'a> {
        pub role: &'static str,
        pub content: &'a str,
    }

    #[derive(Deserialize)]
    pub struct ChatResponse {
        #[serde(default)]
        pub choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    pub struct Choice {
        pub message: Reply,
    }

    #[derive(Deserialize)]
    pub struct Reply {
        pub content: Option<String>,
    }
}

/// Ollama `/api/generate`
mod ollama {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    pub struct GenerateRequest<'a> {
        pub model: &'a str,
        pub prompt: &'a str,
        pub system: &'a str,
        pub stream: bool,
    }

    #[derive(Deserialize)]
    pub struct GenerateResponse {
        #[serde(default)]
        pub response: String,
    }
}

/// Gemini `models/{model}:generateContent`
mod gemini {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerateRequest<'a> {
        pub system_instruction: Instruction<'a>,
        pub contents: [UserTurn<'a>; 1],
        pub generation_config: GenerationConfig,
    }

    #[derive(Serialize)]
    pub struct Instruction<'a> {
        pub parts: [TextPart<'a>; 1],
    }

    #[derive(Serialize)]
    pub struct UserTurn<'a> {
        pub role: &'static str,
        pub parts: [TextPart<'a>; 1],
    }

    #[derive(Serialize)]
    pub struct TextPart<'a> {
        pub text: &'a str,
    }

    #[derive(Serialize)]
    pub struct GenerationConfig {
        pub temperature: f32,
    }

    #[derive(Deserialize)]
    pub struct GenerateResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    pub struct Candidate {
        pub content: CandidateContent,
    }

    #[derive(Deserialize)]
    pub struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<ReplyPart>,
    }

    #[derive(Deserialize)]
    pub struct ReplyPart {
        #[serde(default)]
        pub text: String,
    }
}

pub struct LlmSummaryGenerator {
    client: Client,
    config: SummaryConfig,
    api_base_url: String,
}

impl LlmSummaryGenerator {
    pub fn new(config: &SummaryConfig) -> SummaryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SummaryError::ConfigError(e.without_url().to_string()))?;

        let api_base_url = config.api_base_url.clone().unwrap_or_else(|| {
            match config.provider {
                LlmProvider::OpenAI => "https://api.openai.com/v1".to_string(),
                LlmProvider::Ollama => "http://localhost:11434".to_string(),
                LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta".to_string(),
                LlmProvider::Mock => String::new(),
            }
        });

        Ok(Self {
            client,
            config: config.clone(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn prompt(country: &str) -> String {
        format!(
            "Write a concise overview of the country \"{}\" in Markdown.\n\
             Cover geography, history, culture and economy in at most four short paragraphs.\n\
             Do not invent statistics.",
            country
        )
    }

    fn system_prompt(&self) -> &str {
        self.config.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    fn api_key(&self, provider: &str) -> SummaryResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SummaryError::ConfigError(format!("{} requires an API key", provider)))
    }

    /// Send a JSON request and decode the JSON reply
    async fn exchange<R: DeserializeOwned>(
        provider: &str,
        request: RequestBuilder,
    ) -> SummaryResult<R> {
        let resp = request.send().await.map_err(|e| {
            SummaryError::NetworkError(format!("{} request failed: {}", provider, e.without_url()))
        })?;

        let status = resp.status();
        if !status.is_success() {
            debug!("{} answered {}", provider, status);
            return Err(SummaryError::ApiError(format!("{} returned {}", provider, status)));
        }

        resp.json::<R>().await.map_err(|e| {
            SummaryError::SerializationError(format!(
                "unexpected {} response: {}",
                provider,
                e.without_url()
            ))
        })
    }

    async fn openai_chat(&self, prompt: &str) -> SummaryResult<String> {
        let api_key = self.api_key("OpenAI")?;
        let body = openai::ChatRequest {
            model: &self.config.model,
            messages: [
                openai::ChatMessage { role: "system", content: self.system_prompt() },
                openai::ChatMessage { role: "user", content: prompt },
            ],
            temperature: TEMPERATURE,
        };
        let request = self
            .client
            .post(format!("{}/chat/completions", self.api_base_url))
            .bearer_auth(api_key)
            .json(&body);

        let reply: openai::ChatResponse = Self::exchange("OpenAI", request).await?;
        Ok(reply
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .unwrap_or_default())
    }

    async fn ollama_generate(&self, prompt: &str) -> SummaryResult<String> {
        let body = ollama::GenerateRequest {
            model: &self.config.model,
            prompt,
            system: self.system_prompt(),
            stream: false,
        };
        let request = self
            .client
            .post(format!("{}/api/generate", self.api_base_url))
            .json(&body);

        let reply: ollama::GenerateResponse = Self::exchange("Ollama", request).await?;
        Ok(reply.response)
    }

    async fn gemini_generate(&self, prompt: &str) -> SummaryResult<String> {
        let api_key = self.api_key("Gemini")?;
        let body = gemini::GenerateRequest {
            system_instruction: gemini::Instruction {
                parts: [gemini::TextPart { text: self.system_prompt() }],
            },
            contents: [gemini::UserTurn {
                role: "user",
                parts: [gemini::TextPart { text: prompt }],
            }],
            generation_config: gemini::GenerationConfig { temperature: TEMPERATURE },
        };
        let request = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_base_url, self.config.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&body);

        let reply: gemini::GenerateResponse = Self::exchange("Gemini", request).await?;
        Ok(reply
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }

    fn mock_summary(country: &str) -> String {
        format!(
            "**{}** is a country. This summary was produced by the offline mock provider.",
            country
        )
    }
}

#[async_trait]
impl SummaryGenerator for LlmSummaryGenerator {
    async fn generate(&self, country: &str) -> SummaryResult<String> {
        let prompt = Self::prompt(country);
        let text = match self.config.provider {
            LlmProvider::OpenAI => self.openai_chat(&prompt).await?,
            LlmProvider::Ollama => self.ollama_generate(&prompt).await?,
            LlmProvider::Gemini => self.gemini_generate(&prompt).await?,
            LlmProvider::Mock => Self::mock_summary(country),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(SummaryError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
