use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, http_error, TextGenerator, UpstreamError, UpstreamResult};
use crate::config::GenerationConfig;

const SERVICE: &str = "Text generation";

pub struct GeminiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PartIn<'a>>,
}

#[derive(Debug, Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

impl GeminiClient {
    pub fn new(config: GenerationConfig, timeout: Duration) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(http_error(SERVICE))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> UpstreamResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey(SERVICE))?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartIn { text: prompt }],
            }],
        };
        debug!(model = %self.config.model, "Requesting text generation");

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(http_error(SERVICE))?;
        let result: GenerateResponse = check_status(SERVICE, resp)
            .await?
            .json()
            .await
            .map_err(http_error(SERVICE))?;

        result
            .first_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(UpstreamError::EmptyResponse(SERVICE))
    }
}
