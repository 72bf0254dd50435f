use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, http_error, FetchedImage, PortraitSource, UpstreamError, UpstreamResult};
use crate::config::TmdbConfig;

const SERVICE: &str = "TMDB";

pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbConfig,
}

#[derive(Debug, Deserialize)]
struct PersonSearch {
    #[serde(default)]
    results: Vec<PersonResult>,
}

#[derive(Debug, Deserialize)]
struct PersonResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    profile_path: Option<String>,
}

/// Prefers an exact (case-insensitive, Unicode-aware) name match; otherwise the most
/// popular result that has a profile image. Results arrive sorted by
/// popularity.
fn pick_profile_path(results: Vec<PersonResult>, name: &str) -> Option<String> {
    let with_photo: Vec<PersonResult> = results
        .into_iter()
        .filter(|r| r.profile_path.as_deref().is_some_and(|p| !p.is_empty()))
        .collect();

    let wanted = name.trim().to_lowercase();
    let pos = with_photo
        .iter()
        .position(|r| r.name.trim().to_lowercase() == wanted)
        .unwrap_or(0);
    with_photo.into_iter().nth(pos).and_then(|r| r.profile_path)
}

fn extension_of(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') && !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => ".jpg".to_string(),
    }
}

impl TmdbClient {
    pub fn new(config: TmdbConfig, timeout: Duration) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(http_error(SERVICE))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl PortraitSource for TmdbClient {
    async fn find_profile_path(&self, name: &str) -> UpstreamResult<Option<String>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey(SERVICE))?;

        let url = format!("{}/3/search/person", self.config.base_url.trim_end_matches('/'));
        debug!(name, "Searching person on TMDB");

        let resp = self
            .http
            .get(&url)
            .query(&[("query", name), ("api_key", api_key), ("include_adult", "false")])
            .send()
            .await
            .map_err(http_error(SERVICE))?;
        let search: PersonSearch = check_status(SERVICE, resp)
            .await?
            .json()
            .await
            .map_err(http_error(SERVICE))?;

        Ok(pick_profile_path(search.results, name))
    }

    async fn fetch_image(&self, path: &str) -> UpstreamResult<FetchedImage> {
        let url = format!(
            "{}/t/p/original/{}",
            self.config.image_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        debug!(%url, "Downloading profile image");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(http_error(SERVICE))?;
        let resp = check_status(SERVICE, resp).await?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .map(str::to_string)
            .unwrap_or_else(|| mime_guess::from_path(path).first_or_octet_stream().to_string());

        let data = resp.bytes().await.map_err(http_error(SERVICE))?;
        if data.is_empty() {
            return Err(UpstreamError::EmptyResponse(SERVICE));
        }

        Ok(FetchedImage {
            data: data.to_vec(),
            content_type,
            extension: extension_of(path),
        })
    }
}
