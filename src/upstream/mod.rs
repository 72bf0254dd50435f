//! Third-party APIs used by detail generation.

pub mod gemini;
pub mod tmdb;

use async_trait::async_trait;

use crate::store::StoreError;

pub use gemini::GeminiClient;
pub use tmdb::TmdbClient;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> UpstreamResult<String>;
}

#[async_trait]
pub trait PortraitSource: Send + Sync {
    /// Profile image path of the best match for `name`, if the index has one.
    async fn find_profile_path(&self, name: &str) -> UpstreamResult<Option<String>>;
    async fn fetch_image(&self, path: &str) -> UpstreamResult<FetchedImage>;
}

#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    pub content_type: String,
    /// Includes the leading dot, e.g. `.jpg`.
    pub extension: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{0} returned no usable content")]
    EmptyResponse(&'static str),
    #[error("No profile image found for {0}")]
    NoProfileImage(String),
    #[error("Asset upload failed: {0}")]
    Upload(#[from] StoreError),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

pub(crate) async fn check_status(
    service: &'static str,
    resp: reqwest::Response,
) -> UpstreamResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn http_error(service: &'static str) -> impl Fn(reqwest::Error) -> UpstreamError {
    move |source| UpstreamError::Http { service, source }
}
