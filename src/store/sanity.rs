use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::model::*;
use super::repo::{AssetRepo, MovieRepo, QueryRepo};
use crate::config::StoreConfig;

/// HTTP client for a Sanity-compatible content store. Built once at startup
/// and shared through `AppState`.
pub struct SanityClient {
    http: reqwest::Client,
    config: StoreConfig,
}

#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(default)]
    documents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document: AssetDocument,
}

impl SanityClient {
    pub fn new(config: StoreConfig, timeout: Duration) -> StoreResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    fn base_url(&self, cdn: bool) -> StoreResult<String> {
        let version = self.config.api_version.trim_start_matches('v');
        if let Some(ref host) = self.config.api_host {
            return Ok(format!("{}/v{}", host.trim_end_matches('/'), version));
        }
        let project = self
            .config
            .project_id
            .as_deref()
            .ok_or(StoreError::NotConfigured("projectId"))?;
        let domain = if cdn && self.config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        Ok(format!("https://{}.{}/v{}", project, domain, version))
    }

    fn dataset(&self) -> String {
        urlencoding::encode(&self.config.dataset).into_owned()
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(resp: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MovieRepo for SanityClient {
    async fn get_movie(&self, id: &str) -> StoreResult<Option<Movie>> {
        let url = format!(
            "{}/data/doc/{}/{}",
            self.base_url(false)?,
            self.dataset(),
            urlencoding::encode(id)
        );
        debug!(id, "Fetching document");

        let resp = self.authorize(self.http.get(&url)).send().await?;
        let docs: DocResponse = Self::check(resp).await?.json().await?;

        let Some(doc) = docs.documents.into_iter().next() else {
            return Ok(None);
        };
        if doc.get("_type").and_then(Value::as_str).is_some_and(|t| t != "movie") {
            return Ok(None);
        }
        let movie = serde_json::from_value(doc).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Some(movie))
    }

    async fn set_rating(
        &self,
        id: &str,
        aggregate: &RatingAggregate,
        if_revision: Option<&str>,
    ) -> StoreResult<()> {
        let url = format!("{}/data/mutate/{}", self.base_url(false)?, self.dataset());

        let mut patch = json!({
            "id": id,
            "set": {
                "averageRating": aggregate.average_rating,
                "ratingCount": aggregate.rating_count,
            },
        });
        if let Some(rev) = if_revision {
            patch["ifRevisionID"] = Value::String(rev.to_string());
        }
        let body = json!({ "mutations": [{ "patch": patch }] });
        debug!(id, revision = ?if_revision, "Patching rating aggregate");

        let resp = self.authorize(self.http.post(&url)).json(&body).send().await?;
        if resp.status() == reqwest::StatusCode::CONFLICT {
            return Err(StoreError::Conflict(id.to_string()));
        }
        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl AssetRepo for SanityClient {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> StoreResult<AssetDocument> {
        let url = format!("{}/assets/images/{}", self.base_url(false)?, self.dataset());
        debug!(filename, size = data.len(), "Uploading image asset");

        let resp = self
            .authorize(self.http.post(&url))
            .query(&[("filename", filename)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::check(resp).await?.json().await?;
        Ok(uploaded.document)
    }
}

#[async_trait]
impl QueryRepo for SanityClient {
    async fn fetch(&self, query: &str, params: &[(&str, Value)]) -> StoreResult<Value> {
        let url = format!("{}/data/query/{}", self.base_url(true)?, self.dataset());

        let mut pairs = vec![
            ("query".to_string(), query.to_string()),
            ("perspective".to_string(), "published".to_string()),
        ];
        for (name, value) in params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        // Queries run anonymously; only published documents are visible.
        let resp = self.http.get(&url).query(&pairs).send().await?;
        let result: QueryResponse = Self::check(resp).await?.json().await?;
        Ok(result.result)
    }
}
