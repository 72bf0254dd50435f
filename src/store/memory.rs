//! In-memory `ContentStore` used by the service and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::model::*;
use super::repo::{AssetRepo, MovieRepo, QueryRepo};

#[derive(Debug, Clone, PartialEq)]
pub struct RatingWrite {
    pub id: String,
    pub aggregate: RatingAggregate,
    pub if_revision: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    movies: Mutex<HashMap<String, Movie>>,
    writes: Mutex<Vec<RatingWrite>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
    queries: Mutex<Vec<(String, Vec<(String, Value)>)>>,
    query_result: Mutex<Value>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
    fail_uploads: Mutex<bool>,
    conflict_on_write: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(self, id: &str, average: Option<f64>, count: Option<u64>) -> Self {
        let movie = Movie {
            id: id.to_string(),
            rev: Some(format!("{}-rev", id)),
            average_rating: average,
            rating_count: count,
            ..Default::default()
        };
        self.movies.lock().unwrap().insert(id.to_string(), movie);
        self
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn fail_uploads(&self) {
        *self.fail_uploads.lock().unwrap() = true;
    }

    pub fn conflict_on_write(&self) {
        *self.conflict_on_write.lock().unwrap() = true;
    }

    pub fn set_query_result(&self, value: Value) {
        *self.query_result.lock().unwrap() = value;
    }

    pub fn writes(&self) -> Vec<RatingWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// `(filename, content_type, size)` per upload.
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<(String, Vec<(String, Value)>)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn movie(&self, id: &str) -> Option<Movie> {
        self.movies.lock().unwrap().get(id).cloned()
    }
}

fn unavailable() -> StoreError {
    StoreError::Status {
        status: 503,
        body: "unavailable".to_string(),
    }
}

#[async_trait]
impl MovieRepo for MemoryStore {
    async fn get_movie(&self, id: &str) -> StoreResult<Option<Movie>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(self.movies.lock().unwrap().get(id).cloned())
    }

    async fn set_rating(
        &self,
        id: &str,
        aggregate: &RatingAggregate,
        if_revision: Option<&str>,
    ) -> StoreResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(unavailable());
        }
        if *self.conflict_on_write.lock().unwrap() {
            return Err(StoreError::Conflict(id.to_string()));
        }
        self.writes.lock().unwrap().push(RatingWrite {
            id: id.to_string(),
            aggregate: *aggregate,
            if_revision: if_revision.map(str::to_string),
        });
        if let Some(movie) = self.movies.lock().unwrap().get_mut(id) {
            movie.average_rating = Some(aggregate.average_rating);
            movie.rating_count = Some(aggregate.rating_count);
        }
        Ok(())
    }
}

#[async_trait]
impl AssetRepo for MemoryStore {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> StoreResult<AssetDocument> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(unavailable());
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((filename.to_string(), content_type.to_string(), data.len()));
        Ok(AssetDocument {
            id: format!("image-{}", uploads.len()),
            original_filename: Some(filename.to_string()),
            mime_type: Some(content_type.to_string()),
            size: Some(data.len() as u64),
            ..Default::default()
        })
    }
}

#[async_trait]
impl QueryRepo for MemoryStore {
    async fn fetch(&self, query: &str, params: &[(&str, Value)]) -> StoreResult<Value> {
        if *self.fail_reads.lock().unwrap() {
            return Err(unavailable());
        }
        let params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.queries.lock().unwrap().push((query.to_string(), params));
        Ok(self.query_result.lock().unwrap().clone())
    }
}
