use async_trait::async_trait;
use serde_json::Value;

use super::model::*;

#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn get_movie(&self, id: &str) -> StoreResult<Option<Movie>>;
    /// Sets both aggregate fields in one mutation. With `if_revision` the
    /// store refuses the write if the document moved on since it was read.
    async fn set_rating(
        &self,
        id: &str,
        aggregate: &RatingAggregate,
        if_revision: Option<&str>,
    ) -> StoreResult<()>;
}

#[async_trait]
pub trait AssetRepo: Send + Sync {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> StoreResult<AssetDocument>;
}

#[async_trait]
pub trait QueryRepo: Send + Sync {
    /// Runs a GROQ query. Parameters are bound as `$name`.
    async fn fetch(&self, query: &str, params: &[(&str, Value)]) -> StoreResult<Value>;
}

pub trait ContentStore: MovieRepo + AssetRepo + QueryRepo + Send + Sync {}

impl<T> ContentStore for T where T: MovieRepo + AssetRepo + QueryRepo + Send + Sync {}
