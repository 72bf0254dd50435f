use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub reference: String,
    #[serde(rename = "_type", default = "reference_type")]
    pub ref_type: String,
}

fn reference_type() -> String {
    "reference".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageRef {
    #[serde(rename = "_type", default)]
    pub image_type: String,
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Reference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Slug {
    #[serde(default)]
    pub current: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Span {
    #[serde(rename = "_type")]
    pub span_type: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// A portable-text paragraph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RichTextBlock {
    #[serde(rename = "_type")]
    pub block_type: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub style: String,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<serde_json::Value>,
    pub children: Vec<Span>,
}

/// Movie document as stored. Only the rating aggregate is ever written back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub poster: Option<ImageRef>,
    #[serde(default)]
    pub plot: Vec<serde_json::Value>,
    #[serde(default)]
    pub gallery: Vec<ImageRef>,
    #[serde(default)]
    pub affiliate_link: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u64>,
    #[serde(default)]
    pub directors: Vec<Reference>,
    #[serde(default)]
    pub actors: Vec<Reference>,
    #[serde(default)]
    pub genres: Vec<Reference>,
}

impl Movie {
    pub fn rating_aggregate(&self) -> RatingAggregate {
        RatingAggregate {
            average_rating: self.average_rating.unwrap_or(0.0),
            rating_count: self.rating_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Actor,
    Director,
}

impl PersonRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Actor => "actor",
            PersonRole::Director => "director",
        }
    }

    pub fn from_document_type(value: &str) -> Option<Self> {
        match value {
            "actor" => Some(PersonRole::Actor),
            "director" => Some(PersonRole::Director),
            _ => None,
        }
    }

    /// Minimum number of movies for a person to appear in the index.
    pub fn min_movies(&self) -> u32 {
        match self {
            PersonRole::Actor => 2,
            PersonRole::Director => 1,
        }
    }
}

/// `(averageRating, ratingCount)` pair maintained per movie.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
    pub average_rating: f64,
    pub rating_count: u64,
}

/// Asset document returned by an upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store not configured: {0}")]
    NotConfigured(&'static str),
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Document {0} was modified concurrently")]
    Conflict(String),
    #[error("Unexpected store response: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
