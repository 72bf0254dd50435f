//! GROQ queries backing the catalog pages, with their result projections.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::model::{ImageRef, PersonRole, StoreError, StoreResult};
use super::repo::QueryRepo;

#[cfg(test)]
const MOVIE_SUMMARY: &str = r#"{_id, title, "slug": slug.current, poster, releaseYear}"#;

pub const ALL_MOVIES: &str =
    r#"*[_type == "movie"] | order(releaseYear desc) {_id, title, "slug": slug.current, poster, releaseYear}"#;

pub const MOVIE_BY_SLUG: &str = r#"*[_type == "movie" && slug.current == $slug][0]{_id, title, releaseYear, poster, plot, "slug": slug.current, affiliateLink, gallery, averageRating, ratingCount, directors[]->{name, "slug": slug.current, photo}, genres[]->{name, "slug": slug.current}, actors[]->{name, "slug": slug.current, photo}}"#;

pub const MOVIES_BY_YEAR: &str =
    r#"*[_type == "movie" && releaseYear == $year] | order(title asc) {_id, title, "slug": slug.current, poster, releaseYear}"#;

pub const GENRE_BY_SLUG: &str = r#"*[_type == "genre" && slug.current == $slug][0]{name, "movies": *[_type == "movie" && references(^._id)] | order(releaseYear desc) {_id, title, "slug": slug.current, poster, releaseYear}}"#;

pub const PERSON_BY_SLUG: &str = r#"*[_type == $type && slug.current == $slug][0]{name, photo, biography, "movies": *[_type == "movie" && references(^._id)] | order(releaseYear desc) {_id, title, "slug": slug.current, poster, releaseYear}}"#;

/// People with at least `$min` referencing movies, most prolific first.
pub const PEOPLE_BY_MOVIE_COUNT: &str = r#"*[_type == $type] {_id, name, "slug": slug.current, photo, "movieCount": count(*[_type == "movie" && references(^._id)])} | order(movieCount desc) [movieCount >= $min]"#;

pub const SEARCH: &str = r#"{"movies": *[_type == "movie" && (title match $query || pt::text(plot) match $query)]{_id, title, "slug": slug.current, poster, releaseYear}, "directors": *[_type == "director" && name match $query]{_id, name, "slug": slug.current, photo}, "actors": *[_type == "actor" && name match $query]{_id, name, "slug": slug.current, photo}}"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub poster: Option<ImageRef>,
    #[serde(default)]
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedLink {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub poster: Option<ImageRef>,
    #[serde(default)]
    pub plot: Option<Vec<Value>>,
    #[serde(default)]
    pub affiliate_link: Option<String>,
    #[serde(default)]
    pub gallery: Option<Vec<ImageRef>>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u64>,
    #[serde(default)]
    pub directors: Option<Vec<NamedLink>>,
    #[serde(default)]
    pub actors: Option<Vec<NamedLink>>,
    #[serde(default)]
    pub genres: Option<Vec<NamedLink>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub photo: Option<ImageRef>,
    pub movie_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<ImageRef>,
    #[serde(default)]
    pub biography: Option<Vec<Value>>,
    #[serde(default)]
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenrePage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub movies: Vec<MovieSummary>,
    #[serde(default)]
    pub directors: Vec<NamedLink>,
    #[serde(default)]
    pub actors: Vec<NamedLink>,
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
}

/// `[0]` projections come back as `null` when nothing matches.
fn decode_optional<T: serde::de::DeserializeOwned>(value: Value) -> StoreResult<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    decode(value).map(Some)
}

pub async fn all_movies<S: QueryRepo + ?Sized>(store: &S) -> StoreResult<Vec<MovieSummary>> {
    decode(store.fetch(ALL_MOVIES, &[]).await?)
}

pub async fn movie_by_slug<S: QueryRepo + ?Sized>(
    store: &S,
    slug: &str,
) -> StoreResult<Option<MovieDetail>> {
    decode_optional(store.fetch(MOVIE_BY_SLUG, &[("slug", json!(slug))]).await?)
}

pub async fn movies_by_year<S: QueryRepo + ?Sized>(
    store: &S,
    year: i32,
) -> StoreResult<Vec<MovieSummary>> {
    decode(store.fetch(MOVIES_BY_YEAR, &[("year", json!(year))]).await?)
}

pub async fn genre_by_slug<S: QueryRepo + ?Sized>(
    store: &S,
    slug: &str,
) -> StoreResult<Option<GenrePage>> {
    decode_optional(store.fetch(GENRE_BY_SLUG, &[("slug", json!(slug))]).await?)
}

pub async fn person_by_slug<S: QueryRepo + ?Sized>(
    store: &S,
    role: PersonRole,
    slug: &str,
) -> StoreResult<Option<PersonPage>> {
    let params = [("type", json!(role.as_str())), ("slug", json!(slug))];
    decode_optional(store.fetch(PERSON_BY_SLUG, &params).await?)
}

pub async fn people_by_movie_count<S: QueryRepo + ?Sized>(
    store: &S,
    role: PersonRole,
) -> StoreResult<Vec<PersonSummary>> {
    let params = [("type", json!(role.as_str())), ("min", json!(role.min_movies()))];
    decode(store.fetch(PEOPLE_BY_MOVIE_COUNT, &params).await?)
}

/// Prefix search over titles, plot text and names. A blank term never
/// reaches the store.
pub async fn search<S: QueryRepo + ?Sized>(store: &S, term: &str) -> StoreResult<SearchResults> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(SearchResults::default());
    }
    let pattern = format!("{}*", term);
    decode(store.fetch(SEARCH, &[("query", json!(pattern))]).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_search_projection_matches_summary() {
        assert!(SEARCH.contains(MOVIE_SUMMARY));
        assert!(ALL_MOVIES.contains(MOVIE_SUMMARY));
    }

    #[tokio::test]
    async fn test_blank_search_skips_store() {
        let store = MemoryStore::new();
        let results = search(&store, "   ").await.unwrap();
        assert!(results.movies.is_empty());
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_search_appends_wildcard() {
        let store = MemoryStore::new();
        store.set_query_result(json!({
            "movies": [{"_id": "m1", "title": "Roma", "slug": "roma", "releaseYear": 1972}],
            "directors": [],
            "actors": [{"name": "Anna Magnani", "slug": "anna-magnani"}]
        }));

        let results = search(&store, " rom ").await.unwrap();
        assert_eq!(results.movies[0].title.as_deref(), Some("Roma"));
        assert_eq!(results.actors.len(), 1);

        let queries = store.queries();
        assert_eq!(queries[0].1, vec![("query".to_string(), json!("rom*"))]);
    }

    #[tokio::test]
    async fn test_people_query_uses_role_threshold() {
        let store = MemoryStore::new();
        store.set_query_result(json!([
            {"_id": "a1", "name": "Marcello Mastroianni", "slug": "marcello-mastroianni", "movieCount": 4}
        ]));

        let actors = people_by_movie_count(&store, PersonRole::Actor).await.unwrap();
        assert_eq!(actors[0].movie_count, 4);

        let queries = store.queries();
        assert_eq!(queries[0].0, PEOPLE_BY_MOVIE_COUNT);
        assert_eq!(
            queries[0].1,
            vec![("type".to_string(), json!("actor")), ("min".to_string(), json!(2))]
        );
    }

    #[tokio::test]
    async fn test_people_with_unnamed_documents() {
        let store = MemoryStore::new();
        store.set_query_result(json!([
            {"_id": "a1", "name": "Marcello Mastroianni", "slug": "marcello-mastroianni", "movieCount": 4},
            {"_id": "a2", "name": null, "slug": null, "movieCount": 2},
            {"_id": "a3", "movieCount": 2}
        ]));

        let actors = people_by_movie_count(&store, PersonRole::Actor).await.unwrap();
        assert_eq!(actors.len(), 3);
        assert_eq!(actors[0].name.as_deref(), Some("Marcello Mastroianni"));
        assert!(actors[1].name.is_none());
        assert!(actors[2].name.is_none());

        store.set_query_result(json!({ "name": null, "movies": [] }));
        let genre = genre_by_slug(&store, "noir").await.unwrap().unwrap();
        assert!(genre.name.is_none());

        store.set_query_result(json!({ "movies": [] }));
        let person = person_by_slug(&store, PersonRole::Director, "anon").await.unwrap().unwrap();
        assert!(person.name.is_none());
    }

    #[tokio::test]
    async fn test_search_keeps_person_ids() {
        let store = MemoryStore::new();
        store.set_query_result(json!({
            "movies": [],
            "directors": [{"_id": "d1", "name": "Vittorio De Sica", "slug": "vittorio-de-sica"}],
            "actors": []
        }));

        let results = search(&store, "vitt").await.unwrap();
        assert_eq!(results.directors[0].id.as_deref(), Some("d1"));
        let encoded = serde_json::to_value(&results).unwrap();
        assert_eq!(encoded["directors"][0]["_id"], "d1");
    }

    #[tokio::test]
    async fn test_missing_slug_is_none() {
        let store = MemoryStore::new();
        store.set_query_result(Value::Null);
        assert!(movie_by_slug(&store, "nope").await.unwrap().is_none());
    }
}
