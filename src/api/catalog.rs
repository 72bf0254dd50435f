use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::error::ApiError;
use super::types::SearchParams;
use crate::server::AppState;
use crate::store::queries::{
    self, GenrePage, MovieDetail, MovieSummary, PersonPage, PersonSummary, SearchResults,
};
use crate::store::PersonRole;

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound(format!("{} non trovato", what))
}

pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    Ok(Json(queries::all_movies(&*state.store).await?))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MovieDetail>, ApiError> {
    queries::movie_by_slug(&*state.store, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Film"))
}

pub async fn movies_by_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    let year: i32 = year
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("Anno non valido: {}", year)))?;
    Ok(Json(queries::movies_by_year(&*state.store, year).await?))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GenrePage>, ApiError> {
    queries::genre_by_slug(&*state.store, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Genere"))
}

pub async fn list_directors(State(state): State<AppState>) -> Result<Json<Vec<PersonSummary>>, ApiError> {
    Ok(Json(queries::people_by_movie_count(&*state.store, PersonRole::Director).await?))
}

pub async fn get_director(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PersonPage>, ApiError> {
    queries::person_by_slug(&*state.store, PersonRole::Director, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Regista"))
}

pub async fn list_actors(State(state): State<AppState>) -> Result<Json<Vec<PersonSummary>>, ApiError> {
    Ok(Json(queries::people_by_movie_count(&*state.store, PersonRole::Actor).await?))
}

pub async fn get_actor(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PersonPage>, ApiError> {
    queries::person_by_slug(&*state.store, PersonRole::Actor, &slug)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Attore"))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let term = params.q.unwrap_or_default();
    Ok(Json(queries::search(&*state.store, &term).await?))
}
