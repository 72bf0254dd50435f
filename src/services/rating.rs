use tracing::info;

use crate::store::{MovieRepo, RatingAggregate, StoreError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid rating submission")]
    InvalidInput,
    #[error("Movie {0} not found")]
    NotFound(String),
    #[error("Failed to read movie: {0}")]
    StoreRead(#[source] StoreError),
    #[error("Failed to write rating: {0}")]
    StoreWrite(#[source] StoreError),
    #[error("Movie {0} was rated concurrently")]
    Conflict(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub new_average: f64,
    pub new_count: u64,
}

/// Accepts only whole numbers in `[1, 5]`.
pub fn validate_rating(rating: Option<f64>) -> Result<u8, RatingError> {
    match rating {
        Some(r)
            if r.fract() == 0.0 && r >= MIN_RATING as f64 && r <= MAX_RATING as f64 =>
        {
            Ok(r as u8)
        }
        _ => Err(RatingError::InvalidInput),
    }
}

/// Streaming mean: folds one more rating into the aggregate without the
/// rating history.
pub fn next_aggregate(current: RatingAggregate, rating: u8) -> RatingAggregate {
    let total = current.average_rating * current.rating_count as f64;
    let rating_count = current.rating_count + 1;
    RatingAggregate {
        average_rating: (total + rating as f64) / rating_count as f64,
        rating_count,
    }
}

/// Reads the movie, folds in `rating` and writes both aggregate fields
/// back in one patch. The read and write are separate round-trips; with
/// `guard_revision` the write is conditional on the revision that was read.
pub async fn submit_rating<S: MovieRepo + ?Sized>(
    store: &S,
    movie_id: Option<&str>,
    rating: Option<f64>,
    guard_revision: bool,
) -> Result<RatingUpdate, RatingError> {
    let movie_id = movie_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(RatingError::InvalidInput)?;
    let rating = validate_rating(rating)?;

    let movie = store
        .get_movie(movie_id)
        .await
        .map_err(RatingError::StoreRead)?
        .ok_or_else(|| RatingError::NotFound(movie_id.to_string()))?;

    let updated = next_aggregate(movie.rating_aggregate(), rating);
    let if_revision = if guard_revision { movie.rev.as_deref() } else { None };

    store
        .set_rating(movie_id, &updated, if_revision)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(id) => RatingError::Conflict(id),
            e => RatingError::StoreWrite(e),
        })?;

    info!(
        movie = movie_id,
        rating,
        average = updated.average_rating,
        count = updated.rating_count,
        "Rating recorded"
    );

    Ok(RatingUpdate {
        new_average: updated.average_rating,
        new_count: updated.rating_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_next_aggregate_example() {
        let current = RatingAggregate { average_rating: 4.0, rating_count: 3 };
        let next = next_aggregate(current, 5);
        assert_eq!(next.rating_count, 4);
        assert!((next.average_rating - 4.25).abs() < 1e-9);
    }

    #[test]
    fn test_next_aggregate_matches_mean() {
        let ratings = [3u8, 5, 1, 4, 4, 2, 5];
        let mut aggregate = RatingAggregate::default();
        for (i, r) in ratings.iter().enumerate() {
            let before = aggregate;
            aggregate = next_aggregate(aggregate, *r);
            assert_eq!(aggregate.rating_count, before.rating_count + 1);

            let seen = &ratings[..=i];
            let mean = seen.iter().map(|&r| r as f64).sum::<f64>() / seen.len() as f64;
            assert!((aggregate.average_rating - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_validate_rating() {
        assert_eq!(validate_rating(Some(1.0)).unwrap(), 1);
        assert_eq!(validate_rating(Some(5.0)).unwrap(), 5);
        for bad in [Some(0.0), Some(6.0), Some(3.5), Some(-1.0), Some(f64::NAN), None] {
            assert!(matches!(validate_rating(bad), Err(RatingError::InvalidInput)));
        }
    }

    #[tokio::test]
    async fn test_submit_rating_updates_aggregate() {
        let store = MemoryStore::new().with_movie("movie-1", Some(4.0), Some(3));

        let update = submit_rating(&store, Some("movie-1"), Some(5.0), false).await.unwrap();
        assert_eq!(update.new_count, 4);
        assert!((update.new_average - 4.25).abs() < 1e-9);

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].id, "movie-1");
        assert_eq!(writes[0].if_revision, None);
        assert_eq!(store.movie("movie-1").unwrap().rating_count, Some(4));
    }

    #[tokio::test]
    async fn test_first_rating_on_unrated_movie() {
        let store = MemoryStore::new().with_movie("movie-1", None, None);

        let update = submit_rating(&store, Some("movie-1"), Some(3.0), false).await.unwrap();
        assert_eq!(update, RatingUpdate { new_average: 3.0, new_count: 1 });
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_store_call() {
        let store = MemoryStore::new().with_movie("movie-1", Some(4.0), Some(3));
        store.fail_reads();

        for (id, rating) in [
            (Some("movie-1"), Some(0.0)),
            (Some("movie-1"), Some(6.0)),
            (Some("movie-1"), None),
            (None, Some(4.0)),
            (Some("  "), Some(4.0)),
        ] {
            let err = submit_rating(&store, id, rating, false).await.unwrap_err();
            assert!(matches!(err, RatingError::InvalidInput));
        }
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_movie() {
        let store = MemoryStore::new();
        let err = submit_rating(&store, Some("ghost"), Some(4.0), false).await.unwrap_err();
        assert!(matches!(err, RatingError::NotFound(id) if id == "ghost"));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_store_failures() {
        let store = MemoryStore::new().with_movie("movie-1", Some(4.0), Some(3));
        store.fail_reads();
        let err = submit_rating(&store, Some("movie-1"), Some(4.0), false).await.unwrap_err();
        assert!(matches!(err, RatingError::StoreRead(_)));

        let store = MemoryStore::new().with_movie("movie-1", Some(4.0), Some(3));
        store.fail_writes();
        let err = submit_rating(&store, Some("movie-1"), Some(4.0), false).await.unwrap_err();
        assert!(matches!(err, RatingError::StoreWrite(_)));
    }

    #[tokio::test]
    async fn test_revision_guard() {
        let store = MemoryStore::new().with_movie("movie-1", Some(2.0), Some(1));
        submit_rating(&store, Some("movie-1"), Some(4.0), true).await.unwrap();
        assert_eq!(store.writes()[0].if_revision.as_deref(), Some("movie-1-rev"));

        let store = MemoryStore::new().with_movie("movie-1", Some(2.0), Some(1));
        store.conflict_on_write();
        let err = submit_rating(&store, Some("movie-1"), Some(4.0), true).await.unwrap_err();
        assert!(matches!(err, RatingError::Conflict(_)));
    }
}
