//! Movie lookup tools exposed to the agent.

mod by_genre;
mod details;

pub use by_genre::{GetMoviesByGenre, GET_MOVIES_BY_GENRE};
pub use details::{GetMovieDetailsByIds, GET_MOVIE_DETAILS_BY_IDS};

use crate::agent::ToolRegistry;
use crate::config::ToolSettings;
use crate::error::Result;
use crate::tmdb::MovieDatabase;
use serde_json::Value;
use std::sync::Arc;

/// Build the registry of movie tools backed by `db`.
pub fn movie_registry(db: Arc<dyn MovieDatabase>, settings: &ToolSettings) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetMoviesByGenre::new(db.clone())))?;
    if settings.movie_details {
        registry.register(Arc::new(GetMovieDetailsByIds::new(db)))?;
    }
    Ok(registry)
}

/// Read a non-empty array of non-negative integers from `args[key]`.
fn id_list<T: TryFrom<u64>>(args: &Value, key: &str) -> Option<Vec<T>> {
    let ids = args.get(key)?.as_array()?;
    if ids.is_empty() {
        return None;
    }
    ids.iter()
        .map(|v| {
            let n = v
                .as_u64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))?;
            T::try_from(n).ok()
        })
        .collect()
}


#[cfg(test)]
pub(crate) mod tests_support {
    use crate::error::{CinemoodError, Result};
    use crate::tmdb::{Genre, Movie, MovieDatabase};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Database with no movies.
    pub struct EmptyDatabase;

    #[async_trait]
    impl MovieDatabase for EmptyDatabase {
        async fn genres(&self) -> Result<Vec<Genre>> {
            Ok(Vec::new())
        }
        async fn discover_by_genre(&self, _genre_ids: &[u32]) -> Result<Vec<Movie>> {
            Ok(Vec::new())
        }
        async fn movie_details(&self, _movie_id: u64) -> Result<Option<Movie>> {
            Ok(None)
        }
    }

    /// Database that counts lookups and can be told to fail.
    pub struct CountingDatabase {
        pub calls: AtomicUsize,
        pub fail: bool,
    }

    impl CountingDatabase {
        pub fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CinemoodError::MovieDatabase("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl MovieDatabase for CountingDatabase {
        async fn genres(&self) -> Result<Vec<Genre>> {
            self.record()?;
            Ok(vec![Genre {
                id: 35,
                name: "Comedy".to_string(),
            }])
        }

        async fn discover_by_genre(&self, genre_ids: &[u32]) -> Result<Vec<Movie>> {
            self.record()?;
            Ok(genre_ids
                .iter()
                .map(|id| {
                    let mut movie = Movie::new(u64::from(*id) * 100, format!("Genre {} pick", id));
                    movie.genre_ids = Some(vec![*id]);
                    movie
                })
                .collect())
        }

        async fn movie_details(&self, movie_id: u64) -> Result<Option<Movie>> {
            self.record()?;
            Ok((movie_id % 2 == 0).then(|| Movie::new(movie_id, format!("Movie {}", movie_id))))
        }
    }
}
