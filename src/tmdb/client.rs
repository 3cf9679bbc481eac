//! TMDB v3 HTTP client.

use super::{Genre, Movie, MovieDatabase};
use crate::config::TmdbSettings;
use crate::error::{CinemoodError, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use rand::seq::SliceRandom;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct MoviePage {
    #[serde(default)]
    results: Vec<Movie>,
}

/// `/movie/{id}` returns genre objects instead of `genre_ids`.
#[derive(Debug, Deserialize)]
struct MovieDetails {
    id: u64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    genres: Vec<Genre>,
}

impl From<MovieDetails> for Movie {
    fn from(details: MovieDetails) -> Self {
        Movie {
            id: details.id,
            title: details.title,
            overview: details.overview,
            poster_path: details.poster_path,
            vote_average: details.vote_average,
            genre_ids: Some(details.genres.iter().map(|g| g.id).collect()),
            reason: None,
        }
    }
}

/// Client for The Movie Database.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    min_vote_average: f64,
    min_vote_count: u32,
    max_pages: u32,
    results_limit: usize,
}

impl TmdbClient {
    /// Create a client from settings, resolving the API key.
    pub fn from_settings(settings: &TmdbSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key()?;
        Self::with_api_key(settings, &api_key)
    }

    /// Create a client from settings with an explicit API key.
    pub fn with_api_key(settings: &TmdbSettings, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: settings.language.clone(),
            min_vote_average: settings.min_vote_average,
            min_vote_count: settings.min_vote_count,
            max_pages: settings.max_pages.max(1),
            results_limit: settings.results_limit,
        })
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.request(path).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CinemoodError::MovieDatabase(format!(
                "GET {} returned {}",
                path, status
            )));
        }
        Ok(response.json().await?)
    }

    async fn discover_page(&self, genres: &str, page: u32) -> Result<Vec<Movie>> {
        let params = [
            ("with_genres", genres.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("page", page.to_string()),
            ("vote_average.gte", self.min_vote_average.to_string()),
            ("vote_count.gte", self.min_vote_count.to_string()),
        ];
        let page: MoviePage = self.fetch("/discover/movie", &params).await?;
        Ok(page.results)
    }
}

#[async_trait]
impl MovieDatabase for TmdbClient {
    #[instrument(skip(self))]
    async fn genres(&self) -> Result<Vec<Genre>> {
        let list: GenreList = self.fetch("/genre/movie/list", &[]).await?;
        debug!("Fetched {} genres", list.genres.len());
        Ok(list.genres)
    }

    #[instrument(skip(self))]
    async fn discover_by_genre(&self, genre_ids: &[u32]) -> Result<Vec<Movie>> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let pages =
            try_join_all((1..=self.max_pages).map(|page| self.discover_page(&genres, page)))
                .await?;

        let mut movies: Vec<Movie> = pages.into_iter().flatten().collect();
        movies.shuffle(&mut rand::thread_rng());
        movies.truncate(self.results_limit);

        debug!("Discovered {} movies for genres {}", movies.len(), genres);
        Ok(movies)
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, movie_id: u64) -> Result<Option<Movie>> {
        let response = self.request(&format!("/movie/{}", movie_id)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                warn!("Movie {} not found on TMDB", movie_id);
                Ok(None)
            }
            status if status.is_success() => {
                let details: MovieDetails = response.json().await?;
                Ok(Some(details.into()))
            }
            status => Err(CinemoodError::MovieDatabase(format!(
                "GET /movie/{} returned {}",
                movie_id, status
            ))),
        }
    }
}
