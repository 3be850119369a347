use popcorn_models::{MovieDetail, SearchResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use crate::error::CatalogError;

// OMDb reports missing values as the literal string "N/A"
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

#[derive(Debug, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct OmdbDetailResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
}

fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

/// Parse "148 min" into 148; "N/A" and anything non-numeric yield `None`
pub fn parse_runtime_minutes(runtime: &str) -> Option<u32> {
    runtime
        .split_whitespace()
        .next()
        .filter(|s| *s != NOT_AVAILABLE)
        .and_then(|s| s.parse().ok())
}

pub fn parse_imdb_rating(rating: &str) -> Option<f64> {
    let rating = rating.trim();
    if rating == NOT_AVAILABLE {
        return None;
    }
    rating.parse::<f64>().ok().filter(|r| r.is_finite())
}

impl OmdbSearchResponse {
    pub fn into_results(self) -> Result<Vec<SearchResult>, CatalogError> {
        if !is_success(&self.response) {
            return Err(CatalogError::NotFound { reason: self.error });
        }
        if self.search.is_empty() {
            return Err(CatalogError::NotFound { reason: None });
        }

        Ok(self
            .search
            .into_iter()
            .map(|item| SearchResult {
                id: item.imdb_id,
                title: item.title,
                year: item.year,
                poster_url: item.poster,
            })
            .collect())
    }
}

impl OmdbDetailResponse {
    pub fn into_detail(self) -> Result<MovieDetail, CatalogError> {
        if !is_success(&self.response) {
            return Err(CatalogError::NotFound { reason: self.error });
        }

        Ok(MovieDetail {
            runtime_minutes: parse_runtime_minutes(&self.runtime),
            imdb_rating: parse_imdb_rating(&self.imdb_rating),
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: self.poster,
            plot: self.plot,
            released: self.released,
            actors: self.actors,
            director: self.director,
            genre: self.genre,
        })
    }
}

/// Search titles matching `query`
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, CatalogError> {
    debug!(query = query, "OMDb search request");

    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("s", query)])
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(CatalogError::Http { status: response.status() });
    }

    let body: OmdbSearchResponse = response.json().await?;
    body.into_results()
}

/// Look up one movie by IMDb id
pub async fn get_movie(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetail, CatalogError> {
    debug!(id = id, "OMDb detail request");

    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("i", id)])
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(CatalogError::Http { status: response.status() });
    }

    let body: OmdbDetailResponse = response.json().await?;
    body.into_detail()
}
