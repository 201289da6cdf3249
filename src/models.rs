use serde::Deserialize;

use crate::error::LookupError;

/// Placeholder stored for every metadata field the provider did not supply.
pub const UNAVAILABLE: &str = "N/A";

/// Genre cell used by the source data for movies without any genre.
pub const NO_GENRES: &str = "(no genres listed)";

#[derive(Clone, Debug, Deserialize)]
pub struct RawMovieRecord {
    #[serde(rename = "movieId")]
    pub movie_id: i32,
    pub title: String,
    #[serde(default)]
    pub genres: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "movieId")]
    pub movie_id: i32,
    pub rating: f64,
    pub timestamp: i64,
}

#[derive(Clone, Debug)]
pub struct NormalizedMovie {
    pub movie_id: i32,
    pub title: String,
    pub genres: Option<String>,
    pub year: Option<i32>,
    pub clean_title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieMetadata {
    pub director: String,
    pub plot: String,
    pub box_office: String,
    pub runtime: String,
    pub rated: String,
    pub imdb_id: String,
}

impl MovieMetadata {
    pub fn unavailable() -> Self {
        Self {
            director: UNAVAILABLE.to_string(),
            plot: UNAVAILABLE.to_string(),
            box_office: UNAVAILABLE.to_string(),
            runtime: UNAVAILABLE.to_string(),
            rated: UNAVAILABLE.to_string(),
            imdb_id: UNAVAILABLE.to_string(),
        }
    }
}

impl Default for MovieMetadata {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// The row persisted to the `movies` table.
#[derive(Clone, Debug)]
pub struct EnrichedMovie {
    pub movie_id: i32,
    /// Raw title as found in the source, year suffix included.
    pub title: String,
    pub year: Option<i32>,
    pub genres: Option<String>,
    pub metadata: MovieMetadata,
}

impl EnrichedMovie {
    pub fn new(movie: NormalizedMovie, metadata: MovieMetadata) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title,
            year: movie.year,
            genres: movie.genres,
            metadata,
        }
    }
}

#[derive(Debug)]
pub enum LookupOutcome {
    Found(MovieMetadata),
    /// The provider explicitly reported that it has no such movie.
    NotFound { reason: String },
    Failed(LookupError),
    /// No lookup was attempted (enrichment disabled).
    Skipped,
}
