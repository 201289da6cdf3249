use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    error::AppResult,
    models::{RatingRecord, RawMovieRecord},
};

pub struct SourceTables {
    pub movies: Vec<RawMovieRecord>,
    pub ratings: Vec<RatingRecord>,
}

/// Reads both input tables; any unreadable file or row aborts the run.
pub fn extract(movies_path: &Path, ratings_path: &Path) -> AppResult<SourceTables> {
    info!(movies = %movies_path.display(), ratings = %ratings_path.display(), "extracting source tables");

    let movies: Vec<RawMovieRecord> = read_table(movies_path)?;
    let ratings: Vec<RatingRecord> = read_table(ratings_path)?;

    info!(movies = movies.len(), ratings = ratings.len(), "loaded source tables");
    Ok(SourceTables { movies, ratings })
}

fn read_table<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let rows = rdr
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(rows)
}
