use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use tracing::info;

use crate::{
    entities::{genres, movie_genres, movies, ratings},
    error::AppResult,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub movies: u64,
    pub genres: u64,
    pub movie_genres: u64,
    pub ratings: u64,
}

/// Read-only row counts of the four pipeline tables.
pub async fn count_rows<C: ConnectionTrait>(db: &C) -> AppResult<TableCounts> {
    info!("verifying data");

    let counts = TableCounts {
        movies: movies::Entity::find().count(db).await?,
        genres: genres::Entity::find().count(db).await?,
        movie_genres: movie_genres::Entity::find().count(db).await?,
        ratings: ratings::Entity::find().count(db).await?,
    };

    info!(
        movies = counts.movies,
        genres = counts.genres,
        ratings = counts.ratings,
        movie_genre_links = counts.movie_genres,
        "row counts"
    );
    Ok(counts)
}
