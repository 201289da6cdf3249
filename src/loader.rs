use std::collections::{BTreeSet, HashMap, HashSet};

use sea_orm::{
    DatabaseConnection, EntityTrait, Set, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use crate::{
    entities::{genres, movie_genres, movies, ratings},
    error::AppResult,
    models::{EnrichedMovie, NO_GENRES, RatingRecord},
};

const RATING_BATCH: usize = 500;

/// Genre labels of one movie, in source order. Blank cells, the
/// "(no genres listed)" marker and empty fragments yield nothing.
pub fn genre_labels(genres: Option<&str>) -> Vec<&str> {
    match genres.map(str::trim) {
        None | Some("") | Some(NO_GENRES) => Vec::new(),
        Some(list) => list.split('|').map(str::trim).filter(|g| !g.is_empty()).collect(),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenreLoad {
    pub genres: usize,
    pub links: u64,
}

/// Writes enriched movies, genres and ratings. Every `load_*` call commits on its own.
pub struct Loader<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> Loader<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn load_movies(&self, enriched: &[EnrichedMovie]) -> AppResult<usize> {
        info!("loading movies");
        let txn = self.db.begin().await?;

        for movie in enriched {
            let meta = &movie.metadata;
            let model = movies::ActiveModel {
                movie_id: Set(movie.movie_id),
                title: Set(movie.title.clone()),
                year: Set(movie.year),
                imdb_id: Set(meta.imdb_id.clone()),
                director: Set(meta.director.clone()),
                plot: Set(meta.plot.clone()),
                box_office: Set(meta.box_office.clone()),
                runtime: Set(meta.runtime.clone()),
                rated: Set(meta.rated.clone()),
            };

            movies::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(movies::Column::MovieId)
                        .update_columns([
                            movies::Column::Title,
                            movies::Column::Year,
                            movies::Column::ImdbId,
                            movies::Column::Director,
                            movies::Column::Plot,
                            movies::Column::BoxOffice,
                            movies::Column::Runtime,
                            movies::Column::Rated,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        info!(movies = enriched.len(), "loaded movies");
        Ok(enriched.len())
    }

    pub async fn load_genres(&self, enriched: &[EnrichedMovie]) -> AppResult<GenreLoad> {
        info!("loading genres");

        // Sorted so surrogate ids come out the same on every run.
        let labels: BTreeSet<&str> =
            enriched.iter().flat_map(|m| genre_labels(m.genres.as_deref())).collect();

        let txn = self.db.begin().await?;

        for label in &labels {
            let model =
                genres::ActiveModel { genre_id: Default::default(), genre_name: Set(label.to_string()) };
            genres::Entity::insert(model)
                .on_conflict(OnConflict::column(genres::Column::GenreName).do_nothing().to_owned())
                .exec_without_returning(&txn)
                .await?;
        }

        let genre_ids: HashMap<String, i32> = genres::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|g| (g.genre_name, g.genre_id))
            .collect();

        let mut links = 0;
        for movie in enriched {
            for label in genre_labels(movie.genres.as_deref()) {
                let Some(&genre_id) = genre_ids.get(label) else {
                    continue;
                };
                let link =
                    movie_genres::ActiveModel { movie_id: Set(movie.movie_id), genre_id: Set(genre_id) };
                links += movie_genres::Entity::insert(link)
                    .on_conflict(
                        OnConflict::columns([
                            movie_genres::Column::MovieId,
                            movie_genres::Column::GenreId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(&txn)
                    .await?;
            }
        }

        txn.commit().await?;
        info!(genres = labels.len(), links = links, "loaded genres");
        Ok(GenreLoad { genres: labels.len(), links })
    }

    /// Inserts the ratings of processed movies only; everything else is dropped.
    pub async fn load_ratings(
        &self,
        source: &[RatingRecord],
        movie_ids: &HashSet<i32>,
    ) -> AppResult<usize> {
        info!("loading ratings");

        let rows: Vec<ratings::ActiveModel> = source
            .iter()
            .filter(|r| movie_ids.contains(&r.movie_id))
            .map(|r| ratings::ActiveModel {
                rating_id: Default::default(),
                movie_id: Set(r.movie_id),
                user_id: Set(r.user_id),
                rating: Set(r.rating),
                timestamp: Set(r.timestamp),
            })
            .collect();

        let txn = self.db.begin().await?;
        for batch in rows.chunks(RATING_BATCH) {
            ratings::Entity::insert_many(batch.iter().cloned()).exec_without_returning(&txn).await?;
        }
        txn.commit().await?;

        info!(ratings = rows.len(), skipped = source.len() - rows.len(), "loaded ratings");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_split_on_pipes() {
        assert_eq!(
            genre_labels(Some("Adventure|Animation|Children")),
            vec!["Adventure", "Animation", "Children"]
        );
    }

    #[test]
    fn placeholder_and_blank_cells_have_no_labels() {
        assert!(genre_labels(None).is_empty());
        assert!(genre_labels(Some("")).is_empty());
        assert!(genre_labels(Some("   ")).is_empty());
        assert!(genre_labels(Some("(no genres listed)")).is_empty());
    }

    #[test]
    fn stray_delimiters_are_ignored() {
        assert_eq!(genre_labels(Some("Action||Comedy|")), vec!["Action", "Comedy"]);
    }

    #[test]
    fn repeated_labels_are_kept_for_the_caller_to_dedupe() {
        assert_eq!(genre_labels(Some("Action|Comedy|Action")), vec!["Action", "Comedy", "Action"]);
    }
}
