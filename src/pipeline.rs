use std::collections::HashSet;

use jiff::Timestamp;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::{
    config::Config,
    db,
    enricher::{self, EnrichmentReport, MetadataProvider},
    error::AppResult,
    loader::Loader,
    source::{self, SourceTables},
    verify::{self, TableCounts},
};

#[derive(Clone, Debug)]
pub struct PipelineSummary {
    pub enrichment: EnrichmentReport,
    pub counts: TableCounts,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

/// Runs one full rebuild of the store.
///
/// The connection is closed before returning, whether the stages succeeded or not.
pub async fn run<P: MetadataProvider + ?Sized>(
    config: &Config,
    provider: &P,
) -> AppResult<PipelineSummary> {
    let started_at = Timestamp::now();
    info!(database = %config.database_url, "starting movie pipeline");

    // Inputs are read before the store is opened so a bad source leaves it untouched.
    let tables = source::extract(&config.movies_path(), &config.ratings_path())
        .map_err(|e| e.context("extracting source tables"))?;

    let db = db::connect(&config.database_url).await.map_err(|e| e.context("connecting"))?;

    let result = run_stages(&db, config, provider, tables).await;

    match db.close().await {
        Ok(()) => info!("database connection closed"),
        Err(err) => warn!(error = %err, "failed to close database connection"),
    }

    let (enrichment, counts) = result?;
    let finished_at = Timestamp::now();
    info!(elapsed = %finished_at.duration_since(started_at), "movie pipeline completed");

    Ok(PipelineSummary { enrichment, counts, started_at, finished_at })
}

async fn run_stages<P: MetadataProvider + ?Sized>(
    db: &DatabaseConnection,
    config: &Config,
    provider: &P,
    tables: SourceTables,
) -> AppResult<(EnrichmentReport, TableCounts)> {
    db::reset_schema(db, config.schema_path())
        .await
        .map_err(|e| e.context("resetting schema"))?;

    let enrichment = enricher::enrich(provider, tables.movies, config.max_movies).await;

    let loader = Loader::new(db);
    loader.load_movies(&enrichment.movies).await.map_err(|e| e.context("loading movies"))?;
    loader.load_genres(&enrichment.movies).await.map_err(|e| e.context("loading genres"))?;

    let movie_ids: HashSet<i32> = enrichment.movies.iter().map(|m| m.movie_id).collect();
    loader
        .load_ratings(&tables.ratings, &movie_ids)
        .await
        .map_err(|e| e.context("loading ratings"))?;

    let counts = verify::count_rows(db).await.map_err(|e| e.context("verifying"))?;

    Ok((enrichment.report, counts))
}
