use std::sync::Arc;

use movie_etl::{config::Config, limiter::FixedDelay, omdb::OmdbClient, pipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,sqlx=warn,sea_orm_migration=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("movie-etl/0.1")
        .timeout(config.omdb_timeout)
        .build()?;

    let omdb = OmdbClient::new(
        http,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
        config.omdb_timeout,
        Arc::new(FixedDelay::new(config.api_delay)),
    );

    match pipeline::run(&config, &omdb).await {
        Ok(summary) => {
            tracing::info!(
                movies = summary.counts.movies,
                genres = summary.counts.genres,
                ratings = summary.counts.ratings,
                movie_genre_links = summary.counts.movie_genres,
                lookup_failures = summary.enrichment.failures.len(),
                "pipeline completed successfully"
            );
            Ok(())
        },
        Err(err) => {
            tracing::error!("pipeline failed: {err:#}");
            Err(err.into())
        },
    }
}
