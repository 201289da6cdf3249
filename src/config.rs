use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub omdb_timeout: Duration,
    pub api_delay: Duration,
    pub data_dir: PathBuf,
    pub movies_file: String,
    pub ratings_file: String,
    pub database_url: String,
    pub schema_file: Option<PathBuf>,
    pub max_movies: Option<usize>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let omdb_api_key = var("OMDB_API_KEY", "").trim().to_string();
        let omdb_base_url = var("OMDB_BASE_URL", "http://www.omdbapi.com/");

        let omdb_timeout_secs: u64 =
            var("OMDB_TIMEOUT_SECS", "10").trim().parse().context("OMDB_TIMEOUT_SECS")?;
        let api_delay_ms: u64 = var("API_DELAY_MS", "1000").trim().parse().context("API_DELAY_MS")?;

        let data_dir = PathBuf::from(var("DATA_PATH", "data"));
        let movies_file = var("MOVIES_CSV", "movies.csv");
        let ratings_file = var("RATINGS_CSV", "ratings.csv");

        let database_url = match lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()) {
            Some(url) => url,
            None => format!("sqlite://{}?mode=rwc", var("DB_NAME", "movie_database.db")),
        };

        let schema_file = Some(var("SCHEMA_FILE", "schema.sql"))
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let max_movies = parse_max_movies(&var("MAX_MOVIES", "100")).context("MAX_MOVIES")?;

        Ok(Self {
            omdb_api_key,
            omdb_base_url,
            omdb_timeout: Duration::from_secs(omdb_timeout_secs),
            api_delay: Duration::from_millis(api_delay_ms),
            data_dir,
            movies_file,
            ratings_file,
            database_url,
            schema_file,
            max_movies,
        })
    }

    pub fn movies_path(&self) -> PathBuf {
        self.data_dir.join(&self.movies_file)
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.data_dir.join(&self.ratings_file)
    }

    pub fn schema_path(&self) -> Option<&Path> {
        self.schema_file.as_deref()
    }
}

/// `None` means every movie in the source is processed.
fn parse_max_movies(raw: &str) -> anyhow::Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() || ["all", "none", "unlimited"].iter().any(|w| raw.eq_ignore_ascii_case(w)) {
        return Ok(None);
    }
    let cap: usize = raw.parse()?;
    Ok((cap > 0).then_some(cap))
}
