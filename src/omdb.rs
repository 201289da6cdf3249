use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    enricher::MetadataProvider,
    error::LookupError,
    limiter::RateLimiter,
    models::{LookupOutcome, MovieMetadata, UNAVAILABLE},
};

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    limiter: Arc<dyn RateLimiter>,
}

impl OmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        timeout: Duration,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no OMDB_API_KEY provided, movies will be stored without metadata");
        }
        Self { client, api_key, base_url, timeout, limiter }
    }

    async fn fetch(&self, title: &str, year: Option<i32>) -> Result<LookupOutcome, LookupError> {
        let mut req = self
            .client
            .get(&self.base_url)
            .timeout(self.timeout)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)]);
        if let Some(year) = year {
            req = req.query(&[("y", year)]);
        }

        let body = req.send().await?.error_for_status()?.text().await?;
        classify_response(&body)
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn lookup(&self, title: &str, year: Option<i32>) -> LookupOutcome {
        if self.api_key.trim().is_empty() {
            return LookupOutcome::Skipped;
        }

        let outcome = self.fetch(title, year).await.unwrap_or_else(LookupOutcome::Failed);
        self.limiter.wait_turn().await;
        outcome
    }
}

/// Maps an OMDb JSON body onto a lookup outcome. `Response` other than `"True"` is a miss.
pub fn classify_response(body: &str) -> Result<LookupOutcome, LookupError> {
    let resp: OmdbResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;

    if resp.response != "True" {
        let reason = resp.error.unwrap_or_else(|| format!("Response={}", resp.response));
        return Ok(LookupOutcome::NotFound { reason });
    }

    let or_unavailable = |v: Option<String>| v.unwrap_or_else(|| UNAVAILABLE.to_string());
    Ok(LookupOutcome::Found(MovieMetadata {
        director: or_unavailable(resp.director),
        plot: or_unavailable(resp.plot),
        box_office: or_unavailable(resp.box_office),
        runtime: or_unavailable(resp.runtime),
        rated: or_unavailable(resp.rated),
        imdb_id: or_unavailable(resp.imdb_id),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: String,
    director: Option<String>,
    plot: Option<String>,
    box_office: Option<String>,
    runtime: Option<String>,
    rated: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    error: Option<String>,
}
