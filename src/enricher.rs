use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::{
    models::{EnrichedMovie, LookupOutcome, MovieMetadata, RawMovieRecord},
    title,
};

const PROGRESS_EVERY: usize = 10;

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup(&self, title: &str, year: Option<i32>) -> LookupOutcome;
}

#[derive(Clone, Debug)]
pub struct LookupFailure {
    pub movie_id: i32,
    pub title: String,
    pub cause: String,
}

#[derive(Clone, Debug, Default)]
pub struct EnrichmentReport {
    pub found: usize,
    pub not_found: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub failures: Vec<LookupFailure>,
}

pub struct Enrichment {
    pub movies: Vec<EnrichedMovie>,
    pub report: EnrichmentReport,
}

/// Looks up the first `max_movies` rows one at a time, in source order.
///
/// Individual lookup failures leave the movie with sentinel metadata; they
/// never fail the batch.
pub async fn enrich<P: MetadataProvider + ?Sized>(
    provider: &P,
    movies: Vec<RawMovieRecord>,
    max_movies: Option<usize>,
) -> Enrichment {
    let available = movies.len();
    let selected: Vec<RawMovieRecord> = match max_movies {
        Some(cap) => movies.into_iter().take(cap).collect(),
        None => movies,
    };
    let total = selected.len();

    if max_movies.is_some() {
        info!(selected = total, available = available, "processing movies (limited)");
    } else {
        info!(selected = total, "processing all movies");
    }

    let mut report = EnrichmentReport::default();
    let mut enriched = Vec::with_capacity(total);
    let mut seen = HashSet::with_capacity(total);

    for (idx, raw) in selected.into_iter().enumerate() {
        if seen.insert(raw.movie_id) {
            enriched.push(enrich_one(provider, raw, &mut report).await);
        } else {
            warn!(movie_id = raw.movie_id, title = %raw.title, "duplicate movie id, keeping first row");
            report.duplicates += 1;
        }

        if (idx + 1) % PROGRESS_EVERY == 0 {
            info!("processed {}/{} movies", idx + 1, total);
        }
    }

    info!(
        enriched = enriched.len(),
        found = report.found,
        not_found = report.not_found,
        failed = report.failures.len(),
        skipped = report.skipped,
        "enrichment complete"
    );

    Enrichment { movies: enriched, report }
}

async fn enrich_one<P: MetadataProvider + ?Sized>(
    provider: &P,
    raw: RawMovieRecord,
    report: &mut EnrichmentReport,
) -> EnrichedMovie {
    let movie = title::normalize(raw);
    debug!(movie_id = movie.movie_id, title = %movie.clean_title, year = ?movie.year, "looking up metadata");

    let metadata = match provider.lookup(&movie.clean_title, movie.year).await {
        LookupOutcome::Found(metadata) => {
            report.found += 1;
            metadata
        },
        LookupOutcome::NotFound { reason } => {
            warn!(movie_id = movie.movie_id, title = %movie.clean_title, reason = %reason, "movie not found by metadata provider");
            report.not_found += 1;
            MovieMetadata::unavailable()
        },
        LookupOutcome::Failed(err) => {
            error!(movie_id = movie.movie_id, title = %movie.clean_title, error = %err, "metadata lookup failed");
            report.failures.push(LookupFailure {
                movie_id: movie.movie_id,
                title: movie.clean_title.clone(),
                cause: err.to_string(),
            });
            MovieMetadata::unavailable()
        },
        LookupOutcome::Skipped => {
            report.skipped += 1;
            MovieMetadata::unavailable()
        },
    };

    EnrichedMovie::new(movie, metadata)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::{error::LookupError, models::UNAVAILABLE};

    #[derive(Default)]
    struct ScriptedProvider {
        hits: HashMap<String, MovieMetadata>,
        broken: HashSet<String>,
        calls: Mutex<Vec<(String, Option<i32>)>>,
    }

    #[async_trait]
    impl MetadataProvider for ScriptedProvider {
        async fn lookup(&self, title: &str, year: Option<i32>) -> LookupOutcome {
            self.calls.lock().unwrap().push((title.to_string(), year));
            if self.broken.contains(title) {
                return LookupOutcome::Failed(LookupError::Timeout);
            }
            match self.hits.get(title) {
                Some(meta) => LookupOutcome::Found(meta.clone()),
                None => LookupOutcome::NotFound { reason: "Movie not found!".to_string() },
            }
        }
    }

    fn raw(id: i32, title: &str) -> RawMovieRecord {
        RawMovieRecord { movie_id: id, title: title.to_string(), genres: None }
    }

    fn lasseter() -> MovieMetadata {
        MovieMetadata { director: "John Lasseter".to_string(), ..MovieMetadata::unavailable() }
    }

    #[tokio::test]
    async fn cap_keeps_source_order() {
        let provider = ScriptedProvider::default();
        let movies = vec![raw(3, "C (2001)"), raw(1, "A (1999)"), raw(2, "B (2000)")];

        let out = enrich(&provider, movies, Some(2)).await;

        let ids: Vec<i32> = out.movies.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![3, 1]);
        let calls = provider.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("C".to_string(), Some(2001)), ("A".to_string(), Some(1999))]);
    }

    #[tokio::test]
    async fn cap_larger_than_source_takes_everything() {
        let provider = ScriptedProvider::default();
        let out = enrich(&provider, vec![raw(1, "A"), raw(2, "B")], Some(50)).await;
        assert_eq!(out.movies.len(), 2);

        let out = enrich(&provider, vec![raw(1, "A"), raw(2, "B")], None).await;
        assert_eq!(out.movies.len(), 2);
    }

    #[tokio::test]
    async fn misses_and_failures_fall_back_to_sentinels() {
        let mut provider = ScriptedProvider::default();
        provider.hits.insert("Toy Story".to_string(), lasseter());
        provider.broken.insert("Heat".to_string());

        let movies =
            vec![raw(1, "Toy Story (1995)"), raw(2, "Obscuretitle (2099)"), raw(6, "Heat (1995)")];
        let out = enrich(&provider, movies, None).await;

        assert_eq!(out.movies[0].metadata.director, "John Lasseter");
        assert_eq!(out.movies[0].title, "Toy Story (1995)");
        assert_eq!(out.movies[0].year, Some(1995));
        assert_eq!(out.movies[1].metadata, MovieMetadata::unavailable());
        assert_eq!(out.movies[2].metadata, MovieMetadata::unavailable());
        assert_eq!(out.movies[2].metadata.plot, UNAVAILABLE);

        assert_eq!(out.report.found, 1);
        assert_eq!(out.report.not_found, 1);
        assert_eq!(out.report.failures.len(), 1);
        assert_eq!(out.report.failures[0].movie_id, 6);
        assert_eq!(out.report.failures[0].cause, "request timed out");
    }

    #[tokio::test]
    async fn duplicate_ids_are_looked_up_once() {
        let provider = ScriptedProvider::default();
        let movies = vec![raw(1, "First (1990)"), raw(1, "Second (1991)"), raw(2, "Third")];

        let out = enrich(&provider, movies, None).await;

        assert_eq!(out.movies.len(), 2);
        assert_eq!(out.movies[0].title, "First (1990)");
        assert_eq!(out.report.duplicates, 1);
        assert_eq!(provider.calls.lock().unwrap().len(), 2);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap()).lines().map(str::to_string).collect()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (buffer, guard)
    }

    fn has_line(lines: &[String], level: &str, needles: &[&str]) -> bool {
        lines.iter().any(|l| l.contains(level) && needles.iter().all(|n| l.contains(n)))
    }

    #[tokio::test]
    async fn misses_warn_failures_error_and_progress_is_reported() {
        let mut provider = ScriptedProvider::default();
        provider.broken.insert("Heat".to_string());
        let mut movies = vec![raw(2, "Obscuretitle (2099)"), raw(6, "Heat (1995)")];
        movies.extend((100..108).map(|id| raw(id, "Filler")));

        let (logs, _guard) = capture_logs();
        enrich(&provider, movies, None).await;
        let lines = logs.lines();

        assert!(
            has_line(&lines, "WARN", &["movie not found by metadata provider", "movie_id=2"]),
            "{lines:#?}"
        );
        assert!(has_line(&lines, "ERROR", &["metadata lookup failed", "movie_id=6"]), "{lines:#?}");
        assert!(!has_line(&lines, "WARN", &["movie_id=6"]), "{lines:#?}");
        assert!(has_line(&lines, "INFO", &["processed 10/10 movies"]), "{lines:#?}");
    }

    #[tokio::test]
    async fn progress_is_reported_when_a_duplicate_lands_on_the_boundary() {
        let provider = ScriptedProvider::default();
        let mut movies: Vec<RawMovieRecord> = (1..=20).map(|id| raw(id, "Filler")).collect();
        movies[9].movie_id = 1;

        let (logs, _guard) = capture_logs();
        let out = enrich(&provider, movies, None).await;
        let lines = logs.lines();

        assert_eq!(out.report.duplicates, 1);
        assert_eq!(out.movies.len(), 19);
        assert!(has_line(&lines, "INFO", &["processed 10/20 movies"]), "{lines:#?}");
        assert!(has_line(&lines, "INFO", &["processed 20/20 movies"]), "{lines:#?}");
    }
}
