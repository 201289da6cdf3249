#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// Wraps the error with the name of the pipeline stage that produced it.
    pub fn context(self, context: &'static str) -> Self {
        Self(self.0.context(context))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self(anyhow::Error::new(err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Why a single metadata lookup could not be answered.
///
/// Lookup errors never abort a run; the movie keeps sentinel metadata and the
/// failure is recorded in the enrichment report.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("provider answered with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if let Some(status) = err.status() {
            LookupError::Status(status.as_u16())
        } else if err.is_decode() {
            LookupError::Malformed(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}
