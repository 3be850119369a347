use thiserror::Error;

/// Failures surfaced by a [`MovieCatalog`](crate::MovieCatalog)
///
/// `Display` is the user-facing message; the underlying cause is kept for logs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered `Response: "False"`, or a search matched nothing
    #[error("Movie not found")]
    NotFound { reason: Option<String> },

    #[error("Something went wrong with fetching movies.")]
    Http { status: reqwest::StatusCode },

    #[error("Something went wrong with fetching movies.")]
    Transport(#[from] reqwest::Error),
}

impl CatalogError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: Some(reason.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
