/// Error types for sqlx-template-bind
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error during SQL template scanning
    #[error("Failed to parse SQL template: {0}")]
    Parse(#[from] regex::Error),

    /// Error from SQLx database operations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The rendered query cannot be reconciled with the template.
    ///
    /// Raised whenever alignment fails: a literal anchor does not match
    /// verbatim, the rendered text is shorter than an expected anchor, a
    /// lookahead anchor cannot be located, or trailing text after the last
    /// variable differs. Callers must treat this as a hard rejection of the
    /// query and refuse to execute the raw rendered string.
    #[error("rendered SQL does not match the query template")]
    Mismatch,
}

/// Result type alias for sqlx-template-bind operations
pub type Result<T> = std::result::Result<T, Error>;
