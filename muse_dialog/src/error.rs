use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that abort an event.
///
/// Generation failures are not errors; they are answered with an apology.
#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, DialogError>;
