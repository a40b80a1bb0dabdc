//! Error mapping and timeouts shared by the PostgreSQL repositories.

use std::future::Future;
use std::time::Duration;

use crate::domain::repositories::StoreError;

/// Default upper bound for a single store operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Classifies a `sqlx` error.
///
/// Unique violations keep their constraint name; everything else is reported
/// as [`StoreError::Unavailable`].
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return StoreError::UniquenessViolation {
            constraint: db_err.constraint().unwrap_or("unknown").to_string(),
        };
    }

    StoreError::Unavailable(e.to_string())
}

/// Runs a store operation with an upper time bound.
///
/// On timeout the operation future is dropped; with PostgreSQL this aborts
/// the statement from the client side.
pub async fn bounded<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(map_sqlx_error),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
