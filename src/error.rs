//! Engine-wide error taxonomy.
//!
//! Repo-level code deals in `rusqlite`/`anyhow` errors close to the store;
//! the engine layer (generator, coordinator, notifier) maps those into
//! `EngineError` at its public API seams so callers can match on failure
//! kind instead of parsing messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("transient store failure: {0}")]
    StoreTransient(#[source] anyhow::Error),

    #[error("permanent store failure: {0}")]
    StorePermanent(#[source] anyhow::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Classify a raw store error as transient or permanent.
    ///
    /// SQLite `BUSY`/`LOCKED` are the only failures this engine treats as
    /// worth a single retry; everything else (schema mismatch, constraint
    /// violation, I/O) is permanent.
    pub fn from_store(err: anyhow::Error) -> Self {
        if let Some(rusqlite::Error::SqliteFailure(sqlite_err, _)) =
            err.downcast_ref::<rusqlite::Error>()
        {
            use rusqlite::ErrorCode;
            if matches!(sqlite_err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) {
                return EngineError::StoreTransient(err);
            }
        }
        EngineError::StorePermanent(err)
    }
}

/// A cooperative cancellation flag checked between store round-trips.
///
/// Cloning shares the same underlying flag; `cancel()` from any clone is
/// observed by all others. Not tied to any particular runtime — just an
/// `Arc<AtomicBool>` so it composes with threads or async tasks alike.
#[derive(Clone, Default)]
pub struct CancellationToken(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn check(&self) -> EngineResult<()> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_shares_state_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(EngineError::Cancelled)));
    }

    #[test]
    fn from_store_classifies_busy_as_transient() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        let wrapped = anyhow::Error::new(sqlite_err);
        assert!(matches!(EngineError::from_store(wrapped), EngineError::StoreTransient(_)));
    }

    #[test]
    fn from_store_classifies_constraint_as_permanent() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some("UNIQUE constraint failed".to_string()),
        );
        let wrapped = anyhow::Error::new(sqlite_err);
        assert!(matches!(EngineError::from_store(wrapped), EngineError::StorePermanent(_)));
    }
}
