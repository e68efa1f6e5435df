//! Shared request state.

use crate::error::ApiError;
use inkwell_core::{ensure_schema, RepoResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// One SQLite connection shared by all requests.
///
/// Queries run on the blocking pool; the mutex serializes access to the
/// connection.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Takes ownership of a migrated connection after checking its schema
    /// once. Handlers build repositories without re-checking.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on a blocking thread.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("database connection lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use inkwell_core::db::open_db_in_memory;
    use inkwell_core::RepoError;
    use rusqlite::Connection;

    #[test]
    fn schema_is_checked_when_state_is_built() {
        let bare = Connection::open_in_memory().unwrap();
        let err = AppState::try_new(bare).err().unwrap();
        assert!(matches!(err, RepoError::MissingRequiredTable("articles")));

        assert!(AppState::try_new(open_db_in_memory().unwrap()).is_ok());
    }
}
