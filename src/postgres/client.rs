use std::{future::Future, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

use crate::errors::DatabaseError;

const MAX_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Lazily connected PostgreSQL pool usable from synchronous callers.
///
/// Queries are driven on the runtime the client was created in, so the client
/// must be built inside a multi-threaded tokio runtime.
pub struct PgClient {
    pool: PgPool,
    handle: Handle,
}

impl PgClient {
    /// Parse `url` and build a pool. No connection is opened until the first query.
    pub fn connect_lazy(url: &str) -> Result<Self, DatabaseError> {
        let handle = Handle::try_current().map_err(|_| DatabaseError::NoRuntime)?;
        if !matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return Err(DatabaseError::NoRuntime);
        }

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(url)
            .map_err(DatabaseError::InvalidUrl)?;

        debug!(max_connections = MAX_CONNECTIONS, "Created lazy PostgreSQL pool");
        Ok(Self { pool, handle })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `future` to completion from synchronous code without stalling other tasks.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        tokio::task::block_in_place(|| self.handle.block_on(future))
    }
}

/// Double-quote a plain SQL identifier, rejecting anything that is not `[A-Za-z_][A-Za-z0-9_]*`.
pub fn quote_identifier(name: &str) -> Result<String, DatabaseError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(format!("\"{}\"", name))
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}
