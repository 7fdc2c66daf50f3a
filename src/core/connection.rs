use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::{AppError, Result};

/// Single SQLite handle owned by the report engine
///
/// There is no pool: one connection lives for the whole analysis session and
/// every query borrows it mutably, so access is serialized by construction.
#[derive(Debug)]
pub struct SalesConnection {
    path: PathBuf,
    conn: Option<SqliteConnection>,
}

impl SalesConnection {
    /// Open a read-only connection to an existing database file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, true).await
    }

    /// Open a connection, optionally allowing writes
    ///
    /// Fails with `AppError::Connection` when the file is missing or is not a
    /// SQLite database. SQLite opens lazily, so the schema catalog is read
    /// once to force the header check.
    pub async fn open_with(path: impl AsRef<Path>, read_only: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(false)
            .read_only(read_only);

        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| {
                AppError::connection(format!("cannot open {}: {}", path.display(), e))
            })?;

        let tables: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master")
            .fetch_one(&mut conn)
            .await
            .map_err(|e| {
                AppError::connection(format!("{} is not a valid database: {}", path.display(), e))
            })?;

        info!(
            "Connected to sales database: {} ({} schema objects)",
            path.display(),
            tables
        );

        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Borrow the live handle, failing once the connection has been closed
    pub fn handle(&mut self) -> Result<&mut SqliteConnection> {
        self.conn.as_mut().ok_or(AppError::ClosedConnection)
    }

    /// Release the handle. Closing an already closed connection is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => {
                conn.close().await?;
                info!("Connection closed: {}", self.path.display());
            }
            None => debug!("Connection already closed: {}", self.path.display()),
        }
        Ok(())
    }
}
