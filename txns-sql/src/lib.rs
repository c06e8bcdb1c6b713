mod builder;
mod session;
mod upsert;

#[cfg(test)]
mod fake;

pub use builder::{SqlConnector, SqlConnectorBuilder, SqlConnectorError};
pub use session::{RowCount, Session, SessionError, MAX_PARAMETERS};
pub use upsert::{
    on_conflict_do_nothing, on_conflict_do_update, slice_batches, Batches, ConflictMethod,
    DuckDbUpserter, PostgresUpserter, TableRef, UpsertContext, UpsertError, UpsertPath,
    UpsertRequest, Upserted, Upserter, UpserterFactory, DEFAULT_BATCH_SIZE,
};

/// Provides storage of bookkeeping records in a table.
pub mod repository;

/// Provides bookkeeping services over a repository.
pub mod service;

/// Provides SQL-specific functionality.
pub mod sql;

#[cfg(any(feature = "postgres", feature = "duckdb"))]
mod providers;

#[cfg(feature = "duckdb")]
/// Provides sessions using DuckDB.
pub use providers::duckdb;

#[cfg(feature = "postgres")]
/// Provides sessions using PostgreSQL.
pub use providers::postgres;

cfg_if::cfg_if! {
    if #[cfg(any(feature = "postgres", feature = "duckdb"))] {
        pub(crate) trait BoxErr<T> {
            fn box_err(self) -> Result<T, SessionError>;
        }

        impl<T, E: std::error::Error + Send + Sync + 'static> BoxErr<T> for Result<T, E> {
            fn box_err(self) -> Result<T, SessionError> {
                self.map_err(|e| SessionError::Database(Box::new(e)))
            }
        }
    }
}
