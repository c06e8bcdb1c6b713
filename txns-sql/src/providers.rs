#[cfg(feature = "duckdb")]
/// Provides SQL sessions for DuckDB.
pub mod duckdb;

#[cfg(feature = "postgres")]
/// Provides SQL sessions for PostgreSQL.
pub mod postgres;
