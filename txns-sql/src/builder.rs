use crate::Session;
use std::{
    error::Error,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_DIR: &str = ".tmp";
const DEFAULT_FILE: &str = "store.duckdb";
const MEMORY: &str = ":memory:";

/// Represents the possible SQL connector errors.
#[derive(Error, Debug)]
pub enum SqlConnectorError {
    /// Indicates the driver for a location has not been enabled.
    #[error("the '{feature}' feature is required to connect to '{location}'")]
    MissingFeature {
        /// Gets the name of the required feature.
        feature: &'static str,

        /// Gets the location that could not be connected to.
        location: String,
    },

    /// Indicates an [I/O error](io::Error) preparing the database location.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Indicates an error reported by the database driver.
    #[error(transparent)]
    Database(Box<dyn Error + Send + Sync>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Location {
    Postgres(String),
    DuckDb(PathBuf),
    Memory,
}

impl Location {
    fn resolve(url: Option<&str>) -> Self {
        let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) else {
            return Self::DuckDb(Path::new(DEFAULT_DIR).join(DEFAULT_FILE));
        };

        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Self::Postgres(url.to_owned());
        }

        let path = url.strip_prefix("duckdb://").unwrap_or(url);

        if path == MEMORY {
            Self::Memory
        } else {
            Self::DuckDb(PathBuf::from(path))
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Postgres(_) => "postgresql".into(),
            Self::DuckDb(path) => path.display().to_string(),
            Self::Memory => MEMORY.into(),
        }
    }
}

fn prepare(path: &Path) -> io::Result<PathBuf> {
    let path = if path.is_dir() {
        path.join(DEFAULT_FILE)
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    Ok(path)
}

enum Target {
    #[cfg(feature = "postgres")]
    Postgres(sqlx::PgPool),

    #[cfg(feature = "duckdb")]
    DuckDb(std::sync::Mutex<::duckdb::Connection>),
}

/// Represents a connector that opens [sessions](Session) against a SQL database.
pub struct SqlConnector {
    target: Target,
}

impl SqlConnector {
    /// Creates and returns a new [`SqlConnectorBuilder`].
    pub fn builder() -> SqlConnectorBuilder {
        SqlConnectorBuilder::default()
    }

    /// Gets the name of the SQL dialect of the database.
    pub fn dialect(&self) -> &'static str {
        match self.target {
            #[cfg(feature = "postgres")]
            Target::Postgres(_) => "postgresql",

            #[cfg(feature = "duckdb")]
            Target::DuckDb(_) => "duckdb",
        }
    }

    /// Opens a new [session](Session).
    ///
    /// # Remarks
    ///
    /// DuckDB sessions share the database opened by the connector, so every session of an
    /// in-memory connector sees the same data.
    pub async fn session(&self) -> Result<Box<dyn Session>, SqlConnectorError> {
        match self.target {
            #[cfg(feature = "postgres")]
            Target::Postgres(ref pool) => {
                Ok(Box::new(crate::postgres::PgSession::new(pool.clone())))
            }

            #[cfg(feature = "duckdb")]
            Target::DuckDb(ref conn) => {
                let conn = conn
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .try_clone()
                    .map_err(database)?;

                Ok(Box::new(crate::duckdb::DuckDbSession::new(conn)))
            }
        }
    }
}

/// Represents a [SQL connector](SqlConnector) builder.
#[derive(Default)]
pub struct SqlConnectorBuilder {
    url: Option<String>,

    #[cfg(feature = "postgres")]
    options: Option<sqlx::postgres::PgPoolOptions>,
}

impl SqlConnectorBuilder {
    /// Configures the location of the database.
    ///
    /// # Arguments
    ///
    /// * `value` - the database location
    ///
    /// # Remarks
    ///
    /// `postgres://` and `postgresql://` URLs connect to PostgreSQL. Any other value is the
    /// path of a DuckDB database, optionally prefixed with `duckdb://`. A path to a directory
    /// refers to the `store.duckdb` file within it and `:memory:` refers to an in-memory
    /// database. Without a location, the database is stored in `.tmp/store.duckdb`.
    pub fn url<V: Into<String>>(mut self, value: V) -> Self {
        self.url = Some(value.into());
        self
    }

    #[cfg(feature = "postgres")]
    /// Configures the options for the PostgreSQL connection pool.
    ///
    /// # Arguments
    ///
    /// * `value` - the [options](sqlx::postgres::PgPoolOptions) for the connection pool
    pub fn options(mut self, value: sqlx::postgres::PgPoolOptions) -> Self {
        self.options = Some(value);
        self
    }

    /// Builds and returns a new [SQL connector](SqlConnector).
    pub fn build(mut self) -> Result<SqlConnector, SqlConnectorError> {
        let location = Location::resolve(self.url.as_deref());

        info!(location = %location.describe(), "connecting to database");

        let target = match location {
            Location::Postgres(url) => self.postgres(url)?,
            Location::DuckDb(path) => {
                let path = prepare(&path)?;
                debug!(path = %path.display(), "opening duckdb database");
                duckdb(Some(&path))?
            }
            Location::Memory => duckdb(None)?,
        };

        Ok(SqlConnector { target })
    }

    #[cfg(feature = "postgres")]
    fn postgres(&mut self, url: String) -> Result<Target, SqlConnectorError> {
        let pool = self
            .options
            .take()
            .unwrap_or_default()
            .connect_lazy(&url)
            .map_err(database)?;

        Ok(Target::Postgres(pool))
    }

    #[cfg(not(feature = "postgres"))]
    fn postgres(&mut self, url: String) -> Result<Target, SqlConnectorError> {
        Err(SqlConnectorError::MissingFeature {
            feature: "postgres",
            location: url,
        })
    }
}

#[cfg(any(feature = "postgres", feature = "duckdb"))]
fn database<E: Error + Send + Sync + 'static>(error: E) -> SqlConnectorError {
    SqlConnectorError::Database(Box::new(error))
}

#[cfg(feature = "duckdb")]
fn duckdb(path: Option<&Path>) -> Result<Target, SqlConnectorError> {
    use ::duckdb::Connection;

    let conn = match path {
        Some(path) => Connection::open(path),
        _ => Connection::open_in_memory(),
    }
    .map_err(database)?;

    Ok(Target::DuckDb(std::sync::Mutex::new(conn)))
}

#[cfg(not(feature = "duckdb"))]
fn duckdb(path: Option<&Path>) -> Result<Target, SqlConnectorError> {
    Err(SqlConnectorError::MissingFeature {
        feature: "duckdb",
        location: path.map_or_else(|| MEMORY.into(), |p| p.display().to_string()),
    })
}
