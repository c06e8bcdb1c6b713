use clap::{Parser, Subcommand};
use std::path::PathBuf;
use txns::OnConflict;
use txns_sql::{service::DEFAULT_TOLERANCE, DEFAULT_BATCH_SIZE};

#[derive(Parser, Debug)]
#[clap(name = "txns", about = "Loads bookkeeping data into a SQL database", version)]
pub struct Cli {
    /// Writes debug logs.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Loads a delimited file into a table.
    ///
    /// The header of the file names the columns to load.
    ///
    /// Example:
    /// `txns load --table types --file types.csv --on-conflict update`
    #[clap(name = "load")]
    Load {
        /// The name of the target table.
        #[clap(long, short)]
        table: String,

        /// The path of the file to load.
        #[clap(long, short)]
        file: PathBuf,

        /// optional - A PostgreSQL URL or a DuckDB path, default is `.tmp/store.duckdb`.
        #[clap(long, short)]
        url: Option<String>,

        /// The database schema of the table.
        #[clap(long, short, default_value = txns::SCHEMA_NAME)]
        schema: String,

        /// The policy for rows whose primary key already exists: `nothing` or `update`.
        #[clap(long, default_value_t = OnConflict::Nothing)]
        on_conflict: OnConflict,

        /// The number of rows per statement when the bulk statement fails.
        #[clap(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// The fraction of rows that may be missing from the upsert.
        #[clap(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// The field delimiter.
        #[clap(long, short, default_value_t = ',')]
        delimiter: char,
    },

    /// Lists the known tables and their columns.
    #[clap(name = "tables")]
    Tables,
}
