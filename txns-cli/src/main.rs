mod cli;
mod loader;
mod logger;

use clap::Parser;
use cli::{Cli, Commands};
use loader::LoadOptions;
use std::error::Error;
use tracing::{info, level_filters::LevelFilter};
use txns_sql::SqlConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    logger::setup_logger(if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    });

    match cli.command {
        Commands::Load {
            table,
            file,
            url,
            schema,
            on_conflict,
            batch_size,
            tolerance,
            delimiter,
        } => {
            let delimiter = u8::try_from(delimiter)
                .map_err(|_| format!("the delimiter '{delimiter}' is not a single byte"))?;
            let mut builder = SqlConnector::builder();

            if let Some(url) = url {
                builder = builder.url(url);
            }

            let connector = builder.build()?;
            let options = LoadOptions {
                schema,
                on_conflict,
                batch_size,
                tolerance,
            };
            let upserted = loader::load_file(&connector, &table, &file, delimiter, &options).await?;

            info!(
                table = %table,
                rows = upserted.rows(),
                estimated = upserted.estimated(),
                "load completed"
            );
        }
        Commands::Tables => {
            for schema in txns::model::schemas() {
                println!("{}", schema.name());

                for column in schema.columns() {
                    let key = if column.primary_key() { " (key)" } else { "" };
                    println!("  {}: {:?}{}", column.name(), column.kind(), key);
                }
            }
        }
    }

    Ok(())
}
