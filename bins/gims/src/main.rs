//! GIMS command line.
//!
//! Loads the book from the configured store, runs one command and persists
//! the book again if the command changed it.

mod cli;

use clap::Parser;
use gims_shared::AppConfig;
use gims_store::BookRepository;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let repository = BookRepository::open(&config)?;
    let mut book = repository.load()?;

    if args.run(&mut book)? {
        repository.persist(&book)?;
        info!("Book saved");
    }

    Ok(())
}
