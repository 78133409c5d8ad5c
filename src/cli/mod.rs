//! Command line entry point
//!
//! With no flags the binary reads `./data`, caches vectors in `vectors.db`
//! and asks questions on stdin until `quit`.

pub mod repl;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::App;

/// Docs RAG - ask questions about a folder of local documents
#[derive(Debug, Parser)]
#[command(name = "docs-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the documents to index
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// SQLite file used as the vector cache
    #[arg(long)]
    pub cache_path: Option<PathBuf>,

    /// Extra configuration file layered over config/default and config/local
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load configuration and apply the flags on top of it
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config =
            AppConfig::load(self.config.as_deref()).context("Failed to load configuration")?;

        if let Some(ref data_dir) = self.data_dir {
            config.documents.data_dir = data_dir.clone();
        }
        if let Some(ref cache_path) = self.cache_path {
            config.cache.path = cache_path.clone();
        }

        Ok(config)
    }
}

/// Ingest the data directory, then answer questions from stdin
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = cli.load_config()?;
    logging::init_logging(&config.logging);

    info!(
        data_dir = %config.documents.data_dir.display(),
        cache = %config.cache.path.display(),
        "Starting docs-rag"
    );

    let app = App::from_config(config)?;
    app.run(std::io::stdin().lock(), std::io::stdout().lock())
        .await?;

    Ok(())
}
