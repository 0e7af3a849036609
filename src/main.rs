use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use cover_compositor::{
    api::{server::run_server, AppState},
    catalog::ModelCatalog,
    config::Config,
    storage::Storage,
};

#[derive(Parser)]
#[command(
    name = "cover-compositor",
    version,
    about = "Composite user photos into chroma-keyed phone cover templates",
    long_about = "Cover-Compositor serves a small REST API for managing phone cover templates and generating cover mockups: upload a photo and a model name, and the green placeholder region of that model's template is replaced with your photo."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding uploads, templates, and generated covers
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Cover-Compositor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    // Bootstrap storage folders and the model catalog
    let storage = Storage::new(&cli.data_dir, &config.storage);
    storage.ensure_folders()?;

    let catalog_path = cli.data_dir.join(&config.storage.catalog_file);
    let catalog = ModelCatalog::load_or_create(catalog_path)?;

    let state = AppState::new(catalog, storage);

    run_server(&config.server, state).await?;

    info!("Cover-Compositor stopped");
    Ok(())
}
