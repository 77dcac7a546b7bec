use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crawlboard::models::ServerConfig;
use crawlboard::server;

/// Crawlboard - web crawl dashboard backend
#[derive(Parser, Debug)]
#[command(name = "crawlboard", version, about = "Web crawl dashboard backend")]
struct Cli {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value_t = 8080)]
    port: u16,

    /// Data directory path
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        data_dir: cli.data_dir,
        ..ServerConfig::default()
    };

    if let Err(e) = server::serve(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
