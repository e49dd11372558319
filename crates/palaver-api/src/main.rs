//! Palaver relay server entry point.
//!
//! Binary name: `palaver`
//!
//! Parses CLI arguments, initializes the database and services, then serves
//! the HTTP/WebSocket surface until shutdown.

mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "palaver", version)]
#[command(about = "Real-time chat relay with durable room transcripts")]
struct Cli {
    /// Address to bind the HTTP/WebSocket listener to.
    #[arg(long, default_value = "127.0.0.1:8080", env = "PALAVER_BIND")]
    bind: String,

    /// SQLite database URL (defaults to a file under PALAVER_DATA_DIR).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,palaver_api=debug,palaver_core=debug,palaver_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => {
            let data_dir = palaver_infra::sqlite::pool::default_data_dir();
            tokio::fs::create_dir_all(&data_dir).await?;
            palaver_infra::sqlite::pool::default_database_url()
        }
    };

    let state = AppState::init(&database_url).await?;
    let app = http::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!(addr = %cli.bind, "palaver listening");
    axum::serve(listener, app).await?;

    Ok(())
}
