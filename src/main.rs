// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use folio::FolioConfig;
use folio::client::{LaunchOptions, Repl};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Answer questions about a designer's portfolio")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the chat API server
    Serve {
        /// Bind host (overrides FOLIO_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides FOLIO_PORT)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Knowledge store sqlite URL (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Chat with a running server from the terminal
    Chat {
        /// Page URL the client is opened at; `?hideButton=true` hides the banner
        #[arg(long, env = "FOLIO_SERVER_URL", default_value = "http://localhost:3001/")]
        url: String,

        /// Chat endpoint, relative to --url unless absolute
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap so `env = ...` args see it
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Initialize logging: RUST_LOG wins over FOLIO_LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("FOLIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    });
    fmt().with_env_filter(filter).init();

    match args.command {
        Command::Serve {
            host,
            port,
            database_url,
        } => {
            let mut config = FolioConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database_url) = database_url {
                config.database_url = database_url;
            }
            folio::server::run(config).await
        }
        Command::Chat { url, endpoint } => {
            let options = LaunchOptions::resolve(&url, endpoint.as_deref())?;
            Repl::new(options)?.run().await
        }
    }
}
