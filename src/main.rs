use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use toolforge::ai::GeminiClient;
use toolforge::config::{Credentials, ServerConfig};
use toolforge::remote::ShopifyClient;
use toolforge::server::{AppState, create_router};
use toolforge::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "toolforge")]
#[command(about = "A storefront tool provisioning server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// TOML file with platform and text-service credentials. When
        /// omitted, credentials are read from the environment.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("toolforge=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
            config,
        } => {
            let credentials = Credentials::load(config.as_deref())?;
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                credentials,
            };

            fs::create_dir_all(&config.data_dir)?;

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;

            let platform = ShopifyClient::new(
                config.credentials.api_key.clone(),
                config.credentials.api_secret.clone(),
            )?;
            let generator = GeminiClient::new(config.credentials.ai_api_key.clone())?;

            let state = Arc::new(AppState::new(
                Arc::new(store),
                Arc::new(platform),
                Arc::new(generator),
                config.credentials.clone(),
            ));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
