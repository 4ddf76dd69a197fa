//! Grove - service of record for the eco-living platform

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grove::{
    ai::GeminiClient,
    config::Args,
    db::{MongoClient, Stores},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("grove={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Grove - eco-living service of record");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!(
        "Mode: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
    );
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Model backend: {}", args.model_api_base);
    info!("Admin accounts: {}", args.admin_email_list().len());
    info!("======================================");

    // Connect to MongoDB (optional in dev mode)
    let stores = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => match Stores::init(&client).await {
            Ok(stores) => {
                info!("MongoDB connected, stores initialized");
                Some(stores)
            }
            Err(e) => {
                error!("Store initialization failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB connection failed (dev mode, continuing without): {}", e);
                None
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Seed the action catalog on first boot
    if let Some(ref stores) = stores {
        if let Err(e) = stores.actions.seed_defaults().await {
            warn!("Action catalog seeding failed: {}", e);
        }
    }

    // Build the model backend client (optional in dev mode)
    let model = match &args.model_api_key {
        Some(key) => {
            let timeout = Duration::from_millis(args.request_timeout_ms);
            match GeminiClient::new(&args.model_api_base, key, timeout) {
                Ok(client) => {
                    info!("Model backend configured ({})", args.model_api_base);
                    Some(Arc::new(client) as Arc<dyn grove::ai::GenerativeModel>)
                }
                Err(e) => {
                    error!("Model backend configuration failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            if args.dev_mode {
                warn!("No MODEL_API_KEY set (dev mode, chat/classify disabled)");
                None
            } else {
                error!("MODEL_API_KEY is required in production mode");
                std::process::exit(1);
            }
        }
    };

    // Create application state
    let state = match server::AppState::new(args, stores, model) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to create application state: {}", e);
            std::process::exit(1);
        }
    };

    // Run the server
    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
