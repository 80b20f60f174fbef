// ABOUTME: Routine planner HTTP server binary
// ABOUTME: Loads configuration, opens the database, and serves the routine API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Routine Planner Server Binary
//!
//! Starts the HTTP API that materializes templates into scheduled routines.

use anyhow::Result;
use clap::Parser;
use routine_planner::{
    config::{environment::ServerConfig, DatabaseUrl},
    database::Database,
    logging,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "routine-planner-server")]
#[command(about = "Routine Planner - template materialization and routine scheduling API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = DatabaseUrl::parse_url(&database_url)?;
    }

    logging::init_from_env()?;

    info!("Starting Routine Planner");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!(
        "Database initialized successfully: {}",
        config.database_url.to_connection_string()
    );

    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));

    info!("Available endpoints:");
    info!("  POST /api/routines/from-template");
    info!("  GET  /api/routines/:id/schedule");
    info!("  GET  /health, /ready");

    if let Err(e) = server::serve(resources).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
