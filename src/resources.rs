// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Bundles the database and configuration behind Arc for cheap cloning into axum state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::ServerConfig;
use crate::database::Database;
use std::sync::Arc;

/// Resources shared across request handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Database connection pool and managers
    pub database: Arc<Database>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        Self {
            database: Arc::new(database),
            config,
        }
    }
}
