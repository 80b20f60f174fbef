// ABOUTME: Main library entry point for the routine planner service
// ABOUTME: Materializes workout templates into user routines and schedules them on a calendar
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Routine Planner
//!
//! Turns a coach's reusable workout template into a routine owned by one
//! user, then projects that routine onto concrete future calendar dates.
//!
//! ## Architecture
//!
//! - **Routines**: pure domain logic (blueprint normalization, validation,
//!   date projection, result assembly)
//! - **Services**: the materialization pipeline over the database
//! - **Database**: `SQLite` stores for templates, catalog, routines, schedules
//! - **Routes**: thin axum handlers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use routine_planner::config::environment::ServerConfig;
//! use routine_planner::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Routine planner configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Acting-user resolution
pub mod auth;

/// Environment-based configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (tracing, CORS)
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Routine domain logic
pub mod routines;

/// HTTP server assembly
pub mod server;

/// Domain services orchestrating stores and domain logic
pub mod services;
