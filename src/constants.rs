// ABOUTME: System-wide constants for the routine planner service
// ABOUTME: Scheduling defaults and limits, exercise defaults, and service identity values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Application constants grouped by domain, plus the environment lookups
//! that have a hardcoded fallback.

use std::env;

/// Service identity used in logs and health responses
pub mod service_names {
    /// Default service name
    pub const ROUTINE_PLANNER: &str = "routine-planner";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Limits and defaults for projecting routine occurrences onto a calendar
pub mod scheduling {
    /// Weeks scheduled when the request does not say otherwise
    pub const DEFAULT_SCHEDULE_WEEKS: u32 = 4;

    /// Smallest accepted week count
    pub const MIN_SCHEDULE_WEEKS: u32 = 1;

    /// Largest accepted week count
    pub const MAX_SCHEDULE_WEEKS: u32 = 12;

    /// Lowest weekday number (Sunday)
    pub const MIN_WEEKDAY: u8 = 0;

    /// Highest weekday number (Saturday)
    pub const MAX_WEEKDAY: u8 = 6;

    /// Days in a week
    pub const DAYS_PER_WEEK: i64 = 7;

    /// Monday through Friday, used when neither the request nor the exercises name a weekday
    pub const DEFAULT_WEEKDAYS: [u8; 5] = [1, 2, 3, 4, 5];
}

/// Values applied to template exercise descriptors that omit a field
pub mod exercise_defaults {
    /// Sets when the descriptor has none
    pub const SETS: i64 = 3;

    /// Weight when the descriptor has none
    pub const WEIGHT: f64 = 0.0;

    /// Display order when the descriptor has none
    pub const DISPLAY_ORDER: i64 = 1;

    /// Name of the wrapped list field inside an object-shaped blueprint
    pub const BLUEPRINT_LIST_FIELD: &str = "exercises";
}

/// Request fields of the routine-from-template operation
pub mod request_fields {
    /// Template identifier
    pub const TEMPLATE_ID: &str = "template_id";
    /// Week count override
    pub const SCHEDULE_WEEKS: &str = "schedule_weeks";
    /// Weekday override
    pub const SCHEDULE_DAYS_OF_WEEK: &str = "schedule_days_of_week";
    /// Start date override
    pub const SCHEDULE_START_DATE: &str = "schedule_start_date";
}

/// Header carrying the acting user resolved by upstream authentication
pub const USER_ID_HEADER: &str = "x-user-id";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/routines.db";

/// Environment-based configuration
pub mod env_config {
    use super::{env, DEFAULT_DATABASE_URL, DEFAULT_HTTP_PORT};

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HTTP_PORT)
    }

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned())
    }
}
