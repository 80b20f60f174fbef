// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Provides request ID generation, per-request spans, and CORS configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS layer configuration
pub mod cors;
/// Request spans and request IDs
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{create_request_span, record_response, request_id};
