// ABOUTME: Acting-user resolution for route handlers
// ABOUTME: Reads the user ID placed in request headers by the upstream authentication layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Tokens are verified before requests reach this service. The gateway
//! forwards the resolved identity in the `x-user-id` header; handlers call
//! [`authenticate`] to turn it into an [`AuthResult`] or a 401.

use crate::constants::USER_ID_HEADER;
use crate::errors::{AppError, AppResult, ErrorCode};
use axum::http::HeaderMap;
use uuid::Uuid;

/// The acting user of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
}

/// Resolve the acting user from request headers
///
/// # Errors
///
/// Returns an auth error when the header is missing or not a UUID
pub fn authenticate(headers: &HeaderMap) -> AppResult<AuthResult> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(AppError::auth_required)?;

    let user_id = Uuid::parse_str(raw).map_err(|_| {
        AppError::new(
            ErrorCode::AuthRequired,
            format!("Invalid {USER_ID_HEADER} header"),
        )
    })?;

    Ok(AuthResult { user_id })
}
