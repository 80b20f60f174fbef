// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Provides protocol-agnostic services that orchestrate stores and domain logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin: they extract the acting user and request body,
//! then delegate here so the same rules apply regardless of entry point.

/// Template materialization and routine scheduling
pub mod routine_templates;
