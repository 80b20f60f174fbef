// ABOUTME: Route module organization for the routine planner HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the routine planner
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Health check and readiness routes
pub mod health;
/// Routine materialization and schedule routes
pub mod routines;

/// Health check route handlers
pub use health::HealthRoutes;
/// Routine route handlers
pub use routines::RoutineRoutes;
