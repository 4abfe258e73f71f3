// Copyright 2024 Helix Platform
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


#![warn(missing_docs)]

//! Role-based access control for the hospital management front end.
//!
//! This crate provides:
//! - The permission matrix, role hierarchy, route-access and feature tables
//! - A fail-closed policy engine over those tables
//! - Wildcard route resolution
//! - A navigation guard for protected routes
//! - Environment-driven configuration

pub mod config;
pub mod errors;
pub mod guard;
pub mod policies;
pub mod routes;
pub mod tables;

pub use config::EngineConfig;
pub use errors::SecurityError;
pub use guard::{GuardConfig, RouteDecision, RouteGuard};
pub use hms_core::AccessPolicy;
pub use policies::PolicyEngine;
pub use routes::{RouteAccessMap, RouteMatchStrategy, RouteRule};
pub use tables::{PolicyTables, DEFAULT_TABLES};
