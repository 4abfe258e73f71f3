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


//! Error types for policy loading and enforcement

use hms_core::HmsError;
use thiserror::Error;

/// Errors that can occur while loading or enforcing access policy.
///
/// Plain queries never produce these; they fail closed instead.
#[derive(Error, Debug)]
pub enum SecurityError {
    /// Policy tables failed validation
    #[error("Invalid policy table: {0}")]
    InvalidTable(String),

    /// An identifier outside the known roles, resources, or actions
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationError(String),

    /// Configuration could not be read or was malformed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading a policy file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Policy JSON could not be parsed
    #[error("Policy serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generic internal error
    #[error("Internal security error: {0}")]
    InternalError(String),
}

impl From<HmsError> for SecurityError {
    fn from(err: HmsError) -> Self {
        match err {
            HmsError::UnknownIdentifier { kind, value } => {
                SecurityError::UnknownIdentifier(format!("{} '{}'", kind, value))
            }
            HmsError::ConfigError(msg) => SecurityError::ConfigError(msg),
            HmsError::IoError(e) => SecurityError::Io(e),
            HmsError::SerdeError(e) => SecurityError::Serde(e),
            HmsError::PolicyViolation(msg) => SecurityError::AuthorizationError(msg),
            HmsError::ValidationError { context, message } => {
                SecurityError::InvalidTable(format!("{}: {}", context, message))
            }
            HmsError::InternalError(msg) => SecurityError::InternalError(msg),
        }
    }
}

impl From<SecurityError> for HmsError {
    fn from(err: SecurityError) -> Self {
        match err {
            SecurityError::AuthorizationError(msg) => HmsError::PolicyViolation(msg),
            SecurityError::ConfigError(msg) => HmsError::ConfigError(msg),
            SecurityError::InvalidTable(msg) => HmsError::ValidationError {
                context: "policy tables".to_string(),
                message: msg,
            },
            SecurityError::Io(e) => HmsError::IoError(e),
            SecurityError::Serde(e) => HmsError::SerdeError(e),
            other => HmsError::InternalError(format!("Security error: {}", other)),
        }
    }
}
