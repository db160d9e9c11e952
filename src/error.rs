//! Error types for FOLIO connection configuration.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that bad
//! connection details are rejected before any request is made.
//!
//! # Example
//!
//! ```rust
//! use folio_client::{Tenant, ConfigError};
//!
//! let result = Tenant::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyTenant)));
//! ```

use thiserror::Error;

/// Errors that can occur while building [`FolioParams`](crate::FolioParams).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Tenant id cannot be empty.
    #[error("Tenant cannot be empty. Please provide the FOLIO tenant id (e.g., 'diku').")]
    EmptyTenant,

    /// Username cannot be empty.
    #[error("Username cannot be empty. Please provide a FOLIO username.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty. Please provide the password for the FOLIO user.")]
    EmptyPassword,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an http(s) URL (e.g., 'https://folio.example.org').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the parameters.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
