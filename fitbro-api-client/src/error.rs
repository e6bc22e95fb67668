/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Error types for the coaching API client.

use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401). The caller should
    /// send the user back through sign-in.
    #[error("Authentication failed. Please log in again.")]
    Unauthorized,

    /// Any other non-success status. `message` comes from the response body
    /// when the backend provided one.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The token source could not produce a token.
    #[error("Could not obtain an auth token: {0}")]
    Token(String),

    /// A network or transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request body could not be encoded or the response body decoded.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration error (e.g. an unusable base URL).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True when the only sensible recovery is signing in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
