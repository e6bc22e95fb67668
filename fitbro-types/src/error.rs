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

//! Error payloads returned by the coaching backend.

use serde::{Deserialize, Serialize};

/// Fallback text used when a failed response carries no `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Body of a failed backend response.
///
/// The backend is not consistent about the shape of its error bodies, so every
/// field is optional and unknown fields are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, tolerating empty or non-JSON payloads.
    pub fn from_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// The user-facing message, or [`DEFAULT_ERROR_MESSAGE`].
    pub fn message_or_default(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string()
    }
}
