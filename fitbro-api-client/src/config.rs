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

//! API client configuration loaded from environment variables.

use std::env;

use crate::error::ApiError;

/// Base URL used when `FITBRO_API_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix for every endpoint, without a trailing slash.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must be http(s), got '{base_url}'"
            )));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Load configuration from the environment.
    ///
    /// # Optional
    /// - `FITBRO_API_URL` (default: `"http://localhost:5000/api"`)
    pub fn from_env() -> Result<Self, ApiError> {
        match env::var("FITBRO_API_URL").ok().filter(|s| !s.trim().is_empty()) {
            Some(url) => Self::new(&url),
            None => Ok(Self::default()),
        }
    }
}
