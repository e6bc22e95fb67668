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

//! Client configuration loaded from environment variables.

use std::env;

use anyhow::{anyhow, Context, Result};
use fitbro_api_client::ApiConfig;

use crate::call::LogLevel;
use crate::constants::{RTC_APP_ID, RTC_ENVIRONMENT, RTC_SDK_URL};

/// Settings for the video-call engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallConfig {
    /// Application id the engine instance is scoped to.
    pub app_id: u32,
    /// Engine environment (0 = production).
    pub environment: u8,
    /// URL of the SDK script asset.
    pub sdk_url: String,
    /// Engine-side log level.
    pub log_level: LogLevel,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            app_id: RTC_APP_ID,
            environment: RTC_ENVIRONMENT,
            sdk_url: RTC_SDK_URL.to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl CallConfig {
    /// Load the call configuration from the environment.
    ///
    /// # Optional
    /// - `FITBRO_RTC_APP_ID` (default: `801669669`)
    /// - `FITBRO_RTC_ENV` (default: `0`)
    /// - `FITBRO_RTC_SDK_URL` (default: the 2.24.5 web SDK)
    /// - `FITBRO_RTC_LOG_LEVEL` (default: `"info"`)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let app_id = match non_empty_var("FITBRO_RTC_APP_ID") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("FITBRO_RTC_APP_ID must be a u32, got '{raw}'"))?,
            None => defaults.app_id,
        };
        let environment = match non_empty_var("FITBRO_RTC_ENV") {
            Some(raw) => raw
                .parse::<u8>()
                .with_context(|| format!("FITBRO_RTC_ENV must be a small integer, got '{raw}'"))?,
            None => defaults.environment,
        };
        let sdk_url = non_empty_var("FITBRO_RTC_SDK_URL").unwrap_or(defaults.sdk_url);
        let log_level = match non_empty_var("FITBRO_RTC_LOG_LEVEL") {
            Some(raw) => raw
                .parse::<LogLevel>()
                .map_err(|e| anyhow!("FITBRO_RTC_LOG_LEVEL: {e}"))?,
            None => defaults.log_level,
        };

        Ok(Self {
            app_id,
            environment,
            sdk_url,
            log_level,
        })
    }
}

/// Everything the client crates read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub call: CallConfig,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: ApiConfig::from_env().context("loading API configuration")?,
            call: CallConfig::from_env().context("loading call configuration")?,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
