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

//! REST client for the FitBro coaching backend.
//!
//! Every request carries `Authorization: Bearer <token>` pulled from a
//! [`TokenSource`] at send time, so a refreshed token is picked up without
//! rebuilding the client. Works on WASM and native targets via [`reqwest`].
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use fitbro_api_client::{ApiClient, ApiConfig, StaticToken};
//!
//! # async fn example() -> Result<(), fitbro_api_client::ApiError> {
//! let client = ApiClient::new(ApiConfig::from_env()?, Rc::new(StaticToken::new("eyJ...")));
//! let sessions: serde_json::Value = client.get("/sessions").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod token;

pub use config::ApiConfig;
pub use error::ApiError;
pub use reqwest::Method;
pub use token::{StaticToken, TokenSource};

use std::fmt;
use std::rc::Rc;

use fitbro_types::ErrorBody;
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A one-shot JSON client: no retry, no timeout, no caching.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    tokens: Rc<dyn TokenSource>,
    http: Client,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig, tokens: Rc<dyn TokenSource>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the parsed JSON response.
    ///
    /// A 401 maps to [`ApiError::Unauthorized`]; any other non-success status
    /// maps to [`ApiError::Request`] with the body's `message` field, or a
    /// generic message when there is none. An empty success body yields
    /// [`Value::Null`].
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let authorization = self
            .tokens
            .bearer_token()
            .await?
            .map(|token| format!("Bearer {token}"))
            .unwrap_or_default();

        let mut builder = self
            .http
            .request(method.clone(), self.url(endpoint))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization);
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        debug!("{method} {endpoint}");
        let response = builder.send().await?;
        parse_response(response).await
    }

    /// `GET` and decode the response.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send_typed(endpoint, Method::GET, None).await
    }

    /// `POST` a JSON body and decode the response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.send_typed(endpoint, Method::POST, Some(&body)).await
    }

    /// `PUT` a JSON body and decode the response.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.send_typed(endpoint, Method::PUT, Some(&body)).await
    }

    /// `PATCH` a JSON body and decode the response.
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.send_typed(endpoint, Method::PATCH, Some(&body)).await
    }

    /// `DELETE` and decode the response.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send_typed(endpoint, Method::DELETE, None).await
    }

    async fn send_typed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let value = self.request(endpoint, method, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

async fn parse_response(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        warn!("backend rejected the bearer token");
        return Err(ApiError::Unauthorized);
    }

    let bytes = response.bytes().await?;
    if !status.is_success() {
        let message = ErrorBody::from_slice(&bytes).message_or_default();
        warn!("backend returned {status}: {message}");
        return Err(ApiError::Request {
            status: status.as_u16(),
            message,
        });
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
