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

//! Where the client gets its bearer token from.

use async_trait::async_trait;

use crate::error::ApiError;

/// Supplies the bearer token attached to every request.
///
/// `Ok(None)` means "nobody is signed in"; the request is still sent, with an
/// empty `Authorization` header, and the backend decides.
#[async_trait(?Send)]
pub trait TokenSource {
    async fn bearer_token(&self) -> Result<Option<String>, ApiError>;
}

/// A fixed token, for CLI tools and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait(?Send)]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.0.clone())
    }
}
