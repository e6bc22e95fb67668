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

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use fitbro_api_client::{ApiError, TokenSource};
use fitbro_types::{AuthUser, Persistence};
use log::{error, info};

use super::provider::{FederatedProvider, IdentityProvider, ProviderError};
use crate::error::AuthError;

/// Thin wrapper over the identity provider.
///
/// Provider errors are logged and passed through unchanged; nothing is
/// retried. The client never navigates: successful sign-in or sign-out
/// reaches the rest of the app through the provider's session listener,
/// which [`SessionContext`](super::SessionContext) owns.
#[derive(Clone)]
pub struct AuthClient {
    provider: Rc<dyn IdentityProvider>,
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient").finish_non_exhaustive()
    }
}

impl AuthClient {
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Email/password sign-in with local persistence.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let result = async {
            self.provider.set_persistence(Persistence::Local).await?;
            self.provider
                .sign_in_with_email_and_password(email, password)
                .await
        }
        .await;
        log_outcome("Login", result).map_err(AuthError::from)
    }

    /// Google popup sign-in with local persistence.
    pub async fn google_login(&self) -> Result<AuthUser, AuthError> {
        let result = async {
            self.provider.set_persistence(Persistence::Local).await?;
            self.provider
                .sign_in_with_popup(FederatedProvider::Google)
                .await
        }
        .await;
        log_outcome("Google login", result).map_err(AuthError::from)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let result = self
            .provider
            .create_user_with_email_and_password(email, password)
            .await;
        log_outcome("Signup", result).map_err(AuthError::from)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        match self.provider.sign_out().await {
            Ok(()) => {
                info!("Logout successful");
                Ok(())
            }
            Err(e) => {
                error!("Logout error: {}", e.message);
                Err(e.into())
            }
        }
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.provider
            .send_password_reset_email(email)
            .await
            .map_err(|e| {
                error!("Password reset error: {}", e.message);
                e.into()
            })
    }

    pub async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        let user = self.provider.current_user().ok_or(AuthError::NoCurrentUser)?;
        self.provider
            .update_password(&user, new_password)
            .await
            .map_err(AuthError::from)
    }

    /// The current user's ID token, or `None` when nobody is signed in.
    pub async fn get_token(&self, force_refresh: bool) -> Result<Option<String>, AuthError> {
        let Some(user) = self.provider.current_user() else {
            return Ok(None);
        };
        let token = self.provider.get_id_token(&user, force_refresh).await?;
        Ok(Some(token))
    }

    pub fn is_authenticated(&self) -> bool {
        self.provider.current_user().is_some()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.provider.current_user()
    }

    pub(crate) fn provider(&self) -> Rc<dyn IdentityProvider> {
        Rc::clone(&self.provider)
    }
}

fn log_outcome(
    what: &str,
    result: Result<AuthUser, ProviderError>,
) -> Result<AuthUser, ProviderError> {
    match &result {
        Ok(user) => info!(
            "{what} successful: {}",
            user.email.as_deref().unwrap_or(&user.uid)
        ),
        Err(e) => error!("{what} error: {}", e.message),
    }
    result
}

#[async_trait(?Send)]
impl TokenSource for AuthClient {
    async fn bearer_token(&self) -> Result<Option<String>, ApiError> {
        self.get_token(false)
            .await
            .map_err(|e| ApiError::Token(e.to_string()))
    }
}
