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

//! The identity-provider seam.
//!
//! A browser build implements [`IdentityProvider`] on top of the hosted auth
//! SDK; tests implement it in memory. Everything above this trait is
//! provider-agnostic.

use async_trait::async_trait;
use fitbro_types::{AuthUser, Persistence};
use thiserror::Error;

/// Callback invoked with the new user (or `None`) whenever the provider's
/// session changes. Providers fire it once shortly after registration too.
pub type AuthListener = Box<dyn Fn(Option<AuthUser>)>;

/// Handle returned by [`IdentityProvider::on_auth_state_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Federated sign-in methods offered on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

/// An error reported by the identity provider.
///
/// `message` is the provider's own text and is displayed unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider error code, e.g. `auth/wrong-password`.
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[async_trait(?Send)]
pub trait IdentityProvider {
    async fn set_persistence(&self, persistence: Persistence) -> Result<(), ProviderError>;

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError>;

    /// Federated sign-in through a popup window.
    async fn sign_in_with_popup(
        &self,
        provider: FederatedProvider,
    ) -> Result<AuthUser, ProviderError>;

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    async fn send_password_reset_email(&self, email: &str) -> Result<(), ProviderError>;

    async fn update_password(&self, user: &AuthUser, new_password: &str)
        -> Result<(), ProviderError>;

    fn current_user(&self) -> Option<AuthUser>;

    async fn get_id_token(
        &self,
        user: &AuthUser,
        force_refresh: bool,
    ) -> Result<String, ProviderError>;

    fn on_auth_state_changed(&self, listener: AuthListener) -> ListenerId;

    fn remove_auth_state_listener(&self, id: ListenerId);
}
