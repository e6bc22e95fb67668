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

//! Identity types pushed by the identity provider.

use serde::{Deserialize, Serialize};

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Provider-assigned stable user id.
    pub uid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Last ID token the provider attached to the user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            id_token: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }
}

/// Lifecycle of the process-wide auth session.
///
/// `Uninitialized -> Loading -> {Authenticated, Anonymous}`; after the first
/// provider callback the state only moves between the two resolved variants.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

impl AuthStatus {
    /// True until the provider has reported for the first time.
    pub fn is_pending(self) -> bool {
        matches!(self, AuthStatus::Uninitialized | AuthStatus::Loading)
    }
}

/// Where the identity provider keeps its session between page loads.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Survives browser restarts.
    Local,
    /// Cleared when the tab closes.
    Session,
    /// In-memory only.
    None,
}
