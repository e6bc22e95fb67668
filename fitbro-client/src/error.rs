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

//! Error types surfaced to the user.
//!
//! Every variant's `Display` text is meant to be shown as-is. Nothing here is
//! retried automatically; the user may simply try the action again.

use fitbro_api_client::ApiError;
use thiserror::Error;

use crate::auth::ProviderError;

/// Credential and session failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity provider rejected the call. The provider's message is
    /// passed through unchanged.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The operation needs a signed-in user and there is none.
    #[error("No user is signed in.")]
    NoCurrentUser,

    /// Registration refused locally before reaching the provider.
    #[error("Password must contain {0}.")]
    WeakPassword(String),
}

/// Failures of the video-call session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Please enter both your name and the join code.")]
    MissingFields,

    #[error("Video call service is not ready yet. Please try again in a moment.")]
    EngineNotReady,

    #[error("You are already in this call.")]
    AlreadyInCall,

    /// The SDK asset failed to load or the engine could not be constructed.
    #[error("Failed to load video call service. Please try again later.")]
    EngineInit(String),

    /// Camera or microphone access was denied.
    #[error("Please allow camera and microphone access to join the call.")]
    MediaPermission(String),

    /// An engine call was rejected.
    #[error("Failed to {operation}. Please try again.")]
    EngineOperation {
        operation: &'static str,
        message: String,
    },

    /// The call was left before the join finished.
    #[error("The call was left before joining completed.")]
    JoinCancelled,
}

impl CallError {
    /// Underlying detail for logs, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CallError::EngineInit(detail) | CallError::MediaPermission(detail) => Some(detail),
            CallError::EngineOperation { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Umbrella error for application code that drives several components.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Call(#[from] CallError),
}

impl ClientError {
    /// True when the user has to sign in again before retrying.
    pub fn requires_sign_in(&self) -> bool {
        match self {
            ClientError::Auth(AuthError::NoCurrentUser) => true,
            ClientError::Api(err) => err.is_unauthorized(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_passes_through() {
        let err = AuthError::from(ProviderError::new(
            "auth/wrong-password",
            "Firebase: Error (auth/wrong-password).",
        ));
        assert_eq!(err.to_string(), "Firebase: Error (auth/wrong-password).");
    }

    #[test]
    fn engine_operation_hides_detail_from_display() {
        let err = CallError::EngineOperation {
            operation: "publish the stream",
            message: "1103064 publish timeout".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to publish the stream. Please try again.");
        assert_eq!(err.detail(), Some("1103064 publish timeout"));
    }

    #[test]
    fn sign_in_required_for_401_and_missing_user() {
        assert!(ClientError::from(ApiError::Unauthorized).requires_sign_in());
        assert!(ClientError::from(AuthError::NoCurrentUser).requires_sign_in());
        assert!(!ClientError::from(CallError::MissingFields).requires_sign_in());
        assert!(!ClientError::from(ApiError::Request {
            status: 500,
            message: "boom".into()
        })
        .requires_sign_in());
    }
}
