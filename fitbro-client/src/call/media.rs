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

//! Camera and microphone capture.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl MediaConstraints {
    pub fn camera_and_microphone() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Opaque handle to a live capture. Must be handed back to
/// [`MediaCapture::release`] to stop the tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMedia {
    pub id: String,
    pub audio: bool,
    pub video: bool,
}

/// Capture failure, e.g. `NotAllowedError` when the user denies access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{name}: {message}")]
pub struct MediaError {
    pub name: String,
    pub message: String,
}

impl MediaError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait(?Send)]
pub trait MediaCapture {
    async fn request_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<CapturedMedia, MediaError>;

    /// Stop every track of `media`.
    fn release(&self, media: &CapturedMedia);
}
