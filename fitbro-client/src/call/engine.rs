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

//! The real-time engine seam.
//!
//! [`RtcSdk`] is the lazily loaded SDK asset; [`RtcEngine`] is one engine
//! instance built from it. Engine-pushed notifications are delivered as
//! [`EngineEvent`]s on the channel handed to [`RtcSdk::create_engine`].

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use async_trait::async_trait;
use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::media::CapturedMedia;

/// Opaque reference to a stream owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamHandle {
    pub stream_id: String,
}

impl StreamHandle {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

/// Entry of a room stream list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub stream_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl StreamInfo {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            user_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateType {
    Add,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Connecting,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUser {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomConfig {
    /// Ask the engine for `RoomUserUpdate` notifications.
    pub user_update: bool,
}

/// Notifications pushed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RoomStreamUpdate {
        room_id: String,
        update: UpdateType,
        streams: Vec<StreamInfo>,
    },
    RoomStateUpdate {
        room_id: String,
        state: RoomState,
        error_code: i32,
    },
    RoomUserUpdate {
        room_id: String,
        update: UpdateType,
        users: Vec<RoomUser>,
    },
}

pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;
pub type EngineEventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// An error reported by the SDK or an engine call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("engine error {code}: {message}")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Engine-side log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Disable,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Disable => "disable",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "disable" | "off" => Ok(LogLevel::Disable),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// One engine instance, scoped to an application id.
#[async_trait(?Send)]
pub trait RtcEngine {
    fn set_log_level(&self, level: LogLevel) -> Result<(), EngineError>;

    async fn login_room(
        &self,
        room_id: &str,
        token: &str,
        user: &RoomUser,
        config: RoomConfig,
    ) -> Result<(), EngineError>;

    async fn logout_room(&self, room_id: &str) -> Result<(), EngineError>;

    /// Build an outbound stream from a platform capture.
    async fn create_stream(
        &self,
        stream_id: &str,
        media: &CapturedMedia,
    ) -> Result<StreamHandle, EngineError>;

    fn destroy_stream(&self, stream: &StreamHandle) -> Result<(), EngineError>;

    async fn start_publishing_stream(&self, stream: &StreamHandle) -> Result<(), EngineError>;

    fn stop_publishing_stream(&self, stream_id: &str) -> Result<(), EngineError>;

    async fn start_playing_stream(&self, stream_id: &str) -> Result<StreamHandle, EngineError>;

    fn stop_playing_stream(&self, stream_id: &str) -> Result<(), EngineError>;

    fn mute_publish_stream_audio(&self, stream_id: &str, mute: bool) -> Result<(), EngineError>;

    fn mute_publish_stream_video(&self, stream_id: &str, mute: bool) -> Result<(), EngineError>;
}

/// The SDK asset the engine comes from.
#[async_trait(?Send)]
pub trait RtcSdk {
    /// True when the SDK is already present in this process (e.g. a previous
    /// page loaded the script).
    fn is_available(&self) -> bool;

    /// Fetch and evaluate the SDK asset.
    async fn load(&self, url: &str) -> Result<(), EngineError>;

    /// Construct an engine. Its notifications are sent on `events`.
    fn create_engine(
        &self,
        app_id: u32,
        environment: u8,
        events: EngineEventSender,
    ) -> Result<Rc<dyn RtcEngine>, EngineError>;
}
