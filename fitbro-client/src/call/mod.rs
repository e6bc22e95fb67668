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

//! Video-call session: the RTC engine seam, media capture, lazy SDK loading
//! and the call-lifecycle state machine driven by the session page.

mod engine;
mod loader;
mod media;
mod session;

pub use engine::{
    EngineError, EngineEvent, EngineEventReceiver, EngineEventSender, LogLevel, RoomConfig,
    RoomState, RoomUser, RtcEngine, RtcSdk, StreamHandle, StreamInfo, UpdateType,
};
pub use loader::SdkLoader;
pub use media::{CapturedMedia, MediaCapture, MediaConstraints, MediaError};
pub use session::{CallPhase, CallSession, CallSnapshot};
