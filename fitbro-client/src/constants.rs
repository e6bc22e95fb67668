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

/// Application id the RTC engine is scoped to.
pub const RTC_APP_ID: u32 = 801669669;

/// Engine environment selector; `0` is production.
pub const RTC_ENVIRONMENT: u8 = 0;

pub const RTC_SDK_URL: &str = "https://web.sdk.zego.im/express/2.24.5/ZegoExpressWebRTC.min.js";

/// Room login token. Empty means the engine's test mode; production tokens are
/// minted server-side.
pub const ROOM_TOKEN: &str = "";

pub const STATUS_LOADING_SERVICE: &str = "Loading video call service...";
pub const STATUS_READY: &str = "Ready to join";
pub const STATUS_JOINING: &str = "Joining...";
pub const STATUS_WAITING_FOR_TRAINER: &str = "Waiting for trainer";
pub const STATUS_CONNECTED: &str = "Connected with trainer";
