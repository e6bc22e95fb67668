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

//! Framework-agnostic event types for the FitBro client.
//!
//! These events are emitted via the event bus and can be subscribed to by any
//! frontend (Yew, Dioxus, Leptos, a JS shell via wasm-bindgen, ...).

use fitbro_types::AuthStatus;

use crate::call::UpdateType;

/// Events emitted by the session context and the call session.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientEvent {
    // === Auth Events ===
    /// The auth session moved to a new state. `uid` is set when authenticated.
    SessionChanged {
        status: AuthStatus,
        uid: Option<String>,
    },

    // === Call Events ===
    /// The local stream is published and the room is joined
    CallJoined {
        room_code: String,
        participant_id: String,
    },

    /// The call was left and every media resource released
    CallLeft { room_code: String },

    /// A call operation failed; the text is user-facing
    CallFailed(String),

    /// Playback of a remote stream started
    RemoteStreamStarted(String),

    /// Playback of a remote stream stopped
    RemoteStreamStopped(String),

    /// Users entered or left the room
    ParticipantsUpdated {
        room_code: String,
        update: UpdateType,
        user_ids: Vec<String>,
    },
}
