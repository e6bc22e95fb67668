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

//! Call-lifecycle state machine behind the video session page.
//!
//! `Idle -> Joining -> Joined -> Idle`, with `Error` reachable from any
//! failed step and cleared by [`CallSession::acknowledge_error`].
//!
//! Resource ownership follows the phase: the local stream (and the capture it
//! was built from) exists only while `Joined`, and the remote stream only
//! after the engine reported one while `Joined`. Every failure path releases
//! what it acquired before returning.
//!
//! A leave requested while a join is in flight cancels that join: the phase
//! returns to `Idle` at once and the join rolls back whatever it had acquired
//! as soon as its current engine call returns, then fails with
//! [`CallError::JoinCancelled`]. Joins are tagged with an epoch for this.
//! A room disconnect during a join aborts it the same way, but leaves the
//! session in `Error` and the join returns the disconnect error.
//!
//! Remote streams announced while the join is still running are held back
//! and played once the join completes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::channel::mpsc;
use futures::{FutureExt, StreamExt};
use log::{debug, error, info, warn};

use super::engine::{
    EngineError, EngineEvent, EngineEventReceiver, RoomConfig, RoomState, RoomUser, RtcEngine,
    StreamHandle, StreamInfo, UpdateType,
};
use super::loader::SdkLoader;
use super::media::{CapturedMedia, MediaCapture, MediaConstraints};
use crate::config::CallConfig;
use crate::constants::{
    ROOM_TOKEN, STATUS_CONNECTED, STATUS_JOINING, STATUS_LOADING_SERVICE, STATUS_READY,
    STATUS_WAITING_FOR_TRAINER,
};
use crate::error::CallError;
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;
use crate::platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Idle,
    Joining,
    Joined,
    Error,
}

/// Read-only view of the call for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSnapshot {
    pub room_code: String,
    pub display_name: String,
    pub phase: CallPhase,
    pub engine_ready: bool,
    pub participant_id: Option<String>,
    pub local_stream: Option<StreamHandle>,
    pub remote_stream: Option<StreamHandle>,
    pub mic_muted: bool,
    pub camera_off: bool,
    pub error: Option<CallError>,
}

/// Published stream plus the capture it was built from.
#[derive(Debug)]
struct LocalMedia {
    capture: CapturedMedia,
    stream: StreamHandle,
}

/// What a join has acquired so far, for rollback.
#[derive(Default)]
struct JoinProgress {
    logged_in: bool,
    capture: Option<CapturedMedia>,
    stream: Option<StreamHandle>,
    publishing: bool,
}

struct Inner {
    config: CallConfig,
    room_code: String,
    display_name: String,
    phase: CallPhase,
    engine: Option<Rc<dyn RtcEngine>>,
    events: Option<EngineEventReceiver>,
    init_error: Option<CallError>,
    participant_id: Option<String>,
    room: Option<String>,
    local: Option<LocalMedia>,
    remote_stream: Option<StreamHandle>,
    mic_muted: bool,
    camera_off: bool,
    error: Option<CallError>,
    epoch: u64,
    /// Remote streams announced during `Joining`.
    pending_streams: Vec<StreamInfo>,
    /// Why the join of a given epoch was aborted, when not by a leave.
    abort_reason: Option<(u64, CallError)>,
}

impl Inner {
    fn cancel_join(&mut self) {
        self.epoch += 1;
        self.pending_streams.clear();
    }

    fn fail(&mut self, err: CallError) {
        self.phase = CallPhase::Error;
        self.error = Some(err.clone());
        emit_client_event(ClientEvent::CallFailed(err.to_string()));
    }
}

/// The session page's call controller.
///
/// Cheap to clone; clones share the same state. No borrow of the shared
/// state is held across an engine call, so event handling, toggles and leave
/// may interleave with an in-flight join.
#[derive(Clone)]
pub struct CallSession {
    loader: SdkLoader,
    media: Rc<dyn MediaCapture>,
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for CallSession {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CallSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSession")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl CallSession {
    /// Create the session for a page mount. `room_code` pre-fills the join
    /// code from the route.
    pub fn new(
        config: CallConfig,
        loader: SdkLoader,
        media: Rc<dyn MediaCapture>,
        room_code: Option<&str>,
    ) -> Self {
        Self {
            loader,
            media,
            inner: Rc::new(RefCell::new(Inner {
                config,
                room_code: room_code.unwrap_or_default().to_string(),
                display_name: String::new(),
                phase: CallPhase::Idle,
                engine: None,
                events: None,
                init_error: None,
                participant_id: None,
                room: None,
                local: None,
                remote_stream: None,
                mic_muted: false,
                camera_off: false,
                error: None,
                epoch: 0,
                pending_streams: Vec::new(),
                abort_reason: None,
            })),
        }
    }

    pub fn snapshot(&self) -> CallSnapshot {
        let inner = self.inner.borrow();
        CallSnapshot {
            room_code: inner.room_code.clone(),
            display_name: inner.display_name.clone(),
            phase: inner.phase,
            engine_ready: inner.engine.is_some(),
            participant_id: inner.participant_id.clone(),
            local_stream: inner.local.as_ref().map(|l| l.stream.clone()),
            remote_stream: inner.remote_stream.clone(),
            mic_muted: inner.mic_muted,
            camera_off: inner.camera_off,
            error: inner.error.clone(),
        }
    }

    pub fn phase(&self) -> CallPhase {
        self.inner.borrow().phase
    }

    pub fn is_engine_ready(&self) -> bool {
        self.inner.borrow().engine.is_some()
    }

    pub fn set_room_code(&self, room_code: &str) {
        self.inner.borrow_mut().room_code = room_code.to_string();
    }

    pub fn set_display_name(&self, display_name: &str) {
        self.inner.borrow_mut().display_name = display_name.to_string();
    }

    /// One-line status for the session panel.
    pub fn status_text(&self) -> String {
        let inner = self.inner.borrow();
        match inner.phase {
            CallPhase::Joined if inner.remote_stream.is_some() => STATUS_CONNECTED.to_string(),
            CallPhase::Joined => STATUS_WAITING_FOR_TRAINER.to_string(),
            CallPhase::Joining => STATUS_JOINING.to_string(),
            CallPhase::Error => inner
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            CallPhase::Idle if inner.engine.is_some() => STATUS_READY.to_string(),
            CallPhase::Idle => STATUS_LOADING_SERVICE.to_string(),
        }
    }

    /// Load the SDK (at most once per process) and build this page's engine.
    ///
    /// A failure is terminal for this session: later calls return the same
    /// error without retrying.
    pub async fn initialize(&self) -> Result<(), CallError> {
        {
            let inner = self.inner.borrow();
            if inner.engine.is_some() {
                return Ok(());
            }
            if let Some(err) = &inner.init_error {
                return Err(err.clone());
            }
        }

        let result = match self.loader.ensure_loaded().await {
            Ok(()) => self.create_engine(),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            error!(
                "Failed to initialize RTC engine: {}",
                err.detail().unwrap_or_default()
            );
            let mut inner = self.inner.borrow_mut();
            inner.init_error = Some(err.clone());
            inner.fail(err.clone());
        }
        result
    }

    fn create_engine(&self) -> Result<(), CallError> {
        let mut inner = self.inner.borrow_mut();
        if inner.engine.is_some() {
            return Ok(());
        }
        info!("Initializing RTC engine with app id {}", inner.config.app_id);

        let (tx, rx) = mpsc::unbounded();
        let engine = self
            .loader
            .create_engine(inner.config.app_id, inner.config.environment, tx)
            .map_err(|e| CallError::EngineInit(e.to_string()))?;
        if let Err(e) = engine.set_log_level(inner.config.log_level) {
            warn!("Failed to set engine log level: {e}");
        }
        inner.engine = Some(engine);
        inner.events = Some(rx);
        info!("RTC engine initialized");
        Ok(())
    }

    /// Join the room with the current display name and room code.
    pub async fn join(&self) -> Result<(), CallError> {
        let (engine, epoch, room_code, display_name, participant_id) = {
            let mut inner = self.inner.borrow_mut();
            let room_code = inner.room_code.trim().to_string();
            let display_name = inner.display_name.trim().to_string();
            if room_code.is_empty() || display_name.is_empty() {
                inner.error = Some(CallError::MissingFields);
                return Err(CallError::MissingFields);
            }
            if matches!(inner.phase, CallPhase::Joining | CallPhase::Joined) {
                return Err(CallError::AlreadyInCall);
            }
            let Some(engine) = inner.engine.clone() else {
                inner.error = Some(CallError::EngineNotReady);
                return Err(CallError::EngineNotReady);
            };

            let participant_id = platform::participant_id();
            inner.cancel_join();
            inner.phase = CallPhase::Joining;
            inner.error = None;
            inner.abort_reason = None;
            inner.participant_id = Some(participant_id.clone());
            (engine, inner.epoch, room_code, display_name, participant_id)
        };

        info!("Joining call with code: {room_code} as {display_name}");
        let mut progress = JoinProgress::default();
        let result = self
            .run_join(
                &engine,
                epoch,
                &room_code,
                &display_name,
                &participant_id,
                &mut progress,
            )
            .await;

        match result {
            Ok(local) => {
                let pending = {
                    let mut inner = self.inner.borrow_mut();
                    inner.phase = CallPhase::Joined;
                    inner.room = Some(room_code.clone());
                    inner.local = Some(local);
                    inner.mic_muted = false;
                    inner.camera_off = false;
                    std::mem::take(&mut inner.pending_streams)
                };
                info!("Joined room {room_code} as {participant_id}");
                emit_client_event(ClientEvent::CallJoined {
                    room_code,
                    participant_id,
                });
                if !pending.is_empty() {
                    self.on_streams_added(&pending).await;
                }
                Ok(())
            }
            Err(err) => {
                warn!(
                    "Join of room {room_code} aborted: {err} ({})",
                    err.detail().unwrap_or("no detail")
                );
                self.rollback_join(&engine, &room_code, progress).await;
                let mut inner = self.inner.borrow_mut();
                if inner.epoch == epoch {
                    inner.pending_streams.clear();
                    if err != CallError::JoinCancelled {
                        inner.fail(err.clone());
                    }
                }
                Err(err)
            }
        }
    }

    async fn run_join(
        &self,
        engine: &Rc<dyn RtcEngine>,
        epoch: u64,
        room_code: &str,
        display_name: &str,
        participant_id: &str,
        progress: &mut JoinProgress,
    ) -> Result<LocalMedia, CallError> {
        let user = RoomUser {
            user_id: participant_id.to_string(),
            user_name: display_name.to_string(),
        };
        engine
            .login_room(room_code, ROOM_TOKEN, &user, RoomConfig { user_update: true })
            .await
            .map_err(|e| engine_op("join the call", e))?;
        progress.logged_in = true;
        self.ensure_current(epoch)?;
        debug!("Logged in to room {room_code}");

        let capture = self
            .media
            .request_user_media(MediaConstraints::camera_and_microphone())
            .await
            .map_err(|e| CallError::MediaPermission(e.to_string()))?;
        progress.capture = Some(capture.clone());
        self.ensure_current(epoch)?;
        debug!("Media permissions granted: {}", capture.id);

        let stream_id = platform::stream_id(participant_id);
        let stream = engine
            .create_stream(&stream_id, &capture)
            .await
            .map_err(|e| engine_op("start your camera", e))?;
        progress.stream = Some(stream.clone());
        self.ensure_current(epoch)?;

        engine
            .start_publishing_stream(&stream)
            .await
            .map_err(|e| engine_op("publish your video", e))?;
        progress.publishing = true;
        self.ensure_current(epoch)?;
        debug!("Started publishing stream {}", stream.stream_id);
        Ok(LocalMedia { capture, stream })
    }

    fn ensure_current(&self, epoch: u64) -> Result<(), CallError> {
        let inner = self.inner.borrow();
        if inner.epoch == epoch && inner.phase == CallPhase::Joining {
            return Ok(());
        }
        match &inner.abort_reason {
            Some((aborted, reason)) if *aborted == epoch => Err(reason.clone()),
            _ => Err(CallError::JoinCancelled),
        }
    }

    /// Abort the join in flight with `reason`. It rolls back on its next
    /// check and returns `reason`.
    fn abort_join(&self, reason: CallError) {
        let mut inner = self.inner.borrow_mut();
        let epoch = inner.epoch;
        inner.abort_reason = Some((epoch, reason.clone()));
        inner.cancel_join();
        inner.fail(reason);
    }

    async fn rollback_join(
        &self,
        engine: &Rc<dyn RtcEngine>,
        room_code: &str,
        progress: JoinProgress,
    ) {
        if let Some(stream) = &progress.stream {
            if progress.publishing {
                log_cleanup("stop publishing", engine.stop_publishing_stream(&stream.stream_id));
            }
            log_cleanup("destroy stream", engine.destroy_stream(stream));
        }
        if let Some(capture) = &progress.capture {
            self.media.release(capture);
        }
        if progress.logged_in {
            log_cleanup("log out of room", engine.logout_room(room_code).await);
        }
    }

    /// Leave the call and release every resource held.
    ///
    /// Safe to call in any phase and any number of times: with nothing held
    /// it does nothing. A join still in flight is cancelled. Cleanup errors
    /// are logged, never returned.
    pub async fn leave(&self) {
        let (engine, local, remote, room) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == CallPhase::Joining {
                info!("Leave requested while joining; cancelling the join");
                inner.cancel_join();
                inner.phase = CallPhase::Idle;
                return;
            }

            let local = inner.local.take();
            let remote = inner.remote_stream.take();
            let room = inner.room.take();
            if local.is_none() && remote.is_none() && room.is_none() {
                debug!("Leave: nothing to release");
                return;
            }
            inner.epoch += 1;
            inner.phase = CallPhase::Idle;
            inner.mic_muted = false;
            inner.camera_off = false;
            (inner.engine.clone(), local, remote, room)
        };

        info!("Leaving call...");
        let Some(engine) = engine else {
            warn!("Leave: engine already gone, handles dropped");
            return;
        };

        if let Some(local) = &local {
            log_cleanup(
                "stop publishing",
                engine.stop_publishing_stream(&local.stream.stream_id),
            );
            log_cleanup("destroy stream", engine.destroy_stream(&local.stream));
            self.media.release(&local.capture);
        }
        if let Some(remote) = &remote {
            log_cleanup("stop playing", engine.stop_playing_stream(&remote.stream_id));
            emit_client_event(ClientEvent::RemoteStreamStopped(remote.stream_id.clone()));
        }
        if let Some(room) = &room {
            log_cleanup("log out of room", engine.logout_room(room).await);
            emit_client_event(ClientEvent::CallLeft {
                room_code: room.clone(),
            });
        }
        info!("Successfully left the call");
    }

    /// Flip the microphone mute. No-op without a local stream.
    pub fn toggle_microphone(&self) -> Result<(), CallError> {
        let Some((engine, stream_id, mute)) = self.toggle_target(|inner| !inner.mic_muted) else {
            return Ok(());
        };
        debug!("Toggling microphone, mute={mute}");
        engine
            .mute_publish_stream_audio(&stream_id, mute)
            .map_err(|e| engine_op("toggle the microphone", e))?;
        self.inner.borrow_mut().mic_muted = mute;
        Ok(())
    }

    /// Flip the camera. No-op without a local stream.
    pub fn toggle_camera(&self) -> Result<(), CallError> {
        let Some((engine, stream_id, off)) = self.toggle_target(|inner| !inner.camera_off) else {
            return Ok(());
        };
        debug!("Toggling camera, off={off}");
        engine
            .mute_publish_stream_video(&stream_id, off)
            .map_err(|e| engine_op("toggle the camera", e))?;
        self.inner.borrow_mut().camera_off = off;
        Ok(())
    }

    fn toggle_target(
        &self,
        next: impl FnOnce(&Inner) -> bool,
    ) -> Option<(Rc<dyn RtcEngine>, String, bool)> {
        let inner = self.inner.borrow();
        let local = inner.local.as_ref()?;
        let engine = inner.engine.clone()?;
        Some((engine, local.stream.stream_id.clone(), next(&*inner)))
    }

    /// Clear a displayed error: `Error -> Idle`.
    pub fn acknowledge_error(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.error = None;
        if inner.phase == CallPhase::Error {
            inner.phase = CallPhase::Idle;
        }
    }

    /// Handle every engine event queued so far, in arrival order.
    ///
    /// Returns how many events were handled. Use either this or
    /// [`run_events`](Self::run_events), not both.
    pub async fn process_events(&self) -> usize {
        let Some(mut events) = self.inner.borrow_mut().events.take() else {
            return 0;
        };
        let mut handled = 0;
        while let Some(Some(event)) = events.next().now_or_never() {
            self.handle_event(event).await;
            handled += 1;
        }
        let mut inner = self.inner.borrow_mut();
        if inner.engine.is_some() && inner.events.is_none() {
            inner.events = Some(events);
        }
        handled
    }

    /// Handle engine events until the engine goes away. Meant to be spawned
    /// on the UI executor right after [`initialize`](Self::initialize).
    pub async fn run_events(&self) {
        let Some(mut events) = self.inner.borrow_mut().events.take() else {
            return;
        };
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
        }
        debug!("Engine event stream closed");
    }

    /// Apply one engine notification.
    ///
    /// Events must be fed from a single consumer in delivery order.
    pub async fn handle_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::RoomStreamUpdate {
                room_id,
                update,
                streams,
            } => {
                debug!("Room stream update: {room_id} {update:?} {streams:?}");
                match update {
                    UpdateType::Add => self.on_streams_added(&streams).await,
                    UpdateType::Delete => self.on_streams_removed(&streams),
                }
            }
            EngineEvent::RoomStateUpdate {
                room_id,
                state,
                error_code,
            } => {
                debug!("Room state update: {room_id} {state:?} {error_code}");
                if state != RoomState::Disconnected {
                    return;
                }
                match self.phase() {
                    CallPhase::Joined => {
                        warn!("Room {room_id} disconnected (code {error_code}); leaving");
                        self.leave().await;
                    }
                    CallPhase::Joining => {
                        warn!("Room {room_id} disconnected (code {error_code}) while joining");
                        self.abort_join(engine_op(
                            "join the call",
                            EngineError::new(error_code, "room disconnected"),
                        ));
                    }
                    CallPhase::Idle | CallPhase::Error => {}
                }
            }
            EngineEvent::RoomUserUpdate {
                room_id,
                update,
                users,
            } => {
                debug!("Room user update: {room_id} {update:?} {users:?}");
                emit_client_event(ClientEvent::ParticipantsUpdated {
                    room_code: room_id,
                    update,
                    user_ids: users.into_iter().map(|u| u.user_id).collect(),
                });
            }
        }
    }

    async fn on_streams_added(&self, streams: &[StreamInfo]) {
        let (engine, epoch, stream_id) = {
            let mut inner = self.inner.borrow_mut();
            match inner.phase {
                CallPhase::Joined => {}
                CallPhase::Joining => {
                    debug!("Holding stream add until the join completes");
                    for stream in streams {
                        if !inner
                            .pending_streams
                            .iter()
                            .any(|p| p.stream_id == stream.stream_id)
                        {
                            inner.pending_streams.push(stream.clone());
                        }
                    }
                    return;
                }
                CallPhase::Idle | CallPhase::Error => {
                    debug!("Ignoring stream add outside of a call");
                    return;
                }
            }
            if inner.remote_stream.is_some() {
                debug!("Remote stream already playing");
                return;
            }
            let (Some(engine), Some(first)) = (inner.engine.clone(), streams.first()) else {
                return;
            };
            (engine, inner.epoch, first.stream_id.clone())
        };

        info!("Playing remote stream: {stream_id}");
        match engine.start_playing_stream(&stream_id).await {
            Ok(handle) => {
                let stale = {
                    let mut inner = self.inner.borrow_mut();
                    let stale = inner.epoch != epoch
                        || inner.phase != CallPhase::Joined
                        || inner.remote_stream.is_some();
                    if !stale {
                        inner.remote_stream = Some(handle.clone());
                    }
                    stale
                };
                if stale {
                    debug!("Call changed while starting playback; stopping {}", handle.stream_id);
                    log_cleanup("stop playing", engine.stop_playing_stream(&handle.stream_id));
                } else {
                    emit_client_event(ClientEvent::RemoteStreamStarted(handle.stream_id));
                }
            }
            Err(e) => {
                error!("Failed to play remote stream {stream_id}: {e}");
                let err = engine_op("play the trainer's video", e);
                emit_client_event(ClientEvent::CallFailed(err.to_string()));
                self.inner.borrow_mut().error = Some(err);
            }
        }
    }

    fn on_streams_removed(&self, streams: &[StreamInfo]) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == CallPhase::Joining {
                if streams.is_empty() {
                    inner.pending_streams.clear();
                } else {
                    inner
                        .pending_streams
                        .retain(|p| streams.iter().all(|s| s.stream_id != p.stream_id));
                }
                return;
            }
            let matches = inner.remote_stream.as_ref().is_some_and(|current| {
                streams.is_empty() || streams.iter().any(|s| s.stream_id == current.stream_id)
            });
            if !matches {
                debug!("Stream removal does not affect playback");
                return;
            }
            inner.remote_stream.take().zip(inner.engine.clone())
        };

        if let Some((handle, engine)) = removed {
            info!("Remote stream removed: {}", handle.stream_id);
            log_cleanup("stop playing", engine.stop_playing_stream(&handle.stream_id));
            emit_client_event(ClientEvent::RemoteStreamStopped(handle.stream_id));
        }
    }

    /// Page teardown: leave (or cancel a join) and drop the engine.
    pub async fn teardown(&self) {
        if matches!(self.phase(), CallPhase::Joined | CallPhase::Joining) {
            self.leave().await;
        }
        let mut inner = self.inner.borrow_mut();
        inner.events = None;
        inner.engine = None;
        info!("Call session torn down");
    }
}

fn engine_op(operation: &'static str, err: EngineError) -> CallError {
    CallError::EngineOperation {
        operation,
        message: err.to_string(),
    }
}

fn log_cleanup(what: &str, result: Result<(), EngineError>) {
    if let Err(e) = result {
        warn!("Cleanup step '{what}' failed: {e}");
    }
}
