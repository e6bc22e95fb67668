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

//! In-process doubles for the provider, SDK, engine and capture seams.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;
use fitbro_client::auth::{
    AuthListener, FederatedProvider, IdentityProvider, ListenerId, ProviderError,
};
use fitbro_client::call::{
    CapturedMedia, EngineError, EngineEvent, EngineEventSender, LogLevel, MediaCapture,
    MediaConstraints, MediaError, RoomConfig, RoomUser, RtcEngine, RtcSdk, StreamHandle,
};
use fitbro_client::{CallConfig, CallSession, SdkLoader};
use fitbro_types::{AuthUser, Persistence};
use futures::channel::oneshot;

pub fn alice() -> AuthUser {
    AuthUser::new("uid-alice")
        .with_email("alice@example.com")
        .with_id_token("token-alice")
}

// === Identity provider ===

#[derive(Default)]
pub struct FakeProvider {
    pub current: RefCell<Option<AuthUser>>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(Option<AuthUser>)>)>>,
    next_listener: Cell<u64>,
    /// Error returned by every sign-in, sign-up and token call when set.
    pub fail_with: RefCell<Option<ProviderError>>,
    pub fail_persistence: Cell<bool>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn signed_in(user: AuthUser) -> Rc<Self> {
        let provider = Self::default();
        *provider.current.borrow_mut() = Some(user);
        Rc::new(provider)
    }

    pub fn failing(code: &str, message: &str) -> Rc<Self> {
        let provider = Self::default();
        *provider.fail_with.borrow_mut() = Some(ProviderError::new(code, message));
        Rc::new(provider)
    }

    /// Push an auth-state change to every registered listener.
    pub fn emit(&self, user: Option<AuthUser>) {
        *self.current.borrow_mut() = user.clone();
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(user.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn check(&self) -> Result<(), ProviderError> {
        match &*self.fail_with.borrow() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn sign_in(&self, user: AuthUser) -> Result<AuthUser, ProviderError> {
        self.check()?;
        self.emit(Some(user.clone()));
        Ok(user)
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    async fn set_persistence(&self, persistence: Persistence) -> Result<(), ProviderError> {
        self.record(format!("set_persistence:{persistence:?}"));
        if self.fail_persistence.get() {
            return Err(ProviderError::new("auth/unsupported", "persistence unavailable"));
        }
        Ok(())
    }

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthUser, ProviderError> {
        self.record(format!("sign_in:{email}"));
        self.sign_in(AuthUser::new(format!("uid-{email}")).with_email(email))
    }

    async fn sign_in_with_popup(
        &self,
        provider: FederatedProvider,
    ) -> Result<AuthUser, ProviderError> {
        self.record(format!("popup:{provider:?}"));
        self.sign_in(AuthUser::new("uid-google").with_email("google@example.com"))
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthUser, ProviderError> {
        self.record(format!("sign_up:{email}"));
        self.sign_in(AuthUser::new(format!("uid-{email}")).with_email(email))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.record("sign_out");
        self.emit(None);
        Ok(())
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), ProviderError> {
        self.record(format!("reset:{email}"));
        self.check()
    }

    async fn update_password(
        &self,
        user: &AuthUser,
        _new_password: &str,
    ) -> Result<(), ProviderError> {
        self.record(format!("update_password:{}", user.uid));
        self.check()
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.borrow().clone()
    }

    async fn get_id_token(
        &self,
        user: &AuthUser,
        force_refresh: bool,
    ) -> Result<String, ProviderError> {
        self.record(format!("get_id_token:{force_refresh}"));
        self.check()?;
        let token = user.id_token.clone().unwrap_or_else(|| format!("token-{}", user.uid));
        Ok(if force_refresh {
            format!("{token}-fresh")
        } else {
            token
        })
    }

    fn on_auth_state_changed(&self, listener: AuthListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::from(listener)));
        id
    }

    fn remove_auth_state_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

// === RTC engine ===

#[derive(Default)]
pub struct FakeEngine {
    calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<&'static str>>,
    gates: RefCell<HashMap<&'static str, oneshot::Receiver<()>>>,
    events: RefCell<Option<EngineEventSender>>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Make every later call of `operation` fail.
    pub fn fail(&self, operation: &'static str) {
        self.failing.borrow_mut().insert(operation);
    }

    /// Hold the next `operation` call until the returned sender fires.
    /// `login_room` is held before it takes effect, `start_publishing` after.
    pub fn gate(&self, operation: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(operation, rx);
        tx
    }

    pub fn gate_login(&self) -> oneshot::Sender<()> {
        self.gate("login_room")
    }

    async fn hold(&self, operation: &'static str) {
        let gate = self.gates.borrow_mut().remove(operation);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    /// Queue an engine notification as the SDK would.
    pub fn push(&self, event: EngineEvent) {
        if let Some(tx) = &*self.events.borrow() {
            let _ = tx.unbounded_send(event);
        }
    }

    fn op(&self, name: &'static str, call: String) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(name) {
            return Err(EngineError::new(1_000_001, format!("{name} rejected")));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl RtcEngine for FakeEngine {
    fn set_log_level(&self, level: LogLevel) -> Result<(), EngineError> {
        self.op("set_log_level", format!("set_log_level:{level}"))
    }

    async fn login_room(
        &self,
        room_id: &str,
        token: &str,
        user: &RoomUser,
        config: RoomConfig,
    ) -> Result<(), EngineError> {
        assert!(token.is_empty());
        assert!(config.user_update);
        self.hold("login_room").await;
        self.op(
            "login_room",
            format!("login_room:{room_id}:{}:{}", user.user_id, user.user_name),
        )
    }

    async fn logout_room(&self, room_id: &str) -> Result<(), EngineError> {
        self.op("logout_room", format!("logout_room:{room_id}"))
    }

    async fn create_stream(
        &self,
        stream_id: &str,
        media: &CapturedMedia,
    ) -> Result<StreamHandle, EngineError> {
        self.op("create_stream", format!("create_stream:{stream_id}:{}", media.id))?;
        Ok(StreamHandle::new(stream_id))
    }

    fn destroy_stream(&self, stream: &StreamHandle) -> Result<(), EngineError> {
        self.op("destroy_stream", format!("destroy_stream:{}", stream.stream_id))
    }

    async fn start_publishing_stream(&self, stream: &StreamHandle) -> Result<(), EngineError> {
        self.op("start_publishing", format!("start_publishing:{}", stream.stream_id))?;
        self.hold("start_publishing").await;
        Ok(())
    }

    fn stop_publishing_stream(&self, stream_id: &str) -> Result<(), EngineError> {
        self.op("stop_publishing", format!("stop_publishing:{stream_id}"))
    }

    async fn start_playing_stream(&self, stream_id: &str) -> Result<StreamHandle, EngineError> {
        self.op("start_playing", format!("start_playing:{stream_id}"))?;
        Ok(StreamHandle::new(stream_id))
    }

    fn stop_playing_stream(&self, stream_id: &str) -> Result<(), EngineError> {
        self.op("stop_playing", format!("stop_playing:{stream_id}"))
    }

    fn mute_publish_stream_audio(&self, stream_id: &str, mute: bool) -> Result<(), EngineError> {
        self.op("mute_audio", format!("mute_audio:{stream_id}:{mute}"))
    }

    fn mute_publish_stream_video(&self, stream_id: &str, mute: bool) -> Result<(), EngineError> {
        self.op("mute_video", format!("mute_video:{stream_id}:{mute}"))
    }
}

// === SDK asset ===

#[derive(Default)]
pub struct FakeSdk {
    pub engine: Rc<FakeEngine>,
    pub available: Cell<bool>,
    pub fail_load: Cell<bool>,
    /// Number of upcoming loads that fail.
    pub fail_next: Cell<u32>,
    pub fail_create: Cell<bool>,
    pub loads: Cell<u32>,
    pub engines_created: Cell<u32>,
}

impl FakeSdk {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

#[async_trait(?Send)]
impl RtcSdk for FakeSdk {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    async fn load(&self, _url: &str) -> Result<(), EngineError> {
        self.loads.set(self.loads.get() + 1);
        tokio::task::yield_now().await;
        let fail_once = self.fail_next.get() > 0;
        if fail_once {
            self.fail_next.set(self.fail_next.get() - 1);
        }
        if self.fail_load.get() || fail_once {
            return Err(EngineError::new(-1, "script failed to load"));
        }
        self.available.set(true);
        Ok(())
    }

    fn create_engine(
        &self,
        app_id: u32,
        environment: u8,
        events: EngineEventSender,
    ) -> Result<Rc<dyn RtcEngine>, EngineError> {
        assert_eq!(app_id, 801669669);
        assert_eq!(environment, 0);
        if self.fail_create.get() {
            return Err(EngineError::new(1_000_002, "invalid app id"));
        }
        self.engines_created.set(self.engines_created.get() + 1);
        *self.engine.events.borrow_mut() = Some(events);
        Ok(self.engine.clone())
    }
}

// === Media capture ===

#[derive(Default)]
pub struct FakeMedia {
    pub deny: Cell<bool>,
    pub requests: Cell<u32>,
    pub live: RefCell<Vec<String>>,
    pub released: RefCell<Vec<String>>,
}

impl FakeMedia {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

#[async_trait(?Send)]
impl MediaCapture for FakeMedia {
    async fn request_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<CapturedMedia, MediaError> {
        assert!(constraints.audio && constraints.video);
        let n = self.requests.get() + 1;
        self.requests.set(n);
        if self.deny.get() {
            return Err(MediaError::new("NotAllowedError", "Permission denied"));
        }
        let id = format!("capture-{n}");
        self.live.borrow_mut().push(id.clone());
        Ok(CapturedMedia {
            id,
            audio: true,
            video: true,
        })
    }

    fn release(&self, media: &CapturedMedia) {
        self.live.borrow_mut().retain(|id| *id != media.id);
        self.released.borrow_mut().push(media.id.clone());
    }
}

// === Harness ===

pub struct CallHarness {
    pub sdk: Rc<FakeSdk>,
    pub media: Rc<FakeMedia>,
    pub call: CallSession,
}

impl CallHarness {
    pub fn new(room_code: Option<&str>) -> Self {
        let sdk = FakeSdk::new();
        let media = FakeMedia::new();
        let config = CallConfig::default();
        let loader = SdkLoader::new(sdk.clone(), config.sdk_url.clone());
        let call = CallSession::new(config, loader, media.clone(), room_code);
        Self { sdk, media, call }
    }

    pub fn engine(&self) -> &FakeEngine {
        &self.sdk.engine
    }

    /// Initialized session with both form fields filled.
    pub async fn ready(room_code: &str, display_name: &str) -> Self {
        let harness = Self::new(Some(room_code));
        harness
            .call
            .initialize()
            .await
            .expect("engine initializes");
        harness.call.set_display_name(display_name);
        harness
    }

    pub async fn joined() -> Self {
        let harness = Self::ready("123456", "Alice").await;
        harness.call.join().await.expect("join succeeds");
        harness
    }
}
