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

//! This crate provides the client-side logic of the FitBro coaching site: signing in against an
//! identity provider, the process-wide auth session everyone observes, the route guard that keeps
//! signed-out visitors on the entry page, and the call session behind the one-to-one training video
//! page.
//!
//! This crate intends to make no assumptions about the UI. The identity provider, the RTC SDK and the
//! camera/microphone API are reached only through the traits [`IdentityProvider`], [`RtcSdk`],
//! [`RtcEngine`] and [`MediaCapture`]; a browser binding implements them over the JS SDKs, tests
//! implement them with fakes.
//!
//! Everything runs on one thread. Shared handles are `Rc<RefCell<_>>` and clone cheaply.
//!
//! # Outline of usage
//!
//! ## Auth session:
//! ```ignore
//! let auth = AuthClient::new(provider);
//! let session = SessionContext::for_client(&auth);
//! session.start().await;
//!
//! let id = session.subscribe(Rc::new(|snapshot: &SessionSnapshot| { /* re-render */ }));
//! match guard(&Route::Home, &session.snapshot()) {
//!     GuardDecision::Placeholder => { /* spinner */ }
//!     GuardDecision::Allow => { /* render the page */ }
//!     GuardDecision::Redirect(route) => { /* navigate to route.path() */ }
//! }
//! ```
//!
//! ## Backend calls:
//! ```ignore
//! let api = ApiClient::new(config.api, Rc::new(auth.clone()));
//! let bookings: serde_json::Value = api.get("bookings").await?;
//! ```
//!
//! ## Video call:
//! ```ignore
//! let loader = SdkLoader::new(sdk, &config.call.sdk_url); // one per process
//! let call = CallSession::new(config.call, loader, media, Some(&session_id));
//! call.initialize().await?;
//! spawn_local({ let call = call.clone(); async move { call.run_events().await } });
//!
//! call.set_display_name("Alice");
//! call.join().await?;
//! call.toggle_microphone()?;
//! call.leave().await;
//! call.teardown().await;
//! ```

pub mod auth;
pub mod call;
pub mod config;
pub mod constants;
pub mod error;
pub mod event_bus;
pub mod events;
pub mod platform;

pub use auth::{
    guard, AuthClient, GuardDecision, IdentityProvider, LoginForm, PasswordRules, RegisterForm,
    SessionContext, SessionSnapshot,
};
pub use call::{
    CallPhase, CallSession, CallSnapshot, EngineEvent, MediaCapture, RtcEngine, RtcSdk, SdkLoader,
};
pub use config::{CallConfig, ClientConfig};
pub use error::{AuthError, CallError, ClientError};
pub use event_bus::{
    emit_client_event, global_client_sender, subscribe_client_events, EVENT_BUS_CAPACITY,
};
pub use events::ClientEvent;
pub use fitbro_api_client::{ApiClient, ApiConfig, ApiError};
pub use fitbro_types::{AuthStatus, AuthUser, Persistence, Route};
