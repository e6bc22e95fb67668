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

//! Lazy, load-once acquisition of the RTC SDK asset.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{error, info};

use super::engine::{EngineError, EngineEventSender, RtcEngine, RtcSdk};
use crate::error::CallError;

type LoadFuture = Shared<LocalBoxFuture<'static, Result<(), String>>>;

enum LoadState {
    NotLoaded,
    Loading(LoadFuture),
    Loaded,
}

/// Shares one SDK load across every call session in the process.
///
/// [`ensure_loaded`](Self::ensure_loaded) may be called any number of times:
/// it returns at once after a successful load, joins a load already in
/// flight, and only starts a new load when none has succeeded yet. Failures
/// are not cached.
#[derive(Clone)]
pub struct SdkLoader {
    sdk: Rc<dyn RtcSdk>,
    url: String,
    state: Rc<RefCell<LoadState>>,
}

impl fmt::Debug for SdkLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkLoader")
            .field("url", &self.url)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl SdkLoader {
    pub fn new(sdk: Rc<dyn RtcSdk>, url: impl Into<String>) -> Self {
        Self {
            sdk,
            url: url.into(),
            state: Rc::new(RefCell::new(LoadState::NotLoaded)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.borrow(), LoadState::Loaded)
    }

    pub async fn ensure_loaded(&self) -> Result<(), CallError> {
        let pending = {
            let mut state = self.state.borrow_mut();
            match &*state {
                LoadState::Loaded => return Ok(()),
                LoadState::Loading(load) => load.clone(),
                LoadState::NotLoaded => {
                    if self.sdk.is_available() {
                        info!("RTC SDK already loaded");
                        *state = LoadState::Loaded;
                        return Ok(());
                    }
                    let sdk = Rc::clone(&self.sdk);
                    let url = self.url.clone();
                    let load = async move { sdk.load(&url).await.map_err(|e| e.to_string()) }
                        .boxed_local()
                        .shared();
                    *state = LoadState::Loading(load.clone());
                    load
                }
            }
        };

        let result = pending.clone().await;
        let mut state = self.state.borrow_mut();
        match result {
            Ok(()) => {
                if !matches!(*state, LoadState::Loaded) {
                    info!("RTC SDK loaded from {}", self.url);
                }
                *state = LoadState::Loaded;
                Ok(())
            }
            Err(message) => {
                // A newer load may already be in flight.
                if matches!(&*state, LoadState::Loading(current) if current.ptr_eq(&pending)) {
                    error!("Failed to load RTC SDK: {message}");
                    *state = LoadState::NotLoaded;
                }
                Err(CallError::EngineInit(message))
            }
        }
    }

    /// Construct an engine from the loaded SDK.
    pub(crate) fn create_engine(
        &self,
        app_id: u32,
        environment: u8,
        events: EngineEventSender,
    ) -> Result<Rc<dyn RtcEngine>, EngineError> {
        self.sdk.create_engine(app_id, environment, events)
    }
}
