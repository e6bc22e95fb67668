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

//! Process-wide auth session observable.
//!
//! The provider's session listener is the only writer. Consumers read
//! snapshots or subscribe to changes; they never mutate the session.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fitbro_types::{AuthStatus, AuthUser, Persistence};
use log::{error, info};

use super::client::AuthClient;
use super::provider::{IdentityProvider, ListenerId};
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;

/// Read-only view of the auth session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: AuthStatus,
    pub user: Option<AuthUser>,
    /// True until the provider has reported at least once.
    pub is_loading: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            status: AuthStatus::Uninitialized,
            user: None,
            is_loading: true,
        }
    }
}

impl SessionSnapshot {
    /// Snapshot after a provider callback.
    pub fn resolved(user: Option<AuthUser>) -> Self {
        Self {
            status: if user.is_some() {
                AuthStatus::Authenticated
            } else {
                AuthStatus::Anonymous
            },
            user,
            is_loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.uid.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }

    pub fn id_token(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.id_token.as_deref())
    }
}

pub type SessionCallback = Rc<dyn Fn(&SessionSnapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

struct Inner {
    snapshot: SessionSnapshot,
    started: bool,
    listener: Option<ListenerId>,
    subscribers: Vec<(SubscriptionId, SessionCallback)>,
    next_subscriber_id: usize,
}

/// Holds the current session and fans changes out to subscribers.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SessionContext {
    provider: Rc<dyn IdentityProvider>,
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("snapshot", &self.inner.borrow().snapshot)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            inner: Rc::new(RefCell::new(Inner {
                snapshot: SessionSnapshot::default(),
                started: false,
                listener: None,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
        }
    }

    /// Context backed by the same provider as `client`.
    pub fn for_client(client: &AuthClient) -> Self {
        Self::new(client.provider())
    }

    /// Register the provider listener and request local persistence.
    ///
    /// Only the first call has an effect: one listener for the lifetime of the
    /// context. A persistence failure is logged and otherwise ignored.
    pub async fn start(&self) {
        let loading = {
            let mut inner = self.inner.borrow_mut();
            if inner.started {
                return;
            }
            inner.started = true;
            inner.snapshot = SessionSnapshot {
                status: AuthStatus::Loading,
                user: None,
                is_loading: true,
            };
            inner.snapshot.clone()
        };
        Self::publish(&self.inner, loading);

        let weak = Rc::downgrade(&self.inner);
        let id = self.provider.on_auth_state_changed(Box::new(move |user| {
            if let Some(inner) = weak.upgrade() {
                Self::apply(&inner, user);
            }
        }));
        self.inner.borrow_mut().listener = Some(id);

        match self.provider.set_persistence(Persistence::Local).await {
            Ok(()) => info!("Authentication persistence set to LOCAL"),
            Err(e) => error!("Error setting persistence: {}", e.message),
        }
    }

    /// Unregister the provider listener. The last snapshot stays readable.
    pub fn stop(&self) {
        let listener = self.inner.borrow_mut().listener.take();
        if let Some(id) = listener {
            self.provider.remove_auth_state_listener(id);
            info!("Auth state listener removed");
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.borrow().snapshot.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().snapshot.is_loading
    }

    /// Subscribe to session changes. The callback immediately receives the
    /// current snapshot.
    pub fn subscribe(&self, callback: SessionCallback) -> SubscriptionId {
        let current = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriptionId(inner.next_subscriber_id);
            inner.next_subscriber_id += 1;
            inner.subscribers.push((id, Rc::clone(&callback)));
            (id, inner.snapshot.clone())
        };
        callback(&current.1);
        current.0
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(sub_id, _)| *sub_id != id);
    }

    fn apply(inner: &Rc<RefCell<Inner>>, user: Option<AuthUser>) {
        info!(
            "Auth state changed: {}",
            if user.is_some() { "User logged in" } else { "No user" }
        );
        let snapshot = SessionSnapshot::resolved(user);
        inner.borrow_mut().snapshot = snapshot.clone();
        Self::publish(inner, snapshot);
    }

    fn publish(inner: &Rc<RefCell<Inner>>, snapshot: SessionSnapshot) {
        emit_client_event(ClientEvent::SessionChanged {
            status: snapshot.status,
            uid: snapshot.user_id().map(str::to_string),
        });

        // Callbacks run outside the borrow so they can read the context.
        let subscribers: Vec<SessionCallback> = inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in subscribers {
            callback(&snapshot);
        }
    }
}
