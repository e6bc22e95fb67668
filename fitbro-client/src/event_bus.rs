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

//! Global event bus for framework-agnostic client events.
//!
//! A broadcast channel: any component can emit, and every subscriber receives
//! every event emitted after it subscribed.
//!
//! # Example
//!
//! ```ignore
//! use fitbro_client::{subscribe_client_events, ClientEvent};
//!
//! let mut rx = subscribe_client_events();
//! wasm_bindgen_futures::spawn_local(async move {
//!     while let Ok(event) = rx.recv().await {
//!         if let ClientEvent::RemoteStreamStarted(stream_id) = event {
//!             // attach the stream to the trainer tile
//!         }
//!     }
//! });
//! ```

use crate::events::ClientEvent;
use async_broadcast::{broadcast, InactiveReceiver, Sender};
use once_cell::sync::Lazy;

/// Capacity of the event bus channel
pub const EVENT_BUS_CAPACITY: usize = 256;

struct Bus {
    sender: Sender<ClientEvent>,
    // Keeps the channel open while nobody is subscribed.
    _keepalive: InactiveReceiver<ClientEvent>,
}

static BUS: Lazy<Bus> = Lazy::new(|| {
    let (mut sender, receiver) = broadcast(EVENT_BUS_CAPACITY);
    // Slow subscribers lose the oldest events instead of blocking emitters.
    sender.set_overflow(true);
    sender.set_await_active(false);
    Bus {
        sender,
        _keepalive: receiver.deactivate(),
    }
});

/// Get the global sender for emitting client events.
pub fn global_client_sender() -> Sender<ClientEvent> {
    BUS.sender.clone()
}

/// Subscribe to client events.
///
/// Returns a receiver that will receive all future client events.
pub fn subscribe_client_events() -> async_broadcast::Receiver<ClientEvent> {
    BUS.sender.new_receiver()
}

/// Emit a client event to all subscribers.
///
/// Never blocks. With no active subscriber the event is dropped.
pub fn emit_client_event(event: ClientEvent) {
    let _ = BUS.sender.try_broadcast(event);
}
