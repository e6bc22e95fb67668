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

//! Shared data types for the FitBro client crates.
//!
//! Nothing here talks to the network or to a browser: the identity provider,
//! the coaching backend and the real-time engine all live behind traits in
//! the crates that depend on this one.

pub mod error;
pub mod routes;
pub mod user;

pub use error::ErrorBody;
pub use routes::Route;
pub use user::{AuthStatus, AuthUser, Persistence};
