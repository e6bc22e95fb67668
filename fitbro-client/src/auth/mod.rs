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

//! Authentication: provider abstraction, auth client, the process-wide
//! session context, the route guard and the login/register form controllers.

mod client;
mod forms;
mod guard;
mod provider;
mod session;

pub use client::AuthClient;
pub use forms::{LoginForm, PasswordRules, RegisterForm};
pub use guard::{guard, GuardDecision};
pub use provider::{AuthListener, FederatedProvider, IdentityProvider, ListenerId, ProviderError};
pub use session::{SessionCallback, SessionContext, SessionSnapshot, SubscriptionId};
