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

//! Route guard: a pure function of the route and the session snapshot.

use fitbro_types::Route;

use super::session::SessionSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: show a spinner, do not navigate.
    Placeholder,
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may be rendered for `session`.
///
/// Unguarded routes are always allowed. Guarded routes wait for the session
/// to resolve, then require an authenticated user; everyone else is sent to
/// the entry page.
pub fn guard(route: &Route, session: &SessionSnapshot) -> GuardDecision {
    if !route.is_guarded() {
        return GuardDecision::Allow;
    }
    if session.status.is_pending() {
        return GuardDecision::Placeholder;
    }
    if session.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}
