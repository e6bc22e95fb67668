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

//! Application route definitions.
//!
//! Shared between the route guard and whatever router the UI uses, so the
//! path strings live in one place.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Entry page; also the redirect target for unauthenticated visitors.
    Login,
    Register,
    Home,
    /// Video session page; `session_id` pre-fills the join code.
    VideoCall { session_id: String },
    NotFound,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Register => "/register".to_string(),
            Route::Home => "/home".to_string(),
            Route::VideoCall { session_id } => format!("/session/{session_id}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Resolve a path. Query strings, fragments and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] | [""] => Route::Login,
            ["register"] => Route::Register,
            ["home"] => Route::Home,
            ["session", id] if !id.is_empty() => Route::VideoCall {
                session_id: (*id).to_string(),
            },
            _ => Route::NotFound,
        }
    }

    /// Routes that require an authenticated session.
    pub fn is_guarded(&self) -> bool {
        matches!(self, Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
