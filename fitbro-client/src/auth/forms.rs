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

//! Controller state behind the login and register forms.

use fitbro_types::Route;

use super::client::AuthClient;
use super::session::SessionSnapshot;
use crate::error::AuthError;

/// Special characters accepted by [`PasswordRules`].
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const MIN_PASSWORD_LEN: usize = 8;

/// Where a form should send the user once the session says they are signed
/// in. Forms never navigate from their submit handlers.
fn redirect_when_signed_in(session: &SessionSnapshot) -> Option<Route> {
    session.is_authenticated().then_some(Route::Home)
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    auth: AuthClient,
    loading: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            auth,
            loading: false,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit email and password.
    ///
    /// On failure the provider's message is stored and `loading` drops back to
    /// false. On success `loading` stays set until the session observer
    /// redirects (see [`redirect_target`](Self::redirect_target)).
    pub async fn submit(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.begin();
        let result = self.auth.login(email, password).await.map(|_| ());
        self.finish(result)
    }

    pub async fn submit_google(&mut self) -> Result<(), AuthError> {
        self.begin();
        let result = self.auth.google_login().await.map(|_| ());
        self.finish(result)
    }

    pub fn redirect_target(&self, session: &SessionSnapshot) -> Option<Route> {
        redirect_when_signed_in(session)
    }

    fn begin(&mut self) {
        self.error = None;
        self.loading = true;
    }

    fn finish(&mut self, result: Result<(), AuthError>) -> Result<(), AuthError> {
        if let Err(e) = &result {
            self.error = Some(e.to_string());
            self.loading = false;
        }
        result
    }
}

/// Which password requirements are met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordRules {
    pub length: bool,
    pub upper: bool,
    pub lower: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordRules {
    pub fn check(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LEN,
            upper: password.chars().any(|c| c.is_ascii_uppercase()),
            lower: password.chars().any(|c| c.is_ascii_lowercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.missing().is_empty()
    }

    /// Human-readable list of unmet requirements.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.length, "at least 8 characters"),
            (self.upper, "an uppercase letter"),
            (self.lower, "a lowercase letter"),
            (self.number, "a number"),
            (self.special, "a special character"),
        ]
        .into_iter()
        .filter(|(met, _)| !met)
        .map(|(_, text)| text)
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    auth: AuthClient,
    loading: bool,
    error: Option<String>,
}

impl RegisterForm {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            auth,
            loading: false,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Create the account. Weak passwords are refused before the provider is
    /// contacted.
    pub async fn submit(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.error = None;
        let rules = PasswordRules::check(password);
        if !rules.is_satisfied() {
            let err = AuthError::WeakPassword(rules.missing().join(", "));
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.loading = true;
        let result = self.auth.signup(email, password).await.map(|_| ());
        if let Err(e) = &result {
            self.error = Some(e.to_string());
            self.loading = false;
        }
        result
    }

    pub fn redirect_target(&self, session: &SessionSnapshot) -> Option<Route> {
        redirect_when_signed_in(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        let rules = PasswordRules::check("Str0ng!pass");
        assert!(rules.is_satisfied());
        assert!(rules.missing().is_empty());
    }

    #[test]
    fn each_rule_is_reported() {
        let rules = PasswordRules::check("abc");
        assert_eq!(
            rules.missing(),
            vec![
                "at least 8 characters",
                "an uppercase letter",
                "a number",
                "a special character"
            ]
        );
        assert!(PasswordRules::check("Abcdefg1\"").special);
        assert!(!PasswordRules::check("Abcdefg1_").special);
    }
}
