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

//! Clock and id helpers that work the same on WASM and native targets.

use rand::Rng;
use web_time::{SystemTime, UNIX_EPOCH};

/// Returns the current time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Ephemeral participant id used to log in to a room.
///
/// The random suffix keeps two tabs opened in the same millisecond apart.
pub fn participant_id() -> String {
    let suffix: u16 = rand::thread_rng().gen();
    format!("user_{}_{suffix:04x}", now_ms())
}

/// Id of the outbound stream published by `participant`.
pub fn stream_id(participant: &str) -> String {
    format!("stream_{participant}_{}", now_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_have_expected_shape() {
        let pid = participant_id();
        assert!(pid.starts_with("user_"));
        assert_eq!(pid.split('_').count(), 3);
        assert!(stream_id(&pid).starts_with(&format!("stream_{pid}_")));
    }

    #[test]
    fn clock_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }
}
