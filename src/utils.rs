//! Utility functions for the matchmaking client

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Placeholder identifiers that must never reach the queue service.
///
/// These show up when the caller wires in an unauthenticated or mock
/// identity instead of a real account id.
const PLACEHOLDER_IDS: &[&str] = &[
    "anonymous",
    "guest",
    "unknown",
    "placeholder",
    "current-user",
    "current_user",
    "user-id",
    "null",
    "undefined",
];

/// Check whether a player id is empty or a known placeholder value.
///
/// Matching is case-insensitive and ignores surrounding whitespace;
/// `mock-` and `test-` prefixes are treated as placeholders too.
pub fn is_placeholder_player_id(player_id: &str) -> bool {
    let id = player_id.trim().to_ascii_lowercase();

    if id.is_empty() {
        return true;
    }

    if id.starts_with("mock-") || id.starts_with("test-") {
        return true;
    }

    PLACEHOLDER_IDS.contains(&id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_and_whitespace_ids_are_placeholders() {
        assert!(is_placeholder_player_id(""));
        assert!(is_placeholder_player_id("   "));
        assert!(is_placeholder_player_id("\t\n"));
    }

    #[test]
    fn test_known_placeholder_ids() {
        assert!(is_placeholder_player_id("guest"));
        assert!(is_placeholder_player_id("Anonymous"));
        assert!(is_placeholder_player_id("  PLACEHOLDER  "));
        assert!(is_placeholder_player_id("current-user"));
        assert!(is_placeholder_player_id("mock-7f3a"));
        assert!(is_placeholder_player_id("test-player-1"));
    }

    #[test]
    fn test_real_ids_pass() {
        assert!(!is_placeholder_player_id("player-8842"));
        assert!(!is_placeholder_player_id("b7b9f0f6-46f4-4f39-a2de-9c71d5f0d6f4"));
        assert!(!is_placeholder_player_id("contestant_42"));
    }

    proptest! {
        #[test]
        fn prop_alphanumeric_ids_with_real_prefix_pass(suffix in "[a-z0-9]{1,16}") {
            let id = format!("acct-{suffix}");
            prop_assert!(!is_placeholder_player_id(&id));
        }

        #[test]
        fn prop_mock_prefixed_ids_always_rejected(suffix in "[a-zA-Z0-9]{0,16}") {
            let id = format!("mock-{suffix}");
            prop_assert!(is_placeholder_player_id(&id));
        }

        #[test]
        fn prop_whitespace_only_ids_always_rejected(ws in "[ \t]{0,8}") {
            prop_assert!(is_placeholder_player_id(&ws));
        }
    }
}
