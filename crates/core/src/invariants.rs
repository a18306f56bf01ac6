//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::Note;
use crate::otp::{Challenge, CODE_LEN};
use crate::session::Session;

/// Validate that a challenge's state is internally consistent
pub fn assert_challenge_invariants(challenge: &Challenge) {
    debug_assert!(
        challenge.expires_at() > challenge.issued_at(),
        "challenge for {} expires at or before issue time",
        challenge.subject()
    );

    debug_assert!(
        challenge.code().len() == CODE_LEN && challenge.code().bytes().all(|b| b.is_ascii_digit()),
        "challenge for {} carries a malformed code",
        challenge.subject()
    );

    debug_assert!(
        !challenge.subject().is_empty(),
        "challenge has an empty subject"
    );
}

/// Validate that a stored note is well formed
pub fn assert_note_invariants(note: &Note) {
    debug_assert!(note.id != 0, "note has id 0");

    debug_assert!(!note.owner.trim().is_empty(), "note {} has no owner", note.id);

    debug_assert!(
        !note.title.trim().is_empty(),
        "note {} has an empty title",
        note.id
    );
}

/// Validate that a session's identity is usable
pub fn assert_session_identity(session: &Session) {
    if let Some(user) = session.user() {
        debug_assert!(
            !user.trim().is_empty(),
            "session authenticated as an empty username"
        );
    }
}
