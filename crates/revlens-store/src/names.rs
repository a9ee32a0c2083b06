//! Validation of item names and revision ids.
//!
//! Both are used as single path components by the directory backend, so a
//! valid name:
//! - Must be non-empty
//! - Must not contain `/`, `\`, NUL or other control characters
//! - Must not start with `.`

use crate::error::{StoreError, StoreResult};

/// Validate an item name or revision id, returning `Ok(())` if valid.
pub fn validate_name(name: &str) -> StoreResult<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.starts_with('.') {
        Some("must not start with '.'")
    } else if name.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if name.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}
