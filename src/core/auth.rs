//! Credential matching against the in-memory user list.
//!
//! Authentication here is a plaintext comparison, exactly as strong as the
//! backing store's contents. Hardening it is out of scope.

use crate::model::User;

/// Returns the matching user for a username/password pair, if any.
#[must_use]
pub fn authenticate<'a>(users: &'a [User], username: &str, password: &str) -> Option<&'a User> {
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
}
