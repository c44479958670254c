//! # Password Hashing
//!
//! Accounts store the lowercase hex SHA-256 digest of the password, which
//! keeps existing user records valid. Comparison happens on the digest.

use sha2::{Digest, Sha256};

use crate::types::Role;

/// Hashes a password to a 64-character lowercase hex digest.
///
/// ## Example
/// ```rust
/// use stockroom_core::auth::hash_password;
///
/// assert_eq!(
///     hash_password("password"),
///     "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
/// );
/// ```
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Checks a password against a stored digest.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(stored_hash)
}

/// Role for a self-registered account: the very first one is the admin.
pub fn role_for_new_account(existing_users: i64) -> Role {
    if existing_users == 0 {
        Role::Admin
    } else {
        Role::User
    }
}
