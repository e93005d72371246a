//! # Credential Table
//!
//! The operator login is checked against a fixed in-memory table, not the
//! database. The default table holds a single placeholder pair; deployments
//! replace it through configuration.

use std::collections::HashMap;

use crate::error::AuthError;

/// Username of the placeholder operator account.
pub const DEFAULT_USERNAME: &str = "admin";

/// Password of the placeholder operator account.
pub const DEFAULT_PASSWORD: &str = "1234";

/// In-memory `username → password` table.
#[derive(Clone)]
pub struct CredentialTable {
    entries: HashMap<String, String>,
}

impl CredentialTable {
    /// Creates an empty table (every login fails).
    pub fn empty() -> Self {
        CredentialTable {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces an account.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.entries.insert(username.into(), password.into());
        self
    }

    /// Checks a username/password pair.
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::credentials::CredentialTable;
    ///
    /// let table = CredentialTable::default();
    /// assert!(table.verify("admin", "1234").is_ok());
    /// assert!(table.verify("admin", "wrong").is_err());
    /// ```
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.entries.get(username) {
            Some(expected) if constant_time_eq(expected.as_bytes(), password.as_bytes()) => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CredentialTable {
    fn default() -> Self {
        CredentialTable::empty().with_user(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl std::fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut users: Vec<&String> = self.entries.keys().collect();
        users.sort();
        f.debug_struct("CredentialTable")
            .field("users", &users)
            .finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pair() {
        let table = CredentialTable::default();
        assert_eq!(table.len(), 1);
        assert!(table.verify("admin", "1234").is_ok());
    }

    #[test]
    fn test_rejects_other_pairs() {
        let table = CredentialTable::default();
        assert_eq!(
            table.verify("admin", "12345"),
            Err(AuthError::InvalidCredentials)
        );
        assert!(table.verify("root", "1234").is_err());
        assert!(table.verify("", "").is_err());
    }

    #[test]
    fn test_with_user_replaces_password() {
        let table = CredentialTable::default().with_user("admin", "s3cret");
        assert!(table.verify("admin", "1234").is_err());
        assert!(table.verify("admin", "s3cret").is_ok());
    }

    #[test]
    fn test_debug_hides_passwords() {
        let rendered = format!("{:?}", CredentialTable::default());
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("1234"));
    }
}
