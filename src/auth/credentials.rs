use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::auth::password;

/// Username → argon2 hash mapping, loaded once at startup.
///
/// The file is a flat YAML mapping:
///
/// ```yaml
/// admin: $argon2id$v=19$m=19456,t=2,p=1$...
/// ```
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    #[tracing::instrument(err)]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading credentials file {}", path.display()))?;
        let store = Self::from_yaml(&raw)
            .with_context(|| format!("parsing credentials file {}", path.display()))?;
        tracing::info!(users = store.len(), "credentials loaded");
        Ok(store)
    }

    /// Parse a credentials document. Every hash must be a well-formed PHC
    /// string; a bad entry rejects the whole document.
    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let users: HashMap<String, String> = serde_yaml::from_str(raw)?;
        for (name, hash) in &users {
            password::parse_hash(hash).with_context(|| format!("user {name}"))?;
        }
        Ok(Self { users })
    }

    /// True only when `username` exists and `password` matches its hash.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let Some(hash) = self.users.get(username) else {
            return false;
        };
        match password::verify_password(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, username, "stored credential unusable");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<(String, String)> for CredentialStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}
