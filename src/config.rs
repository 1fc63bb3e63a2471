use std::env;
use std::path::PathBuf;

const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;
const DEFAULT_ANONYMOUS_TTL_SECS: i64 = 900;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub credentials_path: PathBuf,
    pub session_ttl_secs: i64,
    /// Lifetime of a session that has not signed in yet.
    pub anonymous_ttl_secs: i64,
    pub secure_cookies: bool,
}

fn parse_ttl(value: Option<String>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

impl Config {
    pub fn load() -> Self {
        Self {
            listen: env::var("CONTACTS_LISTEN").unwrap_or_else(|_| "0.0.0.0:4567".into()),
            credentials_path: env::var("CONTACTS_CREDENTIALS")
                .map_or_else(|_| PathBuf::from("users.yml"), PathBuf::from),
            session_ttl_secs: parse_ttl(
                env::var("CONTACTS_SESSION_TTL_SECS").ok(),
                DEFAULT_SESSION_TTL_SECS,
            ),
            anonymous_ttl_secs: parse_ttl(
                env::var("CONTACTS_ANONYMOUS_TTL_SECS").ok(),
                DEFAULT_ANONYMOUS_TTL_SECS,
            ),
            secure_cookies: env::var("CONTACTS_SECURE_COOKIES")
                .ok()
                .is_some_and(|v| v == "true"),
        }
    }
}
