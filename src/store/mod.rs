pub mod session;

use std::sync::Arc;

use crate::auth::credentials::CredentialStore;
use crate::config::Config;
use crate::ui::Templates;

pub use session::{SessionData, SessionHandle, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub credentials: Arc<CredentialStore>,
    pub templates: Arc<Templates>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Assemble state from loaded credentials and config. Fails only if the
    /// embedded templates do not compile.
    pub fn new(config: Config, credentials: CredentialStore) -> anyhow::Result<Self> {
        Ok(Self {
            sessions: SessionStore::new(config.session_ttl_secs)
                .with_anonymous_ttl(config.anonymous_ttl_secs),
            credentials: Arc::new(credentials),
            templates: Arc::new(Templates::load()?),
            config: Arc::new(config),
        })
    }
}
