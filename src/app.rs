//! Wires the controller and its collaborators together from a [`Config`].

use crate::api::{ApiClient, RemoteApi};
use crate::auth::AuthFlow;
use crate::config::Config;
use crate::navigation::{Navigator, StackNavigator};
use crate::notify::Notifier;
use crate::session::SessionController;
use crate::store::{FileStore, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub session: SessionController,
    pub auth: AuthFlow,
    pub api: Arc<dyn RemoteApi>,
}

impl App {
    /// File-backed store plus the HTTP client.
    pub fn from_config(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(config.resolved_store_path()));
        let api: Arc<dyn RemoteApi> = Arc::new(
            ApiClient::new(&config.api_url, config.request_timeout(), store.clone())
                .context("Failed to create API client")?,
        );
        Ok(Self::with_parts(config, store, api, notifier))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn SessionStore>,
        api: Arc<dyn RemoteApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let navigator: Arc<dyn Navigator> = Arc::new(StackNavigator::new());
        let session = SessionController::new(store, navigator, notifier, config.splash_delay());
        let auth = AuthFlow::new(api.clone(), session.clone())
            .with_toast_duration(config.toast_duration_ms);
        Self {
            config,
            session,
            auth,
            api,
        }
    }
}
