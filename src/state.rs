use chrono::Duration;
use std::sync::Arc;

use crate::auth::{AdminCredentials, SessionStore};
use crate::config::AppConfig;
use crate::services::ListingService;
use crate::store::{FileStore, PropertyStore};

/// Everything the handlers need, built once from configuration at startup and
/// injected through the router.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<AdminCredentials>,
    pub sessions: Arc<SessionStore>,
    pub listings: Arc<ListingService>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let credentials = AdminCredentials::new(
            config.admin.username.clone(),
            config.admin.password.clone(),
        );
        let sessions = SessionStore::new(Duration::hours(config.sessions.ttl_hours as i64));

        let properties = PropertyStore::connect(&config.storage.database_url).await?;
        let files = FileStore::open(
            &config.storage.upload_dir,
            config.storage.upload_limit_bytes,
        )
        .await?;
        let listings = ListingService::new(properties, files);

        Ok(Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
            listings: Arc::new(listings),
        })
    }
}
