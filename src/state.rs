use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    AuthService, BoardService, SeaOrmAuthService, SeaOrmBoardService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub board_service: Arc<dyn BoardService>,

    pub auth_service: Arc<dyn AuthService>,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        Self::with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let security = config.security.clone();
        let config_arc = Arc::new(RwLock::new(config));

        let board_service: Arc<dyn BoardService> =
            Arc::new(SeaOrmBoardService::new(store.clone(), event_bus.clone()));

        let auth_service: Arc<dyn AuthService> =
            Arc::new(SeaOrmAuthService::new(store.clone(), security));

        Ok(Self {
            config: config_arc,
            store,
            board_service,
            auth_service,
            event_bus,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
