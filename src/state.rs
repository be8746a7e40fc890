use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::models::Entity;
use crate::database::{DataAccessAdapter, Repository};

/// Shared, read-only handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub adapter: DataAccessAdapter,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let adapter = DataAccessAdapter::new(&config.database);
        Self {
            config: Arc::new(config),
            adapter,
        }
    }

    pub fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.adapter.clone(), self.config.database.schema.as_deref())
    }
}
