//! Settings Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{SettingsStorePort, UserSettings};
use crate::application::queries::GetSettings;

/// GetSettings Handler
pub struct GetSettingsHandler {
    store: Arc<dyn SettingsStorePort>,
}

impl GetSettingsHandler {
    pub fn new(store: Arc<dyn SettingsStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(&self, _query: GetSettings) -> Result<UserSettings, ApplicationError> {
        Ok(self.store.load()?)
    }
}
