//! Settings Command Handlers

use std::sync::Arc;

use crate::application::commands::settings_commands::UpdateSettingsCommand;
use crate::application::error::ApplicationError;
use crate::application::ports::{SettingsStorePort, UserSettings};

/// UpdateSettings Handler - 读取、修改并整体保存
pub struct UpdateSettingsHandler {
    store: Arc<dyn SettingsStorePort>,
}

impl UpdateSettingsHandler {
    pub fn new(store: Arc<dyn SettingsStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(&self, cmd: UpdateSettingsCommand) -> Result<UserSettings, ApplicationError> {
        let mut settings = self.store.load()?;

        if let Some(key) = cmd.speech_key {
            settings.speech_key = key;
        }
        if let Some(region) = cmd.speech_region {
            settings.speech_region = region;
        }
        if let Some(auto_name) = cmd.auto_generate_file_name {
            settings.auto_generate_file_name = auto_name;
        }
        if let Some(auto_open) = cmd.auto_open_file_folder_after_downloading {
            settings.auto_open_file_folder_after_downloading = auto_open;
        }
        if let Some(save_to) = cmd.save_to {
            settings.save_to = save_to;
        }

        self.store.save(&settings)?;
        tracing::info!(region = %settings.speech_region, "Settings updated");
        Ok(settings)
    }
}
