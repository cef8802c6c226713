use std::path::PathBuf;

use crate::models::settings::EngineSettings;
use crate::services::settings_service::SettingsUpdateInput;

use super::{AppState, CommandResult};

pub fn settings_get(state: &AppState) -> CommandResult<EngineSettings> {
    state.settings().get().map_err(Into::into)
}

pub fn settings_update(
    state: &AppState,
    payload: SettingsUpdateInput,
) -> CommandResult<EngineSettings> {
    state.settings().update(payload).map_err(Into::into)
}

pub fn settings_import_yaml(state: &AppState, path: PathBuf) -> CommandResult<EngineSettings> {
    state.settings().import_yaml(&path).map_err(Into::into)
}

pub fn settings_reset(state: &AppState) -> CommandResult<EngineSettings> {
    state.settings().reset().map_err(Into::into)
}
