use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use time::UtcOffset;
use time::macros::format_description;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "AGENDA_CONFIG_PATH";

pub const DEFAULT_MANAGER_ROLES: &str = "diretoria,lideranca";
pub const DEFAULT_REMINDER_CHANNEL: &str = "avisos";
pub const DEFAULT_TICK_MINUTES: u64 = 60;

/// On-disk configuration. Every field is optional; unset fields fall back to
/// the defaults above, and each one can also be overridden per-process via
/// the matching AGENDA_* environment variable.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub manager_roles: Option<String>,
    #[serde(default)]
    pub reminder_channel: Option<String>,
    #[serde(default)]
    pub utc_offset: Option<String>,
    #[serde(default)]
    pub tick_minutes: Option<u64>,
}

/// Resolved runtime configuration, passed by reference to every component
/// that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub manager_roles: BTreeSet<String>,
    pub reminder_channel: String,
    pub utc_offset: Option<UtcOffset>,
    pub tick_minutes: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            manager_roles: parse_manager_roles(DEFAULT_MANAGER_ROLES),
            reminder_channel: DEFAULT_REMINDER_CHANNEL.to_string(),
            utc_offset: None,
            tick_minutes: DEFAULT_TICK_MINUTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CoreConfig,
    pub error: Option<AppError>,
}

/// Gateway deployment settings. The chat platform adapter needs a credential
/// pair on top of the core knobs; startup fails fast when either is missing.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub workspace_id: u64,
    pub core: CoreConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let token = std::env::var("AGENDA_TOKEN").unwrap_or_default().trim().to_string();
        if token.is_empty() {
            return Err(AppError::validation(
                "AGENDA_TOKEN must be set to the platform access token",
            ));
        }

        let workspace_raw = std::env::var("AGENDA_WORKSPACE_ID").unwrap_or_default();
        let workspace_id = parse_workspace_id(&workspace_raw)?;

        let load = load_core_config_with_fallback();
        if let Some(err) = load.error {
            return Err(err);
        }

        Ok(Self {
            token,
            workspace_id,
            core: load.config,
        })
    }
}

pub fn parse_workspace_id(raw: &str) -> Result<u64, AppError> {
    let id = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| AppError::validation("AGENDA_WORKSPACE_ID must be a positive integer"))?;
    if id == 0 {
        return Err(AppError::validation("AGENDA_WORKSPACE_ID must be a positive integer"));
    }
    Ok(id)
}

pub fn parse_manager_roles(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|role| role.trim().to_lowercase())
        .filter(|role| !role.is_empty())
        .collect()
}

pub fn parse_utc_offset(raw: &str) -> Result<UtcOffset, AppError> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), &format)
        .map_err(|_| AppError::validation(format!("invalid UTC offset '{}', expected +HH:MM", raw.trim())))
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("agenda").join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("agenda")
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the resolved configuration, degrading to defaults when the config
/// file is missing or unreadable. A read/parse failure is reported alongside
/// the defaults so callers can warn without refusing to run.
pub fn load_core_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_core_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: apply_env_overrides(ConfigFile::default()).unwrap_or_default(),
            error: Some(err),
        },
    }
}

fn load_core_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    let file = if path.exists() {
        match load_config_file(path) {
            Ok(file) => file,
            Err(err) => {
                return ConfigLoad {
                    config: apply_env_overrides(ConfigFile::default()).unwrap_or_default(),
                    error: Some(err),
                };
            }
        }
    } else {
        ConfigFile::default()
    };

    match apply_env_overrides(file) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: CoreConfig::default(),
            error: Some(err),
        },
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

fn apply_env_overrides(file: ConfigFile) -> Result<CoreConfig, AppError> {
    let roles_raw = env_override("AGENDA_MANAGER_ROLES")
        .or(file.manager_roles)
        .unwrap_or_else(|| DEFAULT_MANAGER_ROLES.to_string());
    let manager_roles = parse_manager_roles(&roles_raw);
    if manager_roles.is_empty() {
        return Err(AppError::validation("manager role list must not be empty"));
    }

    let reminder_channel = env_override("AGENDA_REMINDER_CHANNEL")
        .or(file.reminder_channel)
        .unwrap_or_else(|| DEFAULT_REMINDER_CHANNEL.to_string());

    let utc_offset = match env_override("AGENDA_UTC_OFFSET").or(file.utc_offset) {
        Some(raw) => Some(parse_utc_offset(&raw)?),
        None => None,
    };

    let tick_minutes = match env_override("AGENDA_TICK_MINUTES") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::validation("AGENDA_TICK_MINUTES must be a positive integer"))?,
        None => file.tick_minutes.unwrap_or(DEFAULT_TICK_MINUTES),
    };
    if tick_minutes == 0 {
        return Err(AppError::validation("tick interval must be at least one minute"));
    }

    Ok(CoreConfig {
        manager_roles,
        reminder_channel,
        utc_offset,
        tick_minutes,
    })
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
