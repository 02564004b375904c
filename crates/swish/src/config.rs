use crate::desktop::{AppQuery, ExecCommand};
use crate::sys::wm::WindowClass;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Which screen edge the strip hugs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    #[strum(serialize = "Top", serialize = "t")]
    Top,
    #[strum(serialize = "Center", serialize = "c")]
    Center,
    #[default]
    #[strum(serialize = "Bottom", serialize = "b")]
    Bottom,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub app: AppQuery,
    pub class: Option<WindowClass>,
    pub exec: Option<ExecCommand>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StripConfig {
    pub slots: usize,
    pub initial_slot: Option<usize>,
    pub edge: Edge,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            slots: 5,
            initial_slot: None,
            edge: Edge::Bottom,
        }
    }
}

impl StripConfig {
    /// Unset means the middle slot.
    pub fn initial_slot(&self) -> usize {
        self.initial_slot.unwrap_or(self.slots / 2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.slots == 0 {
            return Err(ConfigError::NoSlots);
        }
        if let Some(initial_slot) = self.initial_slot
            && initial_slot >= self.slots
        {
            return Err(ConfigError::InitialSlotOutOfRange {
                initial_slot,
                slots: self.slots,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    #[serde(default)]
    pub strip: StripConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("strip.slots must be at least 1")]
    NoSlots,
    #[error("strip.initial_slot {initial_slot} is outside the {slots} slot window")]
    InitialSlotOutOfRange { initial_slot: usize, slots: usize },
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "swish", "swish").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("SWISH"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.strip.validate()?;
    Ok(config)
}

fn setup_config() -> Config {
    Config {
        items: vec![ItemConfig {
            app: AppQuery::from("Setup".to_string()),
            class: Some(WindowClass::from("swish-setup".to_string())),
            exec: Some(ExecCommand::from("SWISH_SETUP".to_string())),
        }],
        strip: StripConfig::default(),
    }
}

/// A missing or broken config still has to produce something the strip can
/// show, so fall back to a single seeded setup entry.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return setup_config();
    }

    match load_config() {
        Ok(c) if !c.items.is_empty() => c,
        Ok(_) => {
            log::warn!("config has no items, falling back to setup entry");
            setup_config()
        }
        Err(e) => {
            log::error!("failed to load config: {}", e);
            setup_config()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
