//! Configuration for the task store and the command-line front end.
//!
//! Settings are stored as pretty-printed JSON in the data directory and can
//! be overridden from the environment (a `.env` file is loaded by the binary
//! before anything reads the configuration).
//!
//! ## Environment overrides
//!
//! - `DATA_DIR`: directory holding the database and `config.json`
//! - `DB_FILE`: explicit database path
//! - `UNDO_HISTORY_LIMIT`: number of undo steps kept per owner
//! - `HARBOR_OWNER`: owner id used by the CLI
//!
//! ```rust,no_run
//! use todo_harbor::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("undo steps kept: {}", config.undo_history_limit);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "todos.db";
pub const DEFAULT_UNDO_HISTORY_LIMIT: usize = 20;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Owner the CLI acts for. The core itself never assumes an owner.
    pub owner_id: i64,

    /// Undo steps kept per owner; older snapshots are pruned.
    pub undo_history_limit: usize,

    /// Default page size for `list`.
    pub page_size: u32,

    /// Explicit database path; the data directory is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            owner_id: 1,
            undo_history_limit: DEFAULT_UNDO_HISTORY_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            db_file: None,
        }
    }
}

impl Config {
    /// Loads `config.json` (or defaults when it does not exist) and applies
    /// environment overrides.
    pub fn read() -> Result<Config> {
        Ok(Self::read_file()?.with_env_overrides())
    }

    fn read_file() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Applies `UNDO_HISTORY_LIMIT`, `HARBOR_OWNER` and `DB_FILE`.
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(limit) = env::var("UNDO_HISTORY_LIMIT").ok().and_then(|v| v.trim().parse().ok()) {
            self.undo_history_limit = limit;
        }
        if let Some(owner) = env::var("HARBOR_OWNER").ok().and_then(|v| v.trim().parse().ok()) {
            self.owner_id = owner;
        }
        if let Ok(path) = env::var("DB_FILE") {
            if !path.trim().is_empty() {
                self.db_file = Some(PathBuf::from(path));
            }
        }
        self
    }

    /// Database location: `db_file` if configured, else `todos.db` in the data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db_file {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Ok(path.clone())
            }
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }

    /// Interactive setup wizard, seeded with the current file values.
    pub fn init() -> Result<Self> {
        let current = Self::read_file().unwrap_or_default();
        msg_print!(Message::ConfigWizardHeader, true);

        let owner_id: i64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptOwnerId.to_string())
            .default(current.owner_id)
            .validate_with(|value: &i64| if *value > 0 { Ok(()) } else { Err(Message::OwnerMustBePositive.to_string()) })
            .interact_text()?;

        let undo_history_limit: usize = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptUndoHistoryLimit.to_string())
            .default(current.undo_history_limit)
            .interact_text()?;

        let page_size: u32 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPageSize.to_string())
            .default(current.page_size)
            .validate_with(|value: &u32| {
                if (1..=MAX_PAGE_SIZE).contains(value) {
                    Ok(())
                } else {
                    Err(Message::PageSizeOutOfRange(MAX_PAGE_SIZE).to_string())
                }
            })
            .interact_text()?;

        Ok(Config {
            owner_id,
            undo_history_limit: undo_history_limit.max(1),
            page_size,
            db_file: current.db_file,
        })
    }
}
