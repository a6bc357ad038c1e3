// File: ./src/config.rs
use crate::model::DEFAULT_TASK_KINDS;
use crate::storage::LocalStorage;
use anyhow::{Context, Result, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Deadlines up to this many days away (today included) are "due soon".
    pub due_soon_days: i64,
    /// Deadlines further away than this are not shown at all.
    pub horizon_days: i64,
    pub recent_limit: usize,
}

impl NoticeConfig {
    /// Today must always count as due soon, and the horizon cannot end
    /// before the due-soon window does.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.due_soon_days >= 0,
            "notices.due_soon_days must be 0 or more (got {})",
            self.due_soon_days
        );
        ensure!(
            self.horizon_days >= self.due_soon_days,
            "notices.horizon_days ({}) must not be smaller than notices.due_soon_days ({})",
            self.horizon_days,
            self.due_soon_days
        );
        Ok(())
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            due_soon_days: 3,
            horizon_days: 30,
            recent_limit: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub syllabus_path: Option<PathBuf>,
    pub log_level: String,
    pub task_kinds: Vec<String>,
    pub notices: NoticeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            syllabus_path: None,
            log_level: "info".to_string(),
            task_kinds: DEFAULT_TASK_KINDS.iter().map(|k| k.to_string()).collect(),
            notices: NoticeConfig::default(),
        }
    }
}

impl Config {
    pub fn get_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "syltrack", "syltrack").map(|p| p.config_dir().join("config.toml"))
    }

    /// Missing file means defaults.
    pub fn load() -> Result<Self> {
        match Self::get_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut cfg: Config = toml::from_str(content)?;
        if cfg.task_kinds.is_empty() {
            cfg.task_kinds = Self::default().task_kinds;
        }
        cfg.notices.validate()?;
        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_path().context("no config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        LocalStorage::atomic_write(path, content)?;
        Ok(())
    }

    /// `$SYLTRACK_DATA_DIR` wins over the configured directory, which wins
    /// over the platform default.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        LocalStorage::env_data_dir()
            .or_else(|| self.data_dir.clone())
            .or_else(LocalStorage::default_data_dir)
    }
}
