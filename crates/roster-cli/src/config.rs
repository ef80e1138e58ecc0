// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use roster_app::Section;
use serde::Deserialize;
use std::env;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "roster";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_RECORD_COUNT: usize = 50;
const DEFAULT_PAGE_SIZE: usize = roster_app::DEFAULT_PAGE_SIZE;
const DEFAULT_OPERATOR: &str = "Jane Doe";
const DEFAULT_LOG_LEVEL: &str = "info";
const RECORD_COUNT_RANGE: RangeInclusive<usize> = 1..=500;
const PAGE_SIZE_RANGE: RangeInclusive<usize> = 1..=100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub directory: Directory,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            directory: Directory::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Directory {
    pub record_count: Option<usize>,
    pub page_size: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            record_count: Some(DEFAULT_RECORD_COUNT),
            page_size: Some(DEFAULT_PAGE_SIZE),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub operator: Option<String>,
    pub start_page: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            operator: Some(DEFAULT_OPERATOR.to_owned()),
            start_page: Some("people".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ROSTER_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set ROSTER_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put values under [directory], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(count) = self.directory.record_count
            && !RECORD_COUNT_RANGE.contains(&count)
        {
            bail!(
                "directory.record_count in {} must be between {} and {}, got {}",
                path.display(),
                RECORD_COUNT_RANGE.start(),
                RECORD_COUNT_RANGE.end(),
                count
            );
        }

        if let Some(size) = self.directory.page_size
            && !PAGE_SIZE_RANGE.contains(&size)
        {
            bail!(
                "directory.page_size in {} must be between {} and {}, got {}",
                path.display(),
                PAGE_SIZE_RANGE.start(),
                PAGE_SIZE_RANGE.end(),
                size
            );
        }

        if let Some(page) = &self.ui.start_page
            && Section::parse(page).is_none()
        {
            bail!(
                "ui.start_page in {} must be \"overview\" or \"people\", got {page:?}",
                path.display()
            );
        }

        if let Some(operator) = &self.ui.operator
            && operator.trim().is_empty()
        {
            bail!(
                "ui.operator in {} must not be blank; remove it to use {DEFAULT_OPERATOR:?}",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!(
                "log.level in {} must not be blank; use a filter such as \"info\" or \"roster_store=debug\"",
                path.display()
            );
        }

        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.directory.record_count.unwrap_or(DEFAULT_RECORD_COUNT)
    }

    pub fn page_size(&self) -> usize {
        self.directory.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn seed(&self) -> Option<u64> {
        self.directory.seed
    }

    pub fn operator(&self) -> &str {
        self.ui.operator.as_deref().unwrap_or(DEFAULT_OPERATOR)
    }

    pub fn start_page(&self) -> Section {
        self.ui
            .start_page
            .as_deref()
            .and_then(Section::parse)
            .unwrap_or(Section::People)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# roster config\n# Place this file at: {}\n\nversion = 1\n\n[directory]\nrecord_count = {}\npage_size = {}\n# Optional. Omit for a different directory on every launch.\n# seed = 42\n\n[ui]\noperator = \"{}\"\n# \"overview\" or \"people\"\nstart_page = \"people\"\n\n[log]\n# tracing filter directive; RUST_LOG takes precedence\nlevel = \"{}\"\n# Optional. Default is platform data dir (for example ~/.local/share/roster/roster.log)\n# file = \"/absolute/path/to/roster.log\"\n",
            path.display(),
            DEFAULT_RECORD_COUNT,
            DEFAULT_PAGE_SIZE,
            DEFAULT_OPERATOR,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [log].file in the config")
    })?;
    Ok(data_root.join(APP_NAME).join("roster.log"))
}
