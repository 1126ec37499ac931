use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::parser::ListingLayout;
use crate::query::{Category, SortSpec, ALL_LABEL};
use crate::repository::{ListingFormat, HEADER_LINES};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "LcTop";
const APP_NAME: &str = "lctop";

pub const CONFIG_ENV: &str = "LCTOP_CONFIG";
pub const DEFAULT_DATA_FILE: &str = "data/leetcodeTop.example.txt";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let default_cfg = AppConfig::default();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        tracing::info!(path = %self.paths.config_file.display(), "wrote default config");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var(CONFIG_ENV).ok().map(PathBuf::from);

        let config_dir = match &override_config {
            Some(path) if path.is_dir() => path.clone(),
            Some(path) => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| path.clone()),
            None => ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
                .context("resolving XDG project directories")?
                .config_dir()
                .to_path_buf(),
        };

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir).with_context(|| {
            format!("creating config directory {}", self.config_dir.display())
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub header_lines: usize,
    pub layout: ListingLayout,
    pub default_category: String,
    pub default_sort: SortSpec,
    pub tui: TuiOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            header_lines: HEADER_LINES,
            layout: ListingLayout::Popularity,
            default_category: ALL_LABEL.to_string(),
            default_sort: SortSpec::default(),
            tui: TuiOptions::default(),
        }
    }
}

impl AppConfig {
    fn post_load(&mut self) {
        if self.default_category.trim().is_empty() {
            tracing::warn!("empty default category in config, falling back to {ALL_LABEL}");
            self.default_category = ALL_LABEL.to_string();
        }
        if self.tui.tick_rate_ms == 0 {
            tracing::warn!("tick rate of 0ms in config, using default");
            self.tui.tick_rate_ms = TuiOptions::default().tick_rate_ms;
        }
    }

    pub fn listing_format(&self) -> ListingFormat {
        ListingFormat {
            header_lines: self.header_lines,
            layout: self.layout,
        }
    }

    pub fn default_category(&self) -> Category {
        Category::from_name(self.default_category.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiOptions {
    pub tick_rate_ms: u64,
    pub highlight_matches: bool,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            highlight_matches: true,
        }
    }
}

impl TuiOptions {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SortDirection, SortKey};
    use tempfile::TempDir;

    fn loader_in(temp: &TempDir) -> ConfigLoader {
        let config_dir = temp.path().join("config");
        ConfigLoader::with_paths(ConfigPaths {
            config_file: config_dir.join("config.toml"),
            config_dir,
        })
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them_back() -> Result<()> {
        let temp = TempDir::new()?;
        let loader = loader_in(&temp);

        let created = loader.load_or_init()?;
        assert!(loader.paths().config_file.exists());
        assert_eq!(created.header_lines, 3);

        let reloaded = loader.load()?;
        assert_eq!(reloaded.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(reloaded.layout, ListingLayout::Popularity);
        assert_eq!(reloaded.default_category(), Category::All);
        assert_eq!(reloaded.default_sort, SortSpec::default());
        Ok(())
    }

    #[test]
    fn partial_config_falls_back_to_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let loader = loader_in(&temp);
        loader.paths().ensure_directories()?;
        fs::write(
            &loader.paths().config_file,
            r#"
layout = "frequency"
default_category = "  "

[default_sort]
key = "likes"
direction = "descending"

[tui]
tick_rate_ms = 0
"#,
        )?;

        let cfg = loader.load()?;
        assert_eq!(cfg.layout, ListingLayout::Frequency);
        assert_eq!(cfg.header_lines, 3);
        assert_eq!(cfg.default_category(), Category::All);
        assert_eq!(cfg.default_sort.key, SortKey::Likes);
        assert_eq!(cfg.default_sort.direction, SortDirection::Descending);
        assert_eq!(cfg.tui.tick_rate_ms, 250);
        assert!(cfg.tui.highlight_matches);
        Ok(())
    }

    #[test]
    fn invalid_toml_is_reported() -> Result<()> {
        let temp = TempDir::new()?;
        let loader = loader_in(&temp);
        loader.paths().ensure_directories()?;
        fs::write(&loader.paths().config_file, "layout = [")?;
        let err = loader.load().expect_err("invalid toml");
        assert!(format!("{err:#}").contains("parsing config toml"));
        Ok(())
    }
}
