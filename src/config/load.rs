use std::{env, path::PathBuf};

use super::schema::Settings;

/// Name of the catalog file, kept from the first releases so old catalogs still load.
pub const CATALOG_FILE_NAME: &str = "mediaFiles.txt";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CINEMA__`), then an
/// optional config file and falls back to struct defaults. List keys take
/// comma-separated values from the environment.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CINEMA")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("catalog.extensions")
                .with_list_parse_key("player.extra_args"),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.player.seek_ms == 0 {
            return Err("player.seek_ms must be >= 1".to_string());
        }
        if self.player.startup_timeout_ms == 0 {
            return Err("player.startup_timeout_ms must be >= 1".to_string());
        }
        if self
            .catalog
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("catalog.extensions must name at least one extension".to_string());
        }
        Ok(())
    }

    /// Catalog location: explicit setting, else the XDG data dir, else the working directory.
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .path
            .clone()
            .or_else(|| data_home().map(|d| d.join("cinema").join(CATALOG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CATALOG_FILE_NAME))
    }

    /// Log file location: explicit setting, else the XDG state dir.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log
            .file
            .clone()
            .or_else(|| state_home().map(|d| d.join("cinema").join("cinema.log")))
    }
}

/// Resolve the config path from `CINEMA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CINEMA_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cinema/config.toml`
/// or `~/.config/cinema/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("cinema").join("config.toml"))
}

fn data_home() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

fn state_home() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"])
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg));
    }
    env::var_os("HOME").map(|home| {
        home_fallback
            .iter()
            .fold(PathBuf::from(home), |acc, part| acc.join(part))
    })
}
