use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cinema_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CINEMA_CONFIG_PATH", "/tmp/cinema-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/cinema-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("cinema")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cinema")
            .join("config.toml")
    );
}

#[test]
fn catalog_path_defaults_to_xdg_data_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");

    let s = Settings::default();
    assert_eq!(
        s.catalog_path(),
        PathBuf::from("/tmp/xdg-data")
            .join("cinema")
            .join(super::CATALOG_FILE_NAME)
    );
}

#[test]
fn catalog_path_setting_wins_over_xdg() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");

    let mut s = Settings::default();
    s.catalog.path = Some(PathBuf::from("/srv/films/catalog.txt"));
    assert_eq!(s.catalog_path(), PathBuf::from("/srv/films/catalog.txt"));
}

#[test]
fn log_path_falls_back_to_home_state_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let s = Settings::default();
    assert_eq!(
        s.log_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/state/cinema/cinema.log")
    );
}

#[test]
fn defaults_match_the_original_allow_list_and_seek_step() {
    let s = Settings::default();
    assert_eq!(s.catalog.extensions, vec!["mp4", "mkv", "avi"]);
    assert_eq!(s.player.seek_ms, 10_000);
    assert_eq!(s.player.binary, "mpv");
    assert_eq!(s.ui.header_text, "THE CINEMA PLAYER");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_seek_and_empty_allow_list() {
    let mut s = Settings::default();
    s.player.seek_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.catalog.extensions = vec![" ".into(), ".".into()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.startup_timeout_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
path = "/tmp/films.txt"
extensions = ["mp4", "webm"]

[player]
binary = "/usr/local/bin/mpv"
extra_args = ["--fs"]
seek_ms = 5000
startup_timeout_ms = 750

[ui]
header_text = "hello"

[log]
file = "/tmp/cinema.log"
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CINEMA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CINEMA__PLAYER__SEEK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.path, Some(PathBuf::from("/tmp/films.txt")));
    assert_eq!(s.catalog.extensions, vec!["mp4".to_string(), "webm".to_string()]);
    assert_eq!(s.player.binary, "/usr/local/bin/mpv");
    assert_eq!(s.player.extra_args, vec!["--fs".to_string()]);
    assert_eq!(s.player.seek_ms, 5000);
    assert_eq!(s.player.startup_timeout_ms, 750);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.log.file, Some(PathBuf::from("/tmp/cinema.log")));
    assert_eq!(s.log.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
seek_ms = 10000
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CINEMA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CINEMA__PLAYER__SEEK_MS", "2500");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.seek_ms, 2500);
}

#[test]
fn settings_env_lists_are_comma_separated() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "CINEMA_CONFIG_PATH",
        dir.path().join("missing.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::set("CINEMA__CATALOG__EXTENSIONS", "mp4,webm");
    let _g3 = EnvGuard::set("CINEMA__PLAYER__EXTRA_ARGS", "--fs");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.extensions, vec!["mp4".to_string(), "webm".to_string()]);
    assert_eq!(s.player.extra_args, vec!["--fs".to_string()]);
    assert_eq!(s.player.seek_ms, PlayerSettings::default().seek_ms);
}
