use std::fs;

use log::info;

use crate::config::Settings;

/// Send `log` output to the log file; the terminal belongs to the TUI.
///
/// `RUST_LOG` wins over `log.level`. When the file cannot be created logging
/// stays off.
pub fn init(settings: &Settings) {
    let Some(path) = settings.log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match fs::File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "cinema: cannot create log file {}: {e}; logging disabled",
                path.display()
            );
            return;
        }
    };

    let env = env_logger::Env::default().default_filter_or(settings.log.level.as_str());
    if let Err(e) = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
    {
        eprintln!("cinema: logger already initialized: {e}");
        return;
    }

    info!("logging to {}", path.display());
}
