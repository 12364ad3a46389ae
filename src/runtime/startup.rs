use std::path::PathBuf;

use log::{error, info};

use crate::app::App;
use crate::catalog::{AllowList, Catalog, CatalogStore};
use crate::config;

/// Catalog file: first CLI argument, else the configured/default location.
pub fn catalog_path(settings: &config::Settings) -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.catalog_path())
}

/// Load the stored catalog into a fresh `App`.
///
/// Returns whether saving at shutdown is safe: if the stored file exists but
/// could not be read, writing the (empty) in-memory catalog over it would
/// destroy it.
pub fn load_app(store: &CatalogStore, settings: &config::Settings) -> (App, bool) {
    let allow = AllowList::from_settings(&settings.catalog);
    let (catalog, load_error) = match store.load() {
        Ok(entries) => (Catalog::with_entries(entries, allow), None),
        Err(e) => {
            error!("{e}");
            (Catalog::new(allow), Some(e))
        }
    };

    let mut app = App::new(catalog);
    app.set_catalog_path(store.path());
    let save_on_exit = match load_error {
        Some(e) => {
            app.error(format!(
                "Error loading media files: {e} (changes will not be saved)"
            ));
            false
        }
        None => {
            info!("catalog ready with {} entries", app.entries().len());
            true
        }
    };
    (app, save_on_exit)
}
