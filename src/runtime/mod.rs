use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::catalog::CatalogStore;
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod player;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings);

    let store = CatalogStore::new(startup::catalog_path(&settings));
    let (mut app, save_on_exit) = startup::load_app(&store, &settings);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mpris,
        &control_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // A failed save is reported but never blocks exit.
    if save_on_exit {
        if let Err(e) = store.save(app.entries()) {
            error!("{e}");
            eprintln!("cinema: error saving media files: {e}");
        }
    } else {
        info!("skipping save of {}", store.path().display());
    }

    run_result
}
