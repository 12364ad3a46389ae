use super::*;
use crate::catalog::{AllowList, Catalog};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn app_with_files(dir: &Path, names: &[&str]) -> App {
    for name in names {
        fs::write(dir.join(name), b"x").unwrap();
    }
    let mut catalog = Catalog::new(AllowList::default());
    for name in names {
        catalog.add_file(dir.join(name));
    }
    App::new(catalog)
}

fn message(app: &App) -> (MessageLevel, &str) {
    let m = app.message.as_ref().expect("a status message");
    (m.level, m.text.as_str())
}

#[test]
fn next_prev_wrap_around() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4", "b.mp4", "c.mp4"]);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn navigation_on_empty_catalog_is_a_no_op() {
    let mut app = App::new(Catalog::default());
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(app.selected_entry().is_none());
}

#[test]
fn add_file_prompt_adds_and_selects() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4"]);
    fs::write(dir.path().join("b.mkv"), b"x").unwrap();

    app.begin_prompt(PromptKind::AddFile);
    for c in dir.path().join("b.mkv").to_str().unwrap().chars() {
        app.push_prompt_char(c);
    }
    app.submit_prompt();

    assert!(app.prompt.is_none());
    assert_eq!(app.entries().len(), 2);
    assert_eq!(app.selected, 1);
    assert_eq!(message(&app), (MessageLevel::Info, "Added b.mkv"));
}

#[test]
fn add_file_reports_duplicates_and_unsupported_types() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4"]);
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    app.add_file_input(dir.path().join("a.mp4").to_str().unwrap());
    assert_eq!(
        message(&app),
        (MessageLevel::Warning, "Media file already added: a.mp4")
    );

    app.add_file_input(dir.path().join("notes.txt").to_str().unwrap());
    assert_eq!(
        message(&app),
        (MessageLevel::Error, "Unsupported file type: notes.txt")
    );
    assert_eq!(app.entries().len(), 1);
}

#[test]
fn add_file_refuses_names_with_line_breaks() {
    let dir = tempdir().unwrap();
    let mut app = App::new(Catalog::default());
    let path = dir.path().join("a\nb.mp4");
    fs::write(&path, b"x").unwrap();

    app.add_file_input(path.to_str().unwrap());
    assert_eq!(message(&app).0, MessageLevel::Error);
    assert!(message(&app).1.starts_with("File names with line breaks"));
    assert!(app.entries().is_empty());
}

#[test]
fn add_file_that_does_not_exist_is_reported() {
    let dir = tempdir().unwrap();
    let mut app = App::new(Catalog::default());
    app.add_file_input(dir.path().join("nope.mp4").to_str().unwrap());
    assert_eq!(message(&app).0, MessageLevel::Error);
    assert!(app.entries().is_empty());
}

#[test]
fn add_folder_summarizes_and_reports_empty_folders() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp4"), b"x").unwrap();
    fs::write(dir.path().join("b.txt"), b"x").unwrap();
    fs::write(dir.path().join("c.mkv"), b"x").unwrap();
    let mut app = App::new(Catalog::default());

    app.add_folder_input(dir.path().to_str().unwrap());
    assert_eq!(app.entries().len(), 2);
    assert_eq!(message(&app).0, MessageLevel::Info);

    app.add_folder_input(dir.path().to_str().unwrap());
    assert_eq!(app.entries().len(), 2);
    assert_eq!(message(&app).0, MessageLevel::Warning);

    let empty = tempdir().unwrap();
    app.add_folder_input(empty.path().to_str().unwrap());
    assert_eq!(
        message(&app),
        (
            MessageLevel::Info,
            "No valid media files found in the selected folder."
        )
    );
}

#[test]
fn search_highlights_matches_and_rejects_blank_terms() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["Alien.mp4", "Heat.mkv", "Aliens.avi"]);

    app.search("ALIEN");
    assert_eq!(
        app.highlighted,
        vec![dir.path().join("Alien.mp4"), dir.path().join("Aliens.avi")]
    );
    assert!(app.is_highlighted(&dir.path().join("Aliens.avi")));
    assert!(!app.is_highlighted(&dir.path().join("Heat.mkv")));
    assert_eq!(app.last_search.as_deref(), Some("ALIEN"));

    app.search("  ");
    assert!(app.highlighted.is_empty());
    assert_eq!(
        message(&app),
        (MessageLevel::Error, "Please enter a valid search term.")
    );
}

#[test]
fn search_prompt_starts_from_previous_term() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["Heat.mkv"]);
    app.search("heat");
    app.begin_prompt(PromptKind::Search);
    assert_eq!(app.prompt.as_ref().unwrap().buffer, "heat");
}

#[test]
fn search_moves_cursor_to_first_match() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4", "b.mp4", "target.mp4"]);
    app.search("target");
    assert_eq!(app.selected, 2);
}

#[test]
fn delete_requires_confirmation() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4", "b.mp4"]);
    app.select_last();

    app.request_delete();
    assert!(app.confirm_delete);
    app.confirm_delete(false);
    assert!(!app.confirm_delete);
    assert_eq!(app.entries().len(), 2);

    app.request_delete();
    app.confirm_delete(true);
    assert_eq!(app.entries().len(), 1);
    assert_eq!(app.selected, 0);
    assert_eq!(message(&app), (MessageLevel::Info, "Removed b.mp4"));
    // The file itself stays on disk.
    assert!(dir.path().join("b.mp4").is_file());
}

#[test]
fn delete_drops_highlight_of_removed_entry() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4"]);
    app.search("a");
    app.request_delete();
    app.confirm_delete(true);
    assert!(app.highlighted.is_empty());
}

#[test]
fn rename_prompt_prefills_and_renames_on_disk() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["old.mp4"]);
    app.search("old");

    app.begin_prompt(PromptKind::Rename);
    assert_eq!(app.prompt.as_ref().unwrap().buffer, "old.mp4");
    for _ in 0.."old.mp4".len() {
        app.pop_prompt_char();
    }
    for c in "new.mp4".chars() {
        app.push_prompt_char(c);
    }
    app.submit_prompt();

    assert_eq!(app.entries()[0].path, dir.path().join("new.mp4"));
    assert!(dir.path().join("new.mp4").is_file());
    assert_eq!(app.highlighted, vec![dir.path().join("new.mp4")]);
    assert_eq!(message(&app), (MessageLevel::Info, "Renamed to new.mp4"));
}

#[test]
fn failed_rename_is_reported_and_entry_kept() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["a.mp4"]);
    fs::remove_file(dir.path().join("a.mp4")).unwrap();

    app.rename_selected("b.mp4");
    assert_eq!(message(&app).0, MessageLevel::Error);
    assert!(message(&app).1.starts_with("Error renaming file"));
    assert_eq!(app.entries()[0].path, dir.path().join("a.mp4"));
}

#[test]
fn rename_without_selection_does_not_open_prompt() {
    let mut app = App::new(Catalog::default());
    app.begin_prompt(PromptKind::Rename);
    assert!(app.prompt.is_none());
    assert_eq!(message(&app).0, MessageLevel::Warning);
}

#[test]
fn cancel_prompt_discards_input() {
    let mut app = App::new(Catalog::default());
    app.begin_prompt(PromptKind::AddFolder);
    app.push_prompt_char('x');
    app.cancel_prompt();
    app.submit_prompt();
    assert!(app.prompt.is_none());
    assert!(app.message.is_none());
}

#[test]
fn resolve_input_path_trims_and_makes_absolute() {
    let p = resolve_input_path("  relative/clip.mp4 ");
    assert!(p.is_absolute());
    assert!(p.ends_with("relative/clip.mp4"));

    assert_eq!(
        resolve_input_path("/films/a.mp4"),
        PathBuf::from("/films/a.mp4")
    );
}

#[test]
fn escape_clears_highlights_then_message_then_closes_player() {
    let dir = tempdir().unwrap();
    let mut app = app_with_files(dir.path(), &["alpha.mp4", "beta.mp4"]);
    app.now_playing = Some(NowPlaying {
        path: dir.path().join("alpha.mp4"),
        time_ms: 0,
        length_ms: None,
    });
    app.search("alpha");
    assert!(!app.highlighted.is_empty());
    assert!(app.message.is_some());

    assert!(!app.escape());
    assert!(app.highlighted.is_empty());
    assert!(app.message.is_some());

    assert!(!app.escape());
    assert!(app.message.is_none());

    assert!(app.escape());
}

#[test]
fn escape_without_player_never_asks_to_close() {
    let mut app = App::new(Catalog::default());
    assert!(!app.escape());
}
