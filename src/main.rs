//! smart-table-tui - sortable, filterable tables in the terminal
//!
//! Loads a document (JSON element tree or CSV), mounts the smart table and
//! modal widgets on it and runs the ratatui event loop.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod markup;
mod model;
mod page;
mod table;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::markup::Document;
use crate::page::Page;
use crate::tui::Tui;
use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "smart-table-tui")]
#[command(about = "Sort and filter tables from a JSON or CSV document")]
#[command(version)]
struct Args {
    /// Document to open (.json element tree or .csv table)
    document: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective configuration to ~/.smart-table/config.json
    #[arg(long)]
    save_config: bool,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?
            .unwrap_or_default()),
        None => Ok(Config::load().unwrap_or_default()),
    }
}

/// Build the document by file extension
fn load_document(path: &Path) -> Result<Document> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Document::from_json(&text).with_context(|| format!("Failed to load {}", path.display()))
        }
        Some("csv") => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "table".to_string());
            markup::csv::table_document(file, &title)
        }
        _ => bail!(
            "Unsupported document {}: expected a .json or .csv file",
            path.display()
        ),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.to_string_lossy().to_string());
    }
    if args.save_config {
        config.save()?;
    }
    logging::init(&config, &config.log_path())?;

    let document = load_document(&args.document)?;
    let page = Page::mount(document, config.classes.clone())
        .with_context(|| format!("Failed to mount {}", args.document.display()))?;
    let title = args
        .document
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    // Setup terminal
    let mut tui = Tui::new(Duration::from_millis(config.tick_rate_ms))?;
    tui.enter()?;

    let mut app = App::new(page, title);

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!("Exiting with error: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!("Draw error: {}", e);
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = load_document(Path::new("table.xlsx")).unwrap_err();
        assert!(err.to_string().contains("expected a .json or .csv file"));
    }

    #[test]
    fn test_demo_documents_mount() {
        let doc = load_document(Path::new("demos/page.json")).unwrap();
        let page = Page::mount(doc, Default::default()).unwrap();
        assert_eq!(page.tables()[0].rows().len(), 3);
        assert!(page.tables()[0].diagnostics().is_empty());
        assert_eq!(page.modals()[0].triggers.len(), 1);

        let doc = load_document(Path::new("demos/cities.csv")).unwrap();
        let page = Page::mount(doc, Default::default()).unwrap();
        let table = &page.tables()[0];
        assert_eq!(table.rows().len(), 6);
        // Population "n/a" cannot be read as an integer
        assert_eq!(table.diagnostics().len(), 1);
        assert!(table.column(3).unwrap().search_input.is_none());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["smart-table-tui", "cities.csv", "--log-file", "/tmp/st.log"]);
        assert_eq!(args.document, PathBuf::from("cities.csv"));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/st.log")));
        assert!(args.config.is_none());
        assert!(!args.save_config);
    }

    #[test]
    fn test_missing_explicit_config_falls_back_to_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/smart-table.json"))).unwrap();
        assert_eq!(config.tick_rate_ms, 100);
    }
}
