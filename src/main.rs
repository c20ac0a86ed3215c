//! Splitmark - A terminal markdown editor with a synchronized live preview.
//!
//! # Usage
//!
//! ```bash
//! splitmark
//! splitmark notes.md
//! splitmark --reader --storage session.json
//! splitmark notes.md --export --export-dir site
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use splitmark::app::{App, DisplayMode};
use splitmark::config::{
    ConfigFlags, clear_config_flags, default_storage_path, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use splitmark::storage::{FileStorage, MemoryStorage, StateStore};
use splitmark::theme::{DirThemeSource, ThemeRegistry};

/// A terminal markdown editor with a synchronized live preview
#[derive(Parser, Debug)]
#[command(name = "splitmark", version, about, long_about = None)]
struct Cli {
    /// Markdown or text file to open (.md or .txt)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start in edit mode (editor only)
    #[arg(long, conflicts_with = "reader")]
    edit: bool,

    /// Start in reader mode (preview only)
    #[arg(long)]
    reader: bool,

    /// Keep the session in memory only
    #[arg(long)]
    no_persist: bool,

    /// File holding the saved document and theme
    #[arg(long, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Directory that receives export.html
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Directory of <theme>.json palette files
    #[arg(long, value_name = "DIR")]
    themes_dir: Option<PathBuf>,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write export.html and exit without starting the UI
    #[arg(long)]
    export: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn open_store(flags: &ConfigFlags) -> StateStore {
    if flags.no_persist {
        tracing::info!("persistence disabled; session kept in memory");
        return StateStore::new(Box::new(MemoryStorage::new()));
    }
    let path = flags.storage.clone().unwrap_or_else(default_storage_path);
    match FileStorage::open(&path) {
        Ok(storage) => StateStore::new(Box::new(storage)),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "storage unavailable");
            StateStore::disabled()
        }
    }
}

const fn start_mode(flags: &ConfigFlags) -> DisplayMode {
    if flags.edit {
        DisplayMode::EditOnly
    } else if flags.reader {
        DisplayMode::ReaderOnly
    } else {
        DisplayMode::Split
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "effective flags");

    let themes = ThemeRegistry::new(Box::new(DirThemeSource::new(effective.themes_dir.clone())));
    let app = App::new(open_store(&effective))
        .with_themes(themes)
        .with_mode(start_mode(&effective))
        .with_open_path(cli.file)
        .with_export_dir(effective.export_dir.clone().unwrap_or_else(|| PathBuf::from(".")))
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    if cli.export {
        let path = app.export().context("Export failed")?;
        println!("{}", path.display());
        return Ok(());
    }

    app.run().context("Application error")
}
