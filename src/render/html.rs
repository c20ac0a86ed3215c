use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use comrak::Options;
use regex::Regex;

/// File name written by [`export_html`].
pub const EXPORT_FILE_NAME: &str = "export.html";

static ANCHOR_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a\s+href=").expect("anchor pattern is valid"));

/// Render markdown to an HTML fragment.
///
/// Every link opens in a new browsing context. Never fails: any string is
/// valid markdown.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::default();
    super::configure(&mut options);
    let html = comrak::markdown_to_html(source, &options);
    ANCHOR_OPEN
        .replace_all(&html, r#"<a target="_blank" href="#)
        .into_owned()
}

/// Render `source` and write it to `dir/export.html`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn export_html(source: &str, dir: &Path) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export dir {}", dir.display()))?;
    }
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, markdown_to_html(source))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported HTML");
    Ok(path)
}
