use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that can be saved as defaults and merged with the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub edit: bool,
    pub reader: bool,
    pub no_persist: bool,
    pub storage: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub themes_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`. Paths in `other` win; a start mode named
    /// in `other` replaces the one in `self`.
    pub fn union(&self, other: &Self) -> Self {
        let (edit, reader) = if other.edit || other.reader {
            (other.edit, other.reader)
        } else {
            (self.edit, self.reader)
        };
        Self {
            edit,
            reader,
            no_persist: self.no_persist || other.no_persist,
            storage: other.storage.clone().or_else(|| self.storage.clone()),
            export_dir: other.export_dir.clone().or_else(|| self.export_dir.clone()),
            themes_dir: other.themes_dir.clone().or_else(|| self.themes_dir.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("splitmark"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("splitmark"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("splitmark"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join("splitmark"));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".splitmarkrc")
}

/// Where the document and theme selection persist between sessions.
pub fn default_storage_path() -> PathBuf {
    config_dir().map_or_else(
        || PathBuf::from(".splitmark-storage.json"),
        |dir| dir.join("storage.json"),
    )
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# splitmark defaults (saved with --save)".to_string());
    if flags.edit {
        lines.push("--edit".to_string());
    }
    if flags.reader {
        lines.push("--reader".to_string());
    }
    if flags.no_persist {
        lines.push("--no-persist".to_string());
    }
    let paths = [
        ("--storage", &flags.storage),
        ("--export-dir", &flags.export_dir),
        ("--themes-dir", &flags.themes_dir),
        ("--log-file", &flags.log_file),
    ];
    for (flag, value) in paths {
        if let Some(value) = value {
            lines.push(format!("{flag} {}", value.display()));
        }
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of raw arguments or config file tokens. Anything
/// else, including positional arguments, is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--edit" => {
                flags.edit = true;
                flags.reader = false;
            }
            "--reader" => {
                flags.reader = true;
                flags.edit = false;
            }
            "--no-persist" => flags.no_persist = true,
            _ => {
                let (name, inline) = match token.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (token, None),
                };
                let Some(slot) = path_slot(&mut flags, name) else {
                    i += 1;
                    continue;
                };
                if let Some(value) = inline {
                    *slot = Some(PathBuf::from(value));
                } else if let Some(next) = tokens.get(i + 1) {
                    *slot = Some(PathBuf::from(next));
                    i += 1;
                }
            }
        }
        i += 1;
    }
    flags
}

fn path_slot<'a>(flags: &'a mut ConfigFlags, name: &str) -> Option<&'a mut Option<PathBuf>> {
    match name {
        "--storage" => Some(&mut flags.storage),
        "--export-dir" => Some(&mut flags.export_dir),
        "--themes-dir" => Some(&mut flags.themes_dir),
        "--log-file" => Some(&mut flags.log_file),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "splitmark".to_string(),
            "--reader".to_string(),
            "--no-persist".to_string(),
            "--storage".to_string(),
            "state.json".to_string(),
            "--themes-dir=themes".to_string(),
            "--export".to_string(),
            "README.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.reader);
        assert!(!flags.edit);
        assert!(flags.no_persist);
        assert_eq!(flags.storage, Some(PathBuf::from("state.json")));
        assert_eq!(flags.themes_dir, Some(PathBuf::from("themes")));
        assert_eq!(flags.export_dir, None);
    }

    #[test]
    fn test_last_mode_flag_wins() {
        let args = vec!["--edit".to_string(), "--reader".to_string()];
        let flags = parse_flag_tokens(&args);
        assert!(flags.reader);
        assert!(!flags.edit);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            edit: true,
            no_persist: true,
            export_dir: Some(PathBuf::from("out")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            reader: true,
            export_dir: Some(PathBuf::from("site")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.reader);
        assert!(!merged.edit, "cli mode replaces the saved one");
        assert!(merged.no_persist);
        assert_eq!(merged.export_dir, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".splitmarkrc");
        let flags = ConfigFlags {
            edit: true,
            no_persist: true,
            storage: Some(PathBuf::from("state.json")),
            export_dir: Some(PathBuf::from("out")),
            themes_dir: Some(PathBuf::from("themes")),
            log_file: Some(PathBuf::from("splitmark.log")),
            ..ConfigFlags::default()
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_storage_path_sits_beside_config() {
        let storage = default_storage_path();
        assert!(
            storage
                .file_name()
                .is_some_and(|name| name.to_string_lossy().contains("storage"))
        );
    }
}
