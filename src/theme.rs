//! Editor themes.
//!
//! The theme list is fixed. Choosing a theme other than [`DEFAULT_THEME`]
//! loads its palette on demand: a `<name>.json` file from the themes
//! directory when one exists, otherwise a built-in palette. Each palette
//! is loaded at most once per session.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Sentinel for the built-in look; never loaded.
pub const DEFAULT_THEME: &str = "default";

pub const THEMES: &[&str] = &[
    "3024-day",
    "3024-night",
    "abcdef",
    "ambiance-mobile",
    "ambiance",
    "base16-dark",
    "base16-light",
    "bespin",
    "blackboard",
    "cobalt",
    "colorforth",
    "darcula",
    "dracula",
    "duotone-dark",
    "duotone-light",
    "eclipse",
    "elegant",
    "erlang-dark",
    "gruvbox-dark",
    "hopscotch",
    "icecoder",
    "idea",
    "isotope",
    "lesser-dark",
    "liquibyte",
    "lucario",
    "material",
    "mbo",
    "mdn-like",
    "midnight",
    "monokai",
    "neat",
    "neo",
    "night",
    "oceanic-next",
    "panda-syntax",
    "paraiso-dark",
    "paraiso-light",
    "pastel-on-dark",
    "railscasts",
    "rubyblue",
    "seti",
    "shadowfox",
    "solarized",
    "ssms",
    "the-matrix",
    "tomorrow-night-bright",
    "tomorrow-night-eighties",
    "ttcn",
    "twilight",
    "vibrant-ink",
    "xq-dark",
    "xq-light",
    "yeti",
    "zenburn",
];

const LIGHT_THEMES: &[&str] = &[
    "3024-day",
    "base16-light",
    "duotone-light",
    "eclipse",
    "elegant",
    "idea",
    "mdn-like",
    "neat",
    "neo",
    "paraiso-light",
    "ssms",
    "ttcn",
    "xq-light",
    "yeti",
];

/// Whether `name` is the default or one of [`THEMES`].
pub fn is_known_theme(name: &str) -> bool {
    name == DEFAULT_THEME || THEMES.contains(&name)
}

/// Every selectable theme, default first.
pub fn selectable_themes() -> impl Iterator<Item = &'static str> {
    std::iter::once(DEFAULT_THEME).chain(THEMES.iter().copied())
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("theme {name} is not a valid palette: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A 24-bit color, written as `#rrggbb` in palette files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got {value:?}"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|err| format!("{value:?}: {err}"))
        };
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Colors applied to the editor pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub gutter: Rgb,
    pub cursor: Rgb,
    pub accent: Rgb,
}

impl Palette {
    pub const DARK: Self = Self {
        background: Rgb(0x26, 0x26, 0x26),
        foreground: Rgb(0xd0, 0xd0, 0xd0),
        gutter: Rgb(0x6c, 0x6c, 0x6c),
        cursor: Rgb(0xff, 0xff, 0xff),
        accent: Rgb(0x87, 0xaf, 0xd7),
    };

    pub const LIGHT: Self = Self {
        background: Rgb(0xfa, 0xfa, 0xfa),
        foreground: Rgb(0x30, 0x30, 0x30),
        gutter: Rgb(0x99, 0x99, 0x99),
        cursor: Rgb(0x00, 0x00, 0x00),
        accent: Rgb(0x00, 0x55, 0xaa),
    };
}

/// Palette shipped with the binary for `name`.
pub fn builtin_palette(name: &str) -> Palette {
    match name {
        "dracula" => Palette {
            background: Rgb(0x28, 0x2a, 0x36),
            foreground: Rgb(0xf8, 0xf8, 0xf2),
            gutter: Rgb(0x62, 0x72, 0xa4),
            cursor: Rgb(0xf8, 0xf8, 0xf0),
            accent: Rgb(0xff, 0x79, 0xc6),
        },
        "monokai" => Palette {
            background: Rgb(0x27, 0x28, 0x22),
            foreground: Rgb(0xf8, 0xf8, 0xf2),
            gutter: Rgb(0x75, 0x71, 0x5e),
            cursor: Rgb(0xf8, 0xf8, 0xf0),
            accent: Rgb(0xa6, 0xe2, 0x2e),
        },
        "solarized" => Palette {
            background: Rgb(0x00, 0x2b, 0x36),
            foreground: Rgb(0x83, 0x94, 0x96),
            gutter: Rgb(0x58, 0x6e, 0x75),
            cursor: Rgb(0x81, 0x90, 0x90),
            accent: Rgb(0x26, 0x8b, 0xd2),
        },
        "material" => Palette {
            background: Rgb(0x26, 0x32, 0x38),
            foreground: Rgb(0xee, 0xff, 0xff),
            gutter: Rgb(0x54, 0x6e, 0x7a),
            cursor: Rgb(0xff, 0xcc, 0x00),
            accent: Rgb(0x89, 0xdd, 0xff),
        },
        "gruvbox-dark" => Palette {
            background: Rgb(0x28, 0x28, 0x28),
            foreground: Rgb(0xeb, 0xdb, 0xb2),
            gutter: Rgb(0x7c, 0x6f, 0x64),
            cursor: Rgb(0xeb, 0xdb, 0xb2),
            accent: Rgb(0xfa, 0xbd, 0x2f),
        },
        "zenburn" => Palette {
            background: Rgb(0x3f, 0x3f, 0x3f),
            foreground: Rgb(0xdc, 0xdc, 0xcc),
            gutter: Rgb(0x7f, 0x9f, 0x7f),
            cursor: Rgb(0xff, 0xff, 0xff),
            accent: Rgb(0xf0, 0xdf, 0xaf),
        },
        "the-matrix" => Palette {
            background: Rgb(0x00, 0x00, 0x00),
            foreground: Rgb(0x00, 0xff, 0x00),
            gutter: Rgb(0x00, 0x88, 0x00),
            cursor: Rgb(0x00, 0xff, 0x00),
            accent: Rgb(0x99, 0xff, 0x99),
        },
        "cobalt" => Palette {
            background: Rgb(0x00, 0x22, 0x40),
            foreground: Rgb(0xff, 0xff, 0xff),
            gutter: Rgb(0xd0, 0xd0, 0xd0),
            cursor: Rgb(0xff, 0xff, 0xff),
            accent: Rgb(0xff, 0xee, 0x80),
        },
        _ if LIGHT_THEMES.contains(&name) => Palette::LIGHT,
        _ => Palette::DARK,
    }
}

/// Where palettes come from.
pub trait ThemeSource {
    /// Load the palette for `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if a palette file exists but cannot be read or parsed.
    fn fetch(&mut self, name: &str) -> Result<Palette, ThemeError>;
}

/// Reads `<dir>/<name>.json`, falling back to [`builtin_palette`].
#[derive(Debug, Clone, Default)]
pub struct DirThemeSource {
    dir: Option<PathBuf>,
}

impl DirThemeSource {
    pub const fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }
}

impl ThemeSource for DirThemeSource {
    fn fetch(&mut self, name: &str) -> Result<Palette, ThemeError> {
        let Some(dir) = &self.dir else {
            return Ok(builtin_palette(name));
        };
        let path = dir.join(format!("{name}.json"));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(builtin_palette(name));
            }
            Err(source) => {
                return Err(ThemeError::Io {
                    name: name.to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ThemeError::Parse {
            name: name.to_string(),
            source,
        })
    }
}

/// Loaded palettes for the session.
pub struct ThemeRegistry {
    source: Box<dyn ThemeSource>,
    loaded: HashMap<String, Palette>,
    loads: usize,
}

impl std::fmt::Debug for ThemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeRegistry")
            .field("loaded", &self.loaded.keys().collect::<Vec<_>>())
            .field("loads", &self.loads)
            .finish_non_exhaustive()
    }
}

impl ThemeRegistry {
    pub fn new(source: Box<dyn ThemeSource>) -> Self {
        Self {
            source,
            loaded: HashMap::new(),
            loads: 0,
        }
    }

    /// Ensure `name`'s palette is loaded. The default theme and themes
    /// already loaded are skipped. A broken palette file is logged and
    /// replaced by the built-in palette; either way the theme counts as
    /// loaded.
    pub fn load(&mut self, name: &str) {
        if name == DEFAULT_THEME || self.loaded.contains_key(name) {
            return;
        }
        self.loads += 1;
        let palette = self.source.fetch(name).unwrap_or_else(|err| {
            tracing::warn!(theme = name, error = %err, "falling back to built-in palette");
            builtin_palette(name)
        });
        tracing::debug!(theme = name, "loaded theme");
        self.loaded.insert(name.to_string(), palette);
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Number of palettes fetched this session.
    pub const fn load_count(&self) -> usize {
        self.loads
    }

    /// Palette to draw with: the loaded one, or `None` for the default look.
    pub fn palette(&self, name: &str) -> Option<Palette> {
        self.loaded.get(name).copied()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(Box::new(DirThemeSource::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::tempdir;

    struct CountingSource(Rc<Cell<usize>>);

    impl ThemeSource for CountingSource {
        fn fetch(&mut self, name: &str) -> Result<Palette, ThemeError> {
            self.0.set(self.0.get() + 1);
            Ok(builtin_palette(name))
        }
    }

    #[test]
    fn test_theme_list_is_complete() {
        assert_eq!(THEMES.len(), 55);
        assert!(is_known_theme("dracula"));
        assert!(is_known_theme(DEFAULT_THEME));
        assert!(!is_known_theme("select-a-theme"));
        assert_eq!(selectable_themes().next(), Some(DEFAULT_THEME));
        assert_eq!(selectable_themes().count(), 56);
    }

    #[test]
    fn test_default_theme_is_never_loaded() {
        let fetches = Rc::new(Cell::new(0));
        let mut registry = ThemeRegistry::new(Box::new(CountingSource(fetches.clone())));
        registry.load(DEFAULT_THEME);
        assert_eq!(fetches.get(), 0);
        assert!(!registry.is_loaded(DEFAULT_THEME));
        assert_eq!(registry.palette(DEFAULT_THEME), None);
    }

    #[test]
    fn test_theme_loads_once() {
        let fetches = Rc::new(Cell::new(0));
        let mut registry = ThemeRegistry::new(Box::new(CountingSource(fetches.clone())));
        registry.load("dracula");
        registry.load("dracula");
        assert_eq!(fetches.get(), 1);
        assert_eq!(registry.load_count(), 1);
        assert_eq!(registry.palette("dracula"), Some(builtin_palette("dracula")));
    }

    #[test]
    fn test_rgb_parses_hex() {
        assert_eq!(Rgb::try_from("#ff8000".to_string()), Ok(Rgb(255, 128, 0)));
        assert_eq!(Rgb::try_from("00ff00".to_string()), Ok(Rgb(0, 255, 0)));
        assert!(Rgb::try_from("#fff".to_string()).is_err());
        assert!(Rgb::try_from("#gggggg".to_string()).is_err());
    }

    #[test]
    fn test_dir_source_reads_palette_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("night.json"),
            r##"{"background":"#000000","foreground":"#ffffff","gutter":"#333333","cursor":"#ff0000","accent":"#00ff00"}"##,
        )
        .unwrap();
        let mut source = DirThemeSource::new(Some(dir.path().to_path_buf()));
        let palette = source.fetch("night").unwrap();
        assert_eq!(palette.background, Rgb(0, 0, 0));
        assert_eq!(palette.cursor, Rgb(255, 0, 0));
    }

    #[test]
    fn test_dir_source_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let mut source = DirThemeSource::new(Some(dir.path().to_path_buf()));
        assert_eq!(source.fetch("eclipse").unwrap(), Palette::LIGHT);
        assert_eq!(source.fetch("night").unwrap(), Palette::DARK);
    }

    #[test]
    fn test_broken_palette_file_still_counts_as_loaded() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("monokai.json"), "{ not json").unwrap();
        let mut registry =
            ThemeRegistry::new(Box::new(DirThemeSource::new(Some(dir.path().to_path_buf()))));
        registry.load("monokai");
        registry.load("monokai");
        assert_eq!(registry.load_count(), 1);
        assert_eq!(registry.palette("monokai"), Some(builtin_palette("monokai")));
    }
}
