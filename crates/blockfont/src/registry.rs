//! Discovery of font files on disk.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{font::Font, FontError, Result};

const FONT_EXTENSIONS: [&str; 2] = ["bit", "zip"];

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FONT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Fonts loaded from the filesystem, keyed by lowercase font name.
///
/// Registering a font whose name is already present replaces the earlier one.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: BTreeMap<String, Font>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, font: Font) -> String {
        let name = font.name.clone();
        self.fonts.insert(name.to_lowercase(), font);
        name
    }

    /// Load a single `.bit` (or zipped `.bit`) file. Returns the font's name.
    pub fn register_file(&mut self, path: &Path) -> Result<String> {
        if !has_font_extension(path) {
            return Err(FontError::UnsupportedExtension(path.to_path_buf()));
        }
        let font = Font::load(path).map_err(|e| match e {
            FontError::Io(io) => FontError::Io(io),
            other => FontError::Parse(format!("{}: {other}", path.display())),
        })?;
        tracing::debug!(font = %font.name, path = %path.display(), "registered font");
        Ok(self.insert(font))
    }

    /// Load every font file directly inside `dir`.
    ///
    /// Files that fail to load are skipped and logged; the call only fails
    /// when nothing could be loaded.
    pub fn register_dir(&mut self, dir: &Path) -> Result<Vec<String>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_font_extension(p))
            .collect();
        paths.sort();

        let mut loaded = Vec::new();
        let mut failures = Vec::new();
        for path in &paths {
            match self.register_file(path) {
                Ok(name) => loaded.push(name),
                Err(e) => failures.push(e.to_string()),
            }
        }

        if loaded.is_empty() {
            return Err(if failures.is_empty() {
                FontError::NotFound(format!("no font files in {}", dir.display()))
            } else {
                FontError::Parse(format!(
                    "no fonts could be loaded from {}: {}",
                    dir.display(),
                    failures.join("; ")
                ))
            });
        }
        if !failures.is_empty() {
            tracing::warn!(dir = %dir.display(), "some fonts failed to load: {}", failures.join("; "));
        }
        Ok(loaded)
    }

    /// Register a file or every font in a directory.
    pub fn register_path(&mut self, path: &Path) -> Result<Vec<String>> {
        let meta = fs::metadata(path)?;
        if meta.is_dir() {
            self.register_dir(path)
        } else {
            Ok(vec![self.register_file(path)?])
        }
    }

    /// Case-insensitive lookup by font name.
    pub fn get(&self, name: &str) -> Option<&Font> {
        self.fonts.get(&name.to_lowercase())
    }

    /// Display names of all registered fonts, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.fonts.values().map(|f| f.name.as_str()).collect()
    }

    pub fn first(&self) -> Option<&Font> {
        self.fonts.values().next()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
