use std::{
    collections::BTreeMap,
    fs,
    io::{Cursor, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};
use zip::ZipArchive;

use crate::{FontError, Result};

/// On-disk layout of a `.bit` font (JSON).
#[derive(Debug, Default, Serialize, Deserialize)]
struct FontFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    license: String,
    #[serde(default)]
    characters: BTreeMap<String, Vec<String>>,
}

/// A bitmap font: one list of block-character rows per character.
///
/// Fonts are immutable once built and safe to share between concurrent
/// renders. Glyphs are kept ordered by character so every analysis over the
/// whole font is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Font {
    pub name: String,
    pub author: String,
    pub license: String,
    glyphs: BTreeMap<char, Vec<String>>,
}

impl Font {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    pub fn add_glyph(&mut self, ch: char, rows: &[&str]) {
        self.glyphs
            .insert(ch, rows.iter().map(|r| r.to_string()).collect());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_char(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Raw, unscaled bitmap rows for `ch`.
    pub fn glyph(&self, ch: char) -> Option<&[String]> {
        self.glyphs.get(&ch).map(Vec::as_slice)
    }

    /// Iterate over all glyphs in character order.
    pub fn iter_glyphs(&self) -> impl Iterator<Item = (char, &[String])> {
        self.glyphs.iter().map(|(ch, rows)| (*ch, rows.as_slice()))
    }

    pub fn char_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Load a font from a `.bit` file (JSON) or a ZIP archive containing one.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        let mut reader = reader;
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(&buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        // ZIP local file header
        if bytes.len() >= 4 && &bytes[0..4] == b"PK\x03\x04" {
            let mut archive = ZipArchive::new(Cursor::new(bytes))
                .map_err(|e| FontError::Archive(format!("zip open error: {e}")))?;
            for i in 0..archive.len() {
                let mut file = archive
                    .by_index(i)
                    .map_err(|e| FontError::Archive(format!("zip entry error: {e}")))?;
                if file.name().to_ascii_lowercase().ends_with(".bit") {
                    let mut buf = String::new();
                    file.read_to_string(&mut buf)?;
                    return Self::from_json(&buf);
                }
            }
            return Err(FontError::Archive("zip archive contained no .bit".into()));
        }
        let content =
            std::str::from_utf8(bytes).map_err(|e| FontError::Parse(format!("utf8 error: {e}")))?;
        Self::from_json(content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: FontFile = serde_json::from_str(content)?;
        if file.name.is_empty() {
            return Err(FontError::Invalid("missing required 'name' field".into()));
        }
        if file.characters.is_empty() {
            return Err(FontError::Invalid(format!(
                "font '{}' has no characters",
                file.name
            )));
        }

        let mut glyphs = BTreeMap::new();
        for (key, rows) in file.characters {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    glyphs.insert(ch, rows);
                }
                _ => tracing::warn!(font = %file.name, key = %key, "skipping multi-character glyph key"),
            }
        }
        if glyphs.is_empty() {
            return Err(FontError::Invalid(format!(
                "font '{}' has no single-character glyphs",
                file.name
            )));
        }

        Ok(Self {
            name: file.name,
            author: file.author,
            license: file.license,
            glyphs,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let file = FontFile {
            name: self.name.clone(),
            author: self.author.clone(),
            license: self.license.clone(),
            characters: self
                .glyphs
                .iter()
                .map(|(ch, rows)| (ch.to_string(), rows.clone()))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}
