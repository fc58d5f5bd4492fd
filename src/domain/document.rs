//! Document domain model.
//!
//! A document is a folder in the library containing an `info.yaml` file. The
//! info file is a flat YAML mapping of bibliographic fields (`title`, `author`,
//! `year`, `tags`, ...) plus a `files` list naming the attached files relative
//! to the folder.

use crate::domain::error::{BibshelfError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the metadata file identifying a document folder.
pub const INFO_FILE_NAME: &str = "info.yaml";

/// Key in the info mapping listing attached file names.
const FILES_KEY: &str = "files";

/// A single document of the library.
///
/// Documents are loaded once by the library worker and shipped to the plugin
/// thread as JSON, so the info mapping is kept as `serde_json::Value`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Sandbox path of the document folder.
    pub folder: String,
    /// Parsed contents of the info file.
    #[serde(default)]
    pub info: BTreeMap<String, Value>,
}

impl Document {
    /// Creates a document from an already parsed info mapping.
    #[must_use]
    pub fn new(folder: impl Into<String>, info: BTreeMap<String, Value>) -> Self {
        Self {
            folder: folder.into(),
            info,
        }
    }

    /// Loads the document stored in `folder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the info file is missing, unreadable or not a YAML
    /// mapping.
    pub fn from_folder(folder: &Path) -> Result<Self> {
        let info = read_info(&folder.join(INFO_FILE_NAME))?;
        Ok(Self {
            folder: folder.to_string_lossy().into_owned(),
            info,
        })
    }

    /// Re-reads the info file, replacing the in-memory fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the info file cannot be read or parsed. The
    /// document keeps its previous fields in that case.
    pub fn load(&mut self) -> Result<()> {
        self.info = read_info(&self.info_file())?;
        tracing::debug!(folder = %self.folder, fields = self.info.len(), "document reloaded");
        Ok(())
    }

    /// Path of the document's info file.
    #[must_use]
    pub fn info_file(&self) -> PathBuf {
        Path::new(&self.folder).join(INFO_FILE_NAME)
    }

    /// Name of the document folder (the last path component).
    #[must_use]
    pub fn subfolder(&self) -> &str {
        self.folder
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.folder)
    }

    /// Absolute paths of the files attached to the document.
    ///
    /// `files` may be a list or a single string; anything else yields no files.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        let folder = Path::new(&self.folder);
        match self.info.get(FILES_KEY) {
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .map(|name| folder.join(name))
                .collect(),
            Some(Value::String(name)) => vec![folder.join(name)],
            _ => vec![],
        }
    }

    /// Display text of a field, or an empty string when the field is absent.
    ///
    /// Lists are joined with `", "`, null becomes empty, nested mappings are
    /// rendered as compact JSON.
    #[must_use]
    pub fn get(&self, key: &str) -> String {
        self.info.get(key).map(value_text).unwrap_or_default()
    }

    /// Textual dump of the whole info mapping, in YAML.
    #[must_use]
    pub fn dump(&self) -> String {
        serde_yaml::to_string(&self.info).unwrap_or_else(|e| {
            tracing::debug!(folder = %self.folder, error = %e, "failed to dump document");
            format!("{}: {e}", self.folder)
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn read_info(path: &Path) -> Result<BTreeMap<String, Value>> {
    if !path.is_file() {
        return Err(BibshelfError::Library(format!(
            "missing info file {}",
            path.display()
        )));
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_yaml::from_str(&contents)?)
}
