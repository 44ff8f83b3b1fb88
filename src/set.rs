//! The imported icon collection, the aggregation pass, and document export.
//!
//! An [`ImportedSet`] is built once per run by the import step, consumed by
//! [`ImportedSet::build`] (one ordered pass invoking the pipeline per icon,
//! committing or dropping each entry), and the resulting
//! [`IconSetDocument`] is what gets written to disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::IconPipeline;

// ============================================================================
// Entries
// ============================================================================

/// What kind of entry a name refers to in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A real icon; runs the normalization pipeline.
    Icon,
    /// A second name for another entry; passes through untouched.
    Alias {
        /// Name of the entry this alias points at.
        parent: String,
    },
}

/// One named entry of the imported collection.
#[derive(Debug, Clone)]
pub struct IconEntry {
    /// Unique name within the set (the source file's stem).
    pub name: String,
    /// Entry kind; only [`EntryKind::Icon`] entries are processed.
    pub kind: EntryKind,
    /// Raw markup as imported (empty for alias entries).
    pub source: String,
}

impl IconEntry {
    /// Creates an icon entry from raw markup.
    pub fn icon(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Icon,
            source: source.into(),
        }
    }

    /// Creates an alias entry pointing at `parent`.
    pub fn alias(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Alias {
                parent: parent.into(),
            },
            source: String::new(),
        }
    }
}

// ============================================================================
// ImportedSet
// ============================================================================

/// The icon collection for one run: a namespace prefix plus ordered entries.
///
/// Scoped to a single run: built by import, consumed by [`Self::build`],
/// discarded after.
#[derive(Debug, Default)]
pub struct ImportedSet {
    prefix: String,
    entries: Vec<IconEntry>,
}

impl ImportedSet {
    /// Creates an empty set under the given namespace prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Adds an entry, replacing any existing entry with the same name.
    pub fn push(&mut self, entry: IconEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Number of entries in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in import order.
    pub fn iter(&self) -> impl Iterator<Item = &IconEntry> {
        self.entries.iter()
    }

    /// Runs every icon entry through the pipeline and produces the export
    /// document.
    ///
    /// Entries are visited exactly once, in import order. An icon that
    /// completes the pipeline is committed into the document; an icon that
    /// fails any step is dropped with one diagnostic line and the pass
    /// continues. Alias entries bypass the pipeline entirely.
    pub fn build(self, pipeline: &IconPipeline) -> IconSetDocument {
        let mut document = IconSetDocument::new(self.prefix);

        for entry in self.entries {
            match entry.kind {
                EntryKind::Alias { parent } => {
                    document.aliases.insert(entry.name, AliasRecord { parent });
                }
                EntryKind::Icon => match pipeline.process(&entry.name, &entry.source) {
                    Ok(icon) => {
                        document.icons.insert(
                            entry.name,
                            IconRecord {
                                body: icon.markup.inner_markup(),
                                width: icon.view_box.width,
                                height: icon.view_box.height,
                            },
                        );
                    }
                    Err(err) => {
                        log::warn!("dropping icon \"{}\": {err}", entry.name);
                    }
                },
            }
        }

        document
    }
}

// ============================================================================
// Export document
// ============================================================================

/// One committed icon in the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconRecord {
    /// Serialized markup body, without the `<svg>` wrapper.
    pub body: String,
    /// Final width in user units (padding already applied).
    pub width: f64,
    /// Final height in user units (padding already applied).
    pub height: f64,
}

/// One alias in the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasRecord {
    /// Name of the icon this alias resolves to.
    pub parent: String,
}

/// The exported icon-set artifact.
///
/// Every icon present here completed the pipeline without error; dropped
/// icons are fully absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSetDocument {
    /// Namespace prefix for the whole set.
    pub prefix: String,
    /// Committed icons by name.
    pub icons: BTreeMap<String, IconRecord>,
    /// Aliases by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, AliasRecord>,
}

/// Failure to produce or persist the output document. Fatal for the run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document could not be serialized.
    #[error("failed to serialize icon set document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The document could not be written to storage.
    #[error("failed to write icon set document to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IconSetDocument {
    /// Creates an empty document under the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            icons: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Writes the document to `path`.
    ///
    /// The document is serialized in full before anything touches storage,
    /// so a serialization failure leaves no file behind.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
