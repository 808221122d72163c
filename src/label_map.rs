//! Label map loading.
//!
//! The label map is a pbtxt-style asset mapping class names to integer ids:
//!
//! ```text
//! item {
//!   id: 1
//!   name: 'licence'
//! }
//! ```
//!
//! It is loaded once before any record is built and never mutates afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Immutable class-name to class-id mapping.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    map: HashMap<String, i64>,
}

impl LabelMap {
    /// Load a label map from a pbtxt file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_pbtxt(&content, path)
    }

    /// Parse pbtxt `item { id name }` blocks. Each block must carry both an
    /// `id` and a `name`; ids must be non-negative.
    pub fn from_pbtxt(content: &str, path: &Path) -> Result<Self> {
        let mut map = HashMap::new();
        let mut name: Option<String> = None;
        let mut id: Option<i64> = None;

        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("name:") {
                let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
                name = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("id:") {
                let value = value.trim();
                let parsed: i64 = value.parse().map_err(|_| Error::MalformedValue {
                    token: value.to_string(),
                    path: path.to_path_buf(),
                })?;
                if parsed < 0 {
                    return Err(Error::MalformedValue {
                        token: value.to_string(),
                        path: path.to_path_buf(),
                    });
                }
                id = Some(parsed);
            } else if line.starts_with('}') {
                let name = name.take().ok_or_else(|| Error::MissingField {
                    field: "item.name",
                    path: path.to_path_buf(),
                })?;
                let id = id.take().ok_or_else(|| Error::MissingField {
                    field: "item.id",
                    path: path.to_path_buf(),
                })?;
                map.insert(name, id);
            }
        }

        Ok(Self { map })
    }

    /// Resolve a class name to its id. A miss is fatal for the record being
    /// built; there is no default bucket.
    pub fn resolve(&self, class: &str) -> Result<i64> {
        self.map.get(class).copied().ok_or_else(|| Error::UnknownClass {
            class: class.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
