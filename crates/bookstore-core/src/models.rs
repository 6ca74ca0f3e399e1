//! The book record.

use serde::{Deserialize, Serialize};

/// A single book as stored and exchanged over the wire.
///
/// Every field is optional on input: missing strings decode to `""` and a
/// missing or `null` author list decodes to `None`. The author list keeps that
/// distinction so that an update can clear it with an explicit `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub id: String,
    pub name: String,
    #[serde(rename = "author")]
    pub authors: Option<Vec<String>>,
    pub press: String,
}

impl Book {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = Some(authors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_press(mut self, press: impl Into<String>) -> Self {
        self.press = press.into();
        self
    }

    /// Apply a partial update on top of this record.
    ///
    /// Non-empty strings in `patch` replace the current value and a `Some`
    /// author list replaces the current list (`Some(vec![])` clears it).
    /// The id is never touched.
    ///
    /// An empty string always means "not provided", so an update cannot set a
    /// string field to empty. Callers that need that must delete and recreate
    /// the record.
    pub fn merge_from(&mut self, patch: &Book) {
        if !patch.name.is_empty() {
            self.name.clone_from(&patch.name);
        }
        if let Some(authors) = &patch.authors {
            self.authors = Some(authors.clone());
        }
        if !patch.press.is_empty() {
            self.press.clone_from(&patch.press);
        }
    }
}
