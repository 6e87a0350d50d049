//! Content records and field-level language fallback.
//!
//! A content file is a list of `Key: value` fields separated by lines of
//! four dashes:
//!
//! ```text
//! Title: Hello
//!
//! ----
//!
//! Text: Multi-line
//! values are allowed.
//! ```
//!
//! Keys are case-insensitive: they are normalised once, when the record is
//! built, and a record never holds two fields with the same normalised key.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// Field separator: a line consisting of four dashes.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*----[ \t]*\r?$").unwrap());

/// Error returned when a content record cannot be built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContentError {
    /// Two fields normalise to the same key.
    #[error("duplicate field '{key}' in {}", .path.as_deref().unwrap_or("<memory>"))]
    DuplicateField {
        /// Normalised field key.
        key: String,
        /// Path of the parsed file, if any.
        path: Option<String>,
    },
}

/// State of a field lookup.
///
/// Absent and empty are distinct: fallback-merge replaces both, but callers
/// can tell whether a translation exists at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field<'a> {
    /// No field with this key.
    Absent,
    /// Field present with an empty value.
    Empty,
    /// Field present with a non-empty value.
    Value(&'a str),
}

impl<'a> Field<'a> {
    /// The value, or `""` for absent and empty fields.
    #[must_use]
    pub fn as_str(self) -> &'a str {
        match self {
            Field::Value(v) => v,
            Field::Absent | Field::Empty => "",
        }
    }

    /// The value if non-empty.
    #[must_use]
    pub fn value(self) -> Option<&'a str> {
        match self {
            Field::Value(v) => Some(v),
            Field::Absent | Field::Empty => None,
        }
    }

    /// True unless the field holds a non-empty value.
    #[must_use]
    pub fn is_blank(self) -> bool {
        !matches!(self, Field::Value(_))
    }
}

/// Normalise a field key: lower-case, non-alphanumeric runs become `_`.
///
/// `Title`, `title` and `TITLE` are the same key; so are `URL-Key` and `url_key`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len());
    let mut pending_separator = false;

    for c in key.trim().chars() {
        if c.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    normalized
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FieldEntry {
    /// Normalised key.
    key: String,
    /// Key as written in the file.
    label: String,
    value: String,
}

/// Content of one page or attached file in one language.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContentRecord {
    /// Language code the record was resolved for.
    language: String,
    /// Storage path the primary fields were read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(serialize_with = "serialize_fields")]
    fields: Vec<FieldEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

fn serialize_fields<S: Serializer>(fields: &[FieldEntry], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(fields.iter().map(|f| (&f.key, &f.value)))
}

impl ContentRecord {
    /// Create an empty record for a language.
    #[must_use]
    pub fn empty(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Build a record from `(key, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DuplicateField`] if two keys normalise to the
    /// same field.
    pub fn from_fields<K, V>(
        language: impl Into<String>,
        path: Option<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, ContentError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self {
            language: language.into(),
            path,
            ..Self::default()
        };

        for (label, value) in fields {
            let label = label.as_ref().trim();
            let key = normalize_key(label);
            if key.is_empty() {
                continue;
            }
            if record.index.contains_key(&key) {
                return Err(ContentError::DuplicateField {
                    key,
                    path: record.path,
                });
            }
            record.push(key, label.to_owned(), value.into());
        }

        Ok(record)
    }

    /// Parse the text of a content file.
    ///
    /// Chunks without a `:` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DuplicateField`] if a key occurs twice.
    pub fn parse(
        text: &str,
        language: impl Into<String>,
        path: Option<String>,
    ) -> Result<Self, ContentError> {
        let mut fields = Vec::new();

        for chunk in SEPARATOR_RE.split(text) {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            let Some((key, value)) = chunk.split_once(':') else {
                tracing::warn!(
                    path = path.as_deref().unwrap_or("<memory>"),
                    "Skipping content chunk without a field key"
                );
                continue;
            };
            fields.push((key, value.trim().to_owned()));
        }

        Self::from_fields(language, path, fields)
    }

    fn push(&mut self, key: String, label: String, value: String) {
        self.index.insert(key.clone(), self.fields.len());
        self.fields.push(FieldEntry { key, label, value });
    }

    /// Language code the record was resolved for.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Storage path the record was read from.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Look up a field (case-insensitive).
    #[must_use]
    pub fn field(&self, key: &str) -> Field<'_> {
        let key = normalize_key(key);
        match self.index.get(&key).map(|&i| self.fields[i].value.as_str()) {
            None => Field::Absent,
            Some("") => Field::Empty,
            Some(value) => Field::Value(value),
        }
    }

    /// Field value, `""` when absent or empty.
    #[must_use]
    pub fn value(&self, key: &str) -> &str {
        self.field(key).as_str()
    }

    /// Normalised keys in record order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// `(key, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|f| (f.key.as_str(), f.value.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert or replace a field.
    ///
    /// A replaced field keeps the key spelling it was read with.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let label = key.trim();
        let key = normalize_key(label);
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&i) => self.fields[i].value = value.into(),
            None => self.push(key, label.to_owned(), value.into()),
        }
    }

    /// Serialise to the content file format, with keys spelled as read.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = self
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.label, f.value))
            .collect::<Vec<_>>()
            .join("\n\n----\n\n");
        text.push('\n');
        text
    }
}

/// Merge a fallback record into a primary record, field by field.
///
/// Fields with a non-empty value in `primary` are kept. Empty or absent
/// fields take the fallback's value; fields only present in `fallback` are
/// appended in fallback order. Language and path of `primary` are kept.
#[must_use]
pub fn fallback_merge(primary: &ContentRecord, fallback: &ContentRecord) -> ContentRecord {
    let mut merged = ContentRecord {
        language: primary.language.clone(),
        path: primary.path.clone(),
        ..ContentRecord::default()
    };

    for entry in &primary.fields {
        let value = match (entry.value.is_empty(), fallback.index.get(&entry.key)) {
            (true, Some(&i)) => fallback.fields[i].value.clone(),
            _ => entry.value.clone(),
        };
        merged.push(entry.key.clone(), entry.label.clone(), value);
    }

    for entry in &fallback.fields {
        if !merged.index.contains_key(&entry.key) {
            merged.push(entry.key.clone(), entry.label.clone(), entry.value.clone());
        }
    }

    merged
}
