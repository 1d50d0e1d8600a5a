//! Structured TOML document model
//!
//! [`Document`] wraps a `toml_edit::DocumentMut`, so comments, key order and
//! whitespace survive a parse/serialize cycle byte for byte. `toml_edit`
//! renders every line break as `\n`; the source's line ending is recorded
//! and restored on output.

use std::fmt;
use std::str::FromStr;

use serde_json::Value as JsonValue;
use toml_edit::{DocumentMut, Item, Table, TableLike};

use crate::error::{Error, Result};
use crate::path::KeyPath;

/// Line ending a document is written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// `CrLf` as soon as the text has one `\r\n`.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Rewrite every line break in `text` to this ending.
    pub fn apply(self, text: String) -> String {
        match self {
            Self::Lf => text,
            Self::CrLf => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

/// A parsed TOML document that keeps its source formatting.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: DocumentMut,
    line_ending: LineEnding,
}

impl Document {
    /// Parse TOML source.
    pub fn parse(source: &str) -> Result<Self> {
        let inner: DocumentMut = source
            .parse()
            .map_err(|e: toml_edit::TomlError| Error::parse("TOML", e.to_string()))?;
        let line_ending = LineEnding::detect(source);
        if line_ending == LineEnding::CrLf {
            tracing::trace!("document uses CRLF line endings");
        }
        Ok(Self { inner, line_ending })
    }

    /// An empty document, the starting point when a target file is absent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.as_table().is_empty()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn root(&self) -> &Table {
        self.inner.as_table()
    }

    pub fn root_mut(&mut self) -> &mut Table {
        self.inner.as_table_mut()
    }

    pub(crate) fn inner_mut(&mut self) -> &mut DocumentMut {
        &mut self.inner
    }

    /// Look up the item at `path`, descending through tables and inline tables.
    pub fn get(&self, path: &KeyPath) -> Option<&Item> {
        let mut current: &dyn TableLike = self.inner.as_table();
        let (leaf, parents) = path.segments().split_last()?;
        for segment in parents {
            current = current.get(segment)?.as_table_like()?;
        }
        current.get(leaf).filter(|item| !item.is_none())
    }

    /// Structural JSON view of the item at `path`.
    pub fn get_json(&self, path: &KeyPath) -> Option<JsonValue> {
        self.get(path).map(item_to_json)
    }

    pub fn contains(&self, path: &KeyPath) -> bool {
        self.get(path).is_some()
    }

    /// Set the item at `path`, creating missing intermediate tables.
    ///
    /// Created intermediates are implicit, so no empty header such as `[tool]`
    /// is emitted. Sibling keys keep their formatting, and an existing key
    /// keeps its comments.
    ///
    /// # Errors
    ///
    /// Returns `PathSetFailed` when an existing intermediate is not a table.
    pub fn set(&mut self, path: &KeyPath, item: impl Into<Item>) -> Result<()> {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return Err(Error::PathSetFailed {
                path: path.to_string(),
                reason: "empty path".to_string(),
            });
        };

        let mut current = self.inner.as_table_mut();
        for segment in parents {
            if !current.contains_key(segment) {
                let mut table = Table::new();
                table.set_implicit(true);
                current.insert(segment, Item::Table(table));
            }
            current = match current.get_mut(segment) {
                Some(Item::Table(table)) => table,
                Some(other) => {
                    return Err(Error::PathSetFailed {
                        path: path.to_string(),
                        reason: format!("'{segment}' is a {}, not a table", other.type_name()),
                    });
                }
                None => {
                    return Err(Error::PathSetFailed {
                        path: path.to_string(),
                        reason: format!("'{segment}' could not be created"),
                    });
                }
            };
        }

        match current.get_mut(leaf) {
            Some(slot) => *slot = item.into(),
            None => {
                current.insert(leaf, item.into());
            }
        }
        Ok(())
    }

    /// Remove and return the item at `path`.
    pub fn remove(&mut self, path: &KeyPath) -> Option<Item> {
        let (leaf, parents) = path.segments().split_last()?;
        let mut current: &mut dyn TableLike = self.inner.as_table_mut();
        for segment in parents {
            current = current.get_mut(segment)?.as_table_like_mut()?;
        }
        current.remove(leaf).filter(|item| !item.is_none())
    }

    /// Render the document. Unmodified documents render byte-identical to
    /// their source, line endings included.
    pub fn serialize(&self) -> String {
        self.line_ending.apply(self.inner.to_string())
    }

    /// Key-sorted structural view for semantic comparison.
    pub fn to_json(&self) -> JsonValue {
        table_to_json(self.inner.as_table())
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

pub(crate) fn table_to_json(table: &dyn TableLike) -> JsonValue {
    let mut map = serde_json::Map::new();
    let mut keys: Vec<_> = table.iter().map(|(k, _)| k.to_string()).collect();
    keys.sort();

    for key in keys {
        if let Some(item) = table.get(&key) {
            map.insert(key, item_to_json(item));
        }
    }
    JsonValue::Object(map)
}

/// Structural JSON view of a single item.
pub fn item_to_json(item: &Item) -> JsonValue {
    match item {
        Item::Value(v) => value_to_json(v),
        Item::Table(t) => table_to_json(t),
        Item::ArrayOfTables(arr) => {
            let items: Vec<_> = arr.iter().map(|t| table_to_json(t)).collect();
            JsonValue::Array(items)
        }
        Item::None => JsonValue::Null,
    }
}

fn value_to_json(v: &toml_edit::Value) -> JsonValue {
    match v {
        toml_edit::Value::String(s) => JsonValue::String(s.value().to_string()),
        toml_edit::Value::Integer(i) => JsonValue::Number((*i.value()).into()),
        toml_edit::Value::Float(f) => serde_json::Number::from_f64(*f.value())
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        toml_edit::Value::Boolean(b) => JsonValue::Bool(*b.value()),
        toml_edit::Value::Datetime(d) => JsonValue::String(d.to_string()),
        toml_edit::Value::Array(arr) => {
            let items: Vec<_> = arr.iter().map(value_to_json).collect();
            JsonValue::Array(items)
        }
        toml_edit::Value::InlineTable(t) => table_to_json(t),
    }
}
