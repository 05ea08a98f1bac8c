//! Sort list type definitions and translation
//!
//! Order is significant: earlier entries take precedence on ties. Entries
//! whose direction is neither `asc` nor `desc` stay in the list but are
//! skipped by every translation.

use std::fmt;

use bson::{Bson, Document};
use serde::{Deserialize, Deserializer, Serialize};

/// Sort direction tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SortDirection {
    Asc,
    Desc,
    #[default]
    Invalid,
}

impl SortDirection {
    /// Parse a direction tag; anything but `asc`/`desc` is `Invalid`
    pub fn parse(tag: &str) -> Self {
        match tag {
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            _ => Self::Invalid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Invalid => "",
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl From<Option<String>> for SortDirection {
    fn from(tag: Option<String>) -> Self {
        Self::parse(tag.as_deref().unwrap_or_default())
    }
}

impl From<SortDirection> for String {
    fn from(dir: SortDirection) -> Self {
        dir.as_str().to_string()
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `(field, direction)` sort key
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub field: String,
    #[serde(default)]
    pub dir: SortDirection,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl SortEntry {
    pub fn new(field: impl Into<String>, dir: &str) -> Self {
        Self {
            field: field.into(),
            dir: SortDirection::parse(dir),
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDirection::Desc,
        }
    }
}

/// Ordered list of sort keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SortList(pub Vec<SortEntry>);

impl From<Vec<SortEntry>> for SortList {
    fn from(entries: Vec<SortEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<SortEntry> for SortList {
    fn from_iter<I: IntoIterator<Item = SortEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl SortList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewrite every entry in place
    pub fn handle<F>(&mut self, mut handler: F)
    where
        F: FnMut(SortEntry) -> SortEntry,
    {
        for entry in &mut self.0 {
            *entry = handler(std::mem::take(entry));
        }
    }

    /// Rewrite only the field name of every entry
    pub fn handle_field<F>(&mut self, mut mapper: F)
    where
        F: FnMut(&str) -> String,
    {
        self.handle(|mut entry| {
            entry.field = mapper(&entry.field);
            entry
        });
    }

    /// Independent copy of the list
    pub fn deep_copy(&self) -> SortList {
        self.clone()
    }

    /// True if any entry sorts by one of `fields`
    pub fn has_field(&self, fields: &[&str]) -> bool {
        self.0
            .iter()
            .any(|entry| fields.contains(&entry.field.as_str()))
    }

    /// Drop entries whose direction is not `asc`/`desc`
    pub fn retain_valid(&mut self) {
        self.0.retain(|entry| entry.dir.is_valid());
    }

    /// Append `entry` unless the list already sorts by its field
    ///
    /// Returns whether the entry was appended.
    pub fn ensure_sorted_by(&mut self, entry: SortEntry) -> bool {
        if self.has_field(&[entry.field.as_str()]) {
            return false;
        }
        tracing::trace!(field = %entry.field, dir = %entry.dir, "Appending default sort");
        self.0.push(entry);
        true
    }

    fn valid_entries(&self) -> impl Iterator<Item = &SortEntry> {
        self.0.iter().filter(|entry| entry.dir.is_valid())
    }

    /// Field tokens for a query layer, `-` prefixed when descending
    pub fn to_query_order(&self) -> Vec<String> {
        self.valid_entries()
            .map(|entry| match entry.dir {
                SortDirection::Desc => format!("-{}", entry.field),
                _ => entry.field.clone(),
            })
            .collect()
    }

    /// Ordered `$sort` body: `1` ascending, `-1` descending
    ///
    /// A later entry with a field already present overwrites the direction
    /// but keeps the first position.
    pub fn to_aggregate_sort(&self) -> Document {
        let mut doc = Document::new();
        for entry in self.valid_entries() {
            let dir = match entry.dir {
                SortDirection::Desc => -1,
                _ => 1,
            };
            doc.insert(entry.field.clone(), Bson::Int32(dir));
        }
        doc
    }
}
