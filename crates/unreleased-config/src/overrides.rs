//! Operator-maintained override tables.
//!
//! Each table is line oriented:
//!
//! ```text
//! # comment
//! foo-1.2-3 | ~CURRENT -- pom,test   # key|value, split on the first '|'
//! bar-unreleased                     # bare key, no value
//! ----                               # end of this table
//! ```
//!
//! Four tables are read back to back from one stream, see [`OverrideTables`].

use std::collections::BTreeMap;
use std::io::BufRead;

use tracing::debug;

use crate::ConfigResult;

/// Marker that ends a table.
const TABLE_END: &str = "----";

/// Value of a single override entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideValue {
    /// A bare key; the entry only records presence.
    Marker,

    /// Freeform text after the first `|`.
    Text(String),
}

impl OverrideValue {
    /// Returns the text of the entry, empty for a bare key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Marker => "",
            Self::Text(text) => text,
        }
    }
}

/// A single override table, keyed by string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<String, OverrideValue>,
}

impl OverrideTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from text, stopping at the first `----` line.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut table = Self::new();
        for line in input.lines() {
            if line.starts_with(TABLE_END) {
                break;
            }
            table.push_line(line);
        }
        table
    }

    /// Reads one table from a stream, consuming lines up to and including
    /// the `----` terminator (or EOF).
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the stream fails.
    pub fn read_from<R: BufRead>(reader: &mut R) -> ConfigResult<Self> {
        let mut table = Self::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 || line.starts_with(TABLE_END) {
                break;
            }
            table.push_line(&line);
        }
        Ok(table)
    }

    fn push_line(&mut self, line: &str) {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match line.split_once('|') {
            Some((key, value)) => {
                self.entries.insert(
                    key.trim_end().to_string(),
                    OverrideValue::Text(value.trim_start().to_string()),
                );
            }
            None => {
                self.entries.insert(line.to_string(), OverrideValue::Marker);
            }
        }
    }

    /// Returns the entry for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OverrideValue> {
        self.entries.get(key)
    }

    /// Returns the text of an entry, or `None` when the key is absent or bare.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            OverrideValue::Marker => None,
            OverrideValue::Text(text) => Some(text),
        }
    }

    /// Returns whether the key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes and returns an entry. Consumed entries are no longer stale.
    pub fn take(&mut self, key: &str) -> Option<OverrideValue> {
        let taken = self.entries.remove(key);
        if taken.is_some() {
            debug!(key, "override consumed");
        }
        taken
    }

    /// Inserts an entry, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: OverrideValue) {
        self.entries.insert(key.into(), value);
    }

    /// Inserts a text entry only if the key is not already present.
    pub fn seed(&mut self, key: impl Into<String>, text: &str) {
        self.entries
            .entry(key.into())
            .or_insert_with(|| OverrideValue::Text(text.to_string()));
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four override tables, in the order they are read.
#[derive(Debug, Clone, Default)]
pub struct OverrideTables {
    /// `id-version-count` or `id-unreleased` → label text.
    pub known_revs: OverrideTable,

    /// Plugin id → repository name, or `skip`.
    pub repo_map: OverrideTable,

    /// Plugin id → `tagBase|subdirOrVER_OK|suffixRegex`.
    pub tag_map: OverrideTable,

    /// Plugin ids that moved to GitHub before their first release there.
    pub really_github: OverrideTable,
}

impl OverrideTables {
    /// Reads all four tables from one stream.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the stream fails.
    pub fn read_from<R: BufRead>(reader: &mut R) -> ConfigResult<Self> {
        let known_revs = OverrideTable::read_from(reader)?;
        let repo_map = OverrideTable::read_from(reader)?;
        let tag_map = OverrideTable::read_from(reader)?;
        let really_github = OverrideTable::read_from(reader)?;
        debug!(
            known_revs = known_revs.len(),
            repo_map = repo_map.len(),
            tag_map = tag_map.len(),
            really_github = really_github.len(),
            "override tables loaded"
        );
        Ok(Self {
            known_revs,
            repo_map,
            tag_map,
            really_github,
        })
    }
}
