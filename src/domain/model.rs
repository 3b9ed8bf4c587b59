use crate::config::settings::DocumentSettings;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One line of a tabular export: header names zipped with the line's values.
/// Field order follows the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `name`, or the empty string when the column is absent.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Calendar month, always within 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MonthIndex(u8);

impl MonthIndex {
    pub const COUNT: usize = 12;

    pub fn new(value: u32) -> Option<Self> {
        if (1..=12).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = MonthIndex> {
        (1..=12u8).map(MonthIndex)
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationEntry {
    pub month: MonthIndex,
    pub display_name: String,
    /// Region tags, unique, in first-seen order.
    pub tags: Vec<String>,
    pub image: Option<String>,
}

/// Month-indexed rotation. Keys are unique; a later insert at the same month replaces
/// the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationTable {
    entries: BTreeMap<MonthIndex, RotationEntry>,
}

impl RotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry that was replaced, if any.
    pub fn insert(&mut self, entry: RotationEntry) -> Option<RotationEntry> {
        self.entries.insert(entry.month, entry)
    }

    pub fn get(&self, month: MonthIndex) -> Option<&RotationEntry> {
        self.entries.get(&month)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RotationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn missing_months(&self) -> Vec<MonthIndex> {
        MonthIndex::all()
            .filter(|month| !self.entries.contains_key(month))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == MonthIndex::COUNT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rollover {
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthEntry {
    pub name: String,
    pub regions: Vec<String>,
    pub image: Option<String>,
}

impl From<&RotationEntry> for MonthEntry {
    fn from(entry: &RotationEntry) -> Self {
        Self {
            name: entry.display_name.clone(),
            regions: entry.tags.clone(),
            image: entry.image.clone(),
        }
    }
}

/// The JSON document handed to the site renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationDocument {
    pub schema_version: u32,
    pub generated_at: String,
    pub timezone: String,
    pub rollover: Rollover,
    pub months: BTreeMap<MonthIndex, MonthEntry>,
}

impl RotationDocument {
    pub fn new(table: &RotationTable, settings: &DocumentSettings, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: settings.schema_version,
            generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            timezone: settings.timezone.clone(),
            rollover: Rollover {
                local_time: settings.rollover_time.clone(),
            },
            months: table
                .entries()
                .map(|entry| (entry.month, MonthEntry::from(entry)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub document: RotationDocument,
    pub matched_rows: usize,
    pub missing_months: Vec<MonthIndex>,
}
