//! The study aggregate and its persisted form.
//!
//! The aggregate always holds all five categories. Decoding never fails:
//! it reports what it could not read through [`LoadOutcome`] and hands back
//! whatever it could. Stored values it cannot read are kept verbatim and
//! written back on save, so nothing is lost until the user clears everything.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::category::Category;
use crate::core::record::StudyRecord;
use crate::error::Result;

/// All study records, partitioned by category.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyState {
    records: BTreeMap<Category, Vec<StudyRecord>>,
    /// Stored list entries that are not valid records, kept after the typed ones.
    unreadable: BTreeMap<Category, Vec<Value>>,
    /// Stored category values that are not lists.
    raw_categories: BTreeMap<Category, Value>,
    /// Top-level keys that are not categories, kept so a save does not drop them.
    unknown: Map<String, Value>,
}

impl Default for StudyState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Result of decoding a persisted slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Nothing was stored yet.
    Missing,
    /// Stored data was decoded, possibly with some parts left unread.
    Restored(RestoreReport),
    /// Stored data was unusable and has been replaced by an empty aggregate.
    Corrupt { reason: String },
}

impl LoadOutcome {
    /// Whether the user should hear about this load.
    pub fn is_degraded(&self) -> bool {
        match self {
            LoadOutcome::Missing => false,
            LoadOutcome::Restored(report) => report.has_unreadable(),
            LoadOutcome::Corrupt { .. } => true,
        }
    }
}

/// Details of a successful decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreReport {
    /// Records kept verbatim because their fields were missing or mistyped.
    pub unreadable_records: usize,
    /// Categories whose stored value was not a list, kept verbatim.
    pub unreadable_categories: Vec<Category>,
    /// Categories absent from the stored object, defaulted to empty.
    pub missing_categories: Vec<Category>,
    /// Unrecognised top-level keys, preserved as-is.
    pub unknown_keys: Vec<String>,
}

impl RestoreReport {
    /// Whether any stored value could not be read.
    pub fn has_unreadable(&self) -> bool {
        self.unreadable_records > 0 || !self.unreadable_categories.is_empty()
    }
}

impl StudyState {
    /// An aggregate with all categories present and empty.
    pub fn empty() -> Self {
        Self {
            records: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
            unreadable: BTreeMap::new(),
            raw_categories: BTreeMap::new(),
            unknown: Map::new(),
        }
    }

    /// Records of one category, in insertion order.
    pub fn records(&self, category: Category) -> &[StudyRecord] {
        self.records.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    fn records_mut(&mut self, category: Category) -> &mut Vec<StudyRecord> {
        self.records.entry(category).or_default()
    }

    /// Total number of readable records across categories.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Whether every category is empty of readable records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any record in any category uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.records.values().flatten().any(|r| r.id == id)
    }

    /// Append a record to a category.
    ///
    /// A category stored as something other than a list becomes a list again;
    /// its old value is dropped.
    pub fn push(&mut self, category: Category, record: StudyRecord) {
        if let Some(old) = self.raw_categories.remove(&category) {
            tracing::warn!(
                "replacing {} stored under '{}' with a list",
                json_kind(&old),
                category.key()
            );
        }
        self.records_mut(category).push(record);
    }

    /// Remove the first record with `id` from a category.
    pub fn remove(&mut self, category: Category, id: &str) -> Option<StudyRecord> {
        let records = self.records_mut(category);
        let index = records.iter().position(|r| r.id == id)?;
        Some(records.remove(index))
    }

    /// Find a record by id within a category.
    pub fn find_mut(&mut self, category: Category, id: &str) -> Option<&mut StudyRecord> {
        self.records_mut(category).iter_mut().find(|r| r.id == id)
    }

    /// Decode the raw text of a slot.
    ///
    /// Missing categories default to empty and the stored ones are laid over
    /// them. Records are decoded one by one; an entry that is not a valid
    /// record is set aside untouched without affecting its neighbours.
    pub fn decode(raw: Option<&str>) -> (Self, LoadOutcome) {
        let Some(raw) = raw else {
            return (Self::empty(), LoadOutcome::Missing);
        };

        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                return (
                    Self::empty(),
                    LoadOutcome::Corrupt {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let object = match parsed {
            Value::Object(object) => object,
            other => {
                return (
                    Self::empty(),
                    LoadOutcome::Corrupt {
                        reason: format!("expected a JSON object, found {}", json_kind(&other)),
                    },
                )
            }
        };

        let mut state = Self::empty();
        let mut report = RestoreReport::default();
        let mut seen = Vec::new();

        for (key, value) in object {
            let Some(category) = Category::from_key(&key) else {
                report.unknown_keys.push(key.clone());
                state.unknown.insert(key, value);
                continue;
            };
            seen.push(category);

            let items = match value {
                Value::Array(items) => items,
                other => {
                    tracing::warn!(
                        "category '{}' holds {} instead of a list, keeping it as-is",
                        key,
                        json_kind(&other)
                    );
                    report.unreadable_categories.push(category);
                    state.raw_categories.insert(category, other);
                    continue;
                }
            };

            for item in items {
                match StudyRecord::deserialize(&item) {
                    Ok(record) => state.records_mut(category).push(record),
                    Err(e) => {
                        tracing::warn!("keeping unreadable record in '{}' as-is: {}", key, e);
                        report.unreadable_records += 1;
                        state.unreadable.entry(category).or_default().push(item);
                    }
                }
            }
        }

        report.missing_categories = Category::ALL
            .into_iter()
            .filter(|c| !seen.contains(c))
            .collect();

        (state, LoadOutcome::Restored(report))
    }

    /// Encode the aggregate for storage.
    ///
    /// All five categories are always written, followed by any preserved
    /// unknown keys. Unreadable entries follow the readable records of their
    /// category.
    pub fn encode(&self) -> Result<String> {
        let mut object = self.unknown.clone();
        for category in Category::ALL {
            let value = match self.raw_categories.get(&category) {
                Some(raw) => raw.clone(),
                None => {
                    let mut items = Vec::new();
                    for record in self.records(category) {
                        items.push(serde_json::to_value(record)?);
                    }
                    if let Some(kept) = self.unreadable.get(&category) {
                        items.extend(kept.iter().cloned());
                    }
                    Value::Array(items)
                }
            };
            object.insert(category.key().to_string(), value);
        }
        Ok(serde_json::to_string(&Value::Object(object))?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
