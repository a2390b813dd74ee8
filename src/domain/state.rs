//! The interview state: one record per schema section plus resume metadata.
//!
//! States are immutable values. Transitions live in [`crate::domain::actions`]
//! and always return a fresh state; nothing here mutates in place through the
//! public API.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::schema::{SECTIONS, SectionDef, SectionId, SectionShape};

/// One entry of a repeatable-list section.
///
/// The id is an opaque identity token attached at creation and never reused;
/// it exists for list reconciliation and snapshot round-trips, not security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl Item {
    pub(crate) fn empty(def: &SectionDef) -> Self {
        Self {
            id: Uuid::new_v4(),
            values: def
                .fields
                .iter()
                .map(|field| (field.key.to_string(), String::new()))
                .collect(),
        }
    }

    /// Value of a field, empty string when absent.
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub(crate) fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// The payload of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    /// Repeatable-list sections: ordered items, always at least one.
    List(Vec<Item>),
    /// Fixed-group sections: field name to value.
    Group(BTreeMap<String, String>),
}

impl Record {
    pub(crate) fn empty(def: &SectionDef) -> Self {
        match def.shape {
            SectionShape::FixedGroup => Record::Group(
                def.fields
                    .iter()
                    .map(|field| (field.key.to_string(), String::new()))
                    .collect(),
            ),
            SectionShape::RepeatableList => Record::List(vec![Item::empty(def)]),
        }
    }

    /// Value of a fixed-group field, empty string for lists or absent keys.
    pub fn group_value(&self, key: &str) -> &str {
        match self {
            Record::Group(values) => values.get(key).map(String::as_str).unwrap_or(""),
            Record::List(_) => "",
        }
    }

    pub fn items(&self) -> &[Item] {
        match self {
            Record::List(items) => items,
            Record::Group(_) => &[],
        }
    }
}

/// The root aggregate: exactly one record per schema section.
///
/// The section map is private so that every constructed state, including ones
/// deserialized from disk, has passed normalization and satisfies the
/// schema-completeness invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewState {
    sections: BTreeMap<SectionId, Record>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_persisted_at: Option<OffsetDateTime>,
    pub active_section: SectionId,
}

/// The canonical all-empty state, built once per process so that `Reset` is
/// idempotent by equality (placeholder tokens included).
static CANONICAL_INITIAL: Lazy<InterviewState> = Lazy::new(|| InterviewState {
    sections: SECTIONS
        .iter()
        .map(|def| (def.id, Record::empty(def)))
        .collect(),
    last_persisted_at: None,
    active_section: SECTIONS[0].id,
});

impl InterviewState {
    /// The canonical all-empty state: every section present, every list
    /// holding its single placeholder item.
    pub fn initial() -> Self {
        CANONICAL_INITIAL.clone()
    }

    pub fn record(&self, id: SectionId) -> &Record {
        self.sections
            .get(&id)
            .expect("normalized state holds a record per section")
    }

    pub(crate) fn record_mut(&mut self, id: SectionId) -> &mut Record {
        self.sections
            .get_mut(&id)
            .expect("normalized state holds a record per section")
    }

    /// Sections paired with their records, in schema order.
    pub fn sections(&self) -> impl Iterator<Item = (&'static SectionDef, &Record)> {
        SECTIONS.iter().map(|def| (def, self.record(def.id)))
    }

    /// Rebuild a state from an arbitrary JSON tree, keeping whatever is
    /// recognizable and replacing the rest with empty records. Accepts both
    /// the wrapped snapshot shape (`{"sections": {...}}`) and a flat section
    /// map, including the legacy aliases used by earlier snapshot formats.
    pub fn from_snapshot_value(value: &Value) -> Option<Self> {
        let top = value.as_object()?;
        let tree = top
            .get("sections")
            .and_then(Value::as_object)
            .unwrap_or(top);

        let mut state = Self::initial();
        for def in SECTIONS {
            let raw = tree
                .get(def.id.as_str())
                .or_else(|| legacy_alias(def.id).and_then(|alias| tree.get(alias)));
            if let Some(raw) = raw {
                if let Some(record) = record_from_value(def, raw) {
                    state.sections.insert(def.id, record);
                }
            }
        }

        state.last_persisted_at = top
            .get("last_persisted_at")
            .or_else(|| top.get("lastSaved"))
            .and_then(Value::as_str)
            .and_then(|raw| {
                OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339).ok()
            });

        state.active_section = top
            .get("active_section")
            .or_else(|| top.get("currentSection"))
            .and_then(Value::as_str)
            .and_then(SectionId::from_key)
            .unwrap_or(SECTIONS[0].id);

        Some(state)
    }
}

impl<'de> Deserialize<'de> for InterviewState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        InterviewState::from_snapshot_value(&value)
            .ok_or_else(|| serde::de::Error::custom("snapshot is not a JSON object"))
    }
}

/// Section keys written by the earliest snapshot format.
fn legacy_alias(id: SectionId) -> Option<&'static str> {
    match id {
        SectionId::Financial => Some("financialAccounts"),
        SectionId::Insurance => Some("insurancePolicies"),
        SectionId::Property => Some("properties"),
        SectionId::Legal => Some("legalDocuments"),
        _ => None,
    }
}

/// Best-effort conversion of one section subtree. Wrong-shaped input yields
/// `None` and the caller keeps the empty record for that section.
fn record_from_value(def: &SectionDef, raw: &Value) -> Option<Record> {
    match (def.shape, raw) {
        (SectionShape::FixedGroup, Value::Object(map)) => {
            let mut values: BTreeMap<String, String> = def
                .fields
                .iter()
                .map(|field| (field.key.to_string(), String::new()))
                .collect();
            for (key, value) in map {
                if def.has_field(key) {
                    if let Some(text) = value.as_str() {
                        values.insert(key.clone(), text.to_string());
                    }
                }
            }
            Some(Record::Group(values))
        }
        (SectionShape::RepeatableList, Value::Array(entries)) => {
            let mut items: Vec<Item> = entries
                .iter()
                .filter_map(|entry| item_from_value(def, entry))
                .collect();
            if items.is_empty() {
                items.push(Item::empty(def));
            }
            Some(Record::List(items))
        }
        _ => None,
    }
}

fn item_from_value(def: &SectionDef, raw: &Value) -> Option<Item> {
    let map = raw.as_object()?;
    let mut item = Item::empty(def);
    if let Some(id) = map.get("id").and_then(Value::as_str) {
        if let Ok(id) = Uuid::parse_str(id) {
            item.id = id;
        }
    }
    for (key, value) in map {
        if def.has_field(key) {
            if let Some(text) = value.as_str() {
                item.set(key, text.to_string());
            }
        }
    }
    Some(item)
}
