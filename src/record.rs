// src/record.rs
//! Structured records: a required identifier, arbitrary JSON-valued fields,
//! and the set of fields tokenized into blind-index terms.
//!
//! The identifier lives inside `fields` under `id_field` (e.g. `acc_no`) so
//! a schema-less map round-trips unchanged through encryption.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::DEFAULT_SEARCHABLE_FIELD;
use crate::error::{CoreError, CoreResult};

/// Canonical form of a search term: surrounding whitespace stripped, lowercased
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord", into = "RawRecord")]
pub struct Record {
    id: String,
    id_field: String,
    fields: BTreeMap<String, Value>,
    searchable: BTreeSet<String>,
}

/// Serialized shape; `BTreeMap`/`BTreeSet` keep the byte form canonical
#[derive(Serialize, Deserialize)]
struct RawRecord {
    id_field: String,
    fields: BTreeMap<String, Value>,
    searchable: BTreeSet<String>,
}

impl TryFrom<RawRecord> for Record {
    type Error = CoreError;

    fn try_from(raw: RawRecord) -> CoreResult<Self> {
        let id = raw
            .fields
            .get(&raw.id_field)
            .ok_or_else(|| {
                CoreError::InvalidRecord(format!("missing identifier field `{}`", raw.id_field))
            })
            .and_then(identifier_from_value)?;

        Ok(Record {
            id,
            id_field: raw.id_field,
            fields: raw.fields,
            searchable: raw.searchable,
        })
    }
}

impl From<Record> for RawRecord {
    fn from(record: Record) -> Self {
        RawRecord {
            id_field: record.id_field,
            fields: record.fields,
            searchable: record.searchable,
        }
    }
}

fn identifier_from_value(value: &Value) -> CoreResult<String> {
    let id = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(CoreError::InvalidRecord(format!(
                "identifier must be a string or number, got {other}"
            )))
        }
    };

    if id.trim().is_empty() {
        return Err(CoreError::InvalidRecord("identifier is empty".into()));
    }
    // The identifier is indexed in normalized form; padded variants would collide there
    if id.trim() != id {
        return Err(CoreError::InvalidRecord(format!(
            "identifier `{id}` has surrounding whitespace"
        )));
    }
    Ok(id)
}

impl Record {
    /// New record with `id_field = id`; `name` is the searchable field until changed
    pub fn new(id_field: impl Into<String>, id: impl Into<String>) -> Self {
        let id_field = id_field.into();
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert(id_field.clone(), Value::String(id.clone()));

        Record {
            id,
            id_field,
            fields,
            searchable: BTreeSet::from([DEFAULT_SEARCHABLE_FIELD.to_owned()]),
        }
    }

    /// Build from a free-form JSON object, taking the identifier from `id_field`
    pub fn from_map<I, S>(map: Map<String, Value>, id_field: &str, searchable: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Record::try_from(RawRecord {
            id_field: id_field.to_owned(),
            fields: map.into_iter().collect(),
            searchable: searchable.into_iter().map(Into::into).collect(),
        })
    }

    /// Set a field; the identifier field is fixed at construction and left untouched
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name != self.id_field {
            self.fields.insert(name, value.into());
        }
        self
    }

    /// Replace the set of fields tokenized into search terms
    pub fn with_searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn searchable(&self) -> &BTreeSet<String> {
        &self.searchable
    }

    /// The record as the flat JSON object callers originally supplied
    pub fn to_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Distinct normalized terms this record is findable by: every whitespace
    /// token of each searchable field, plus the raw identifier
    pub fn index_terms(&self) -> BTreeSet<String> {
        let mut terms = BTreeSet::new();

        for name in &self.searchable {
            match self.fields.get(name) {
                Some(Value::String(s)) => {
                    terms.extend(s.split_whitespace().map(normalize_term));
                }
                Some(Value::Number(n)) => {
                    terms.insert(n.to_string());
                }
                _ => {}
            }
        }

        terms.insert(normalize_term(&self.id));
        terms.retain(|t| !t.is_empty());
        terms
    }

    pub(crate) fn validate(&self) -> CoreResult<()> {
        let stored = self.fields.get(&self.id_field).ok_or_else(|| {
            CoreError::InvalidRecord(format!("missing identifier field `{}`", self.id_field))
        })?;
        let id = identifier_from_value(stored)?;
        if id != self.id {
            return Err(CoreError::InvalidRecord(
                "identifier field disagrees with record identifier".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aarav() -> Record {
        Record::new("id", "20001")
            .with_field("name", "Aarav Sharma")
            .with_field("balance", "7500")
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_term("  AaRaV \t"), "aarav");
        assert_eq!(normalize_term("   "), "");
    }

    #[test]
    fn index_terms_cover_name_tokens_and_identifier() {
        let terms: Vec<_> = aarav().index_terms().into_iter().collect();
        assert_eq!(terms, vec!["20001", "aarav", "sharma"]);
    }

    #[test]
    fn index_terms_are_deduplicated() {
        let record = Record::new("id", "Rao").with_field("name", "Vikram RAO rao");
        let terms: Vec<_> = record.index_terms().into_iter().collect();
        assert_eq!(terms, vec!["rao", "vikram"]);
    }

    #[test]
    fn non_searchable_fields_are_not_indexed() {
        let terms = aarav().index_terms();
        assert!(!terms.contains("7500"));
    }

    #[test]
    fn from_map_takes_identifier_from_named_field() {
        let map = json!({"name": "Diya Patel", "acc_no": "20002", "balance": "12000"});
        let Value::Object(map) = map else { unreachable!() };

        let record = Record::from_map(map.clone(), "acc_no", ["name"]).unwrap();
        assert_eq!(record.id(), "20002");
        assert_eq!(record.to_map(), map);
    }

    #[test]
    fn from_map_accepts_numeric_identifier() {
        let Value::Object(map) = json!({"acc_no": 20003, "name": "Rohan Mehta"}) else {
            unreachable!()
        };
        let record = Record::from_map(map, "acc_no", ["name"]).unwrap();
        assert_eq!(record.id(), "20003");
    }

    #[test]
    fn from_map_rejects_missing_or_blank_identifier() {
        let Value::Object(missing) = json!({"name": "x"}) else { unreachable!() };
        assert!(matches!(
            Record::from_map(missing, "acc_no", ["name"]),
            Err(CoreError::InvalidRecord(_))
        ));

        let Value::Object(blank) = json!({"acc_no": "  ", "name": "x"}) else { unreachable!() };
        assert!(matches!(
            Record::from_map(blank, "acc_no", ["name"]),
            Err(CoreError::InvalidRecord(_))
        ));
    }

    #[test]
    fn padded_identifier_is_rejected() {
        let Value::Object(padded) = json!({"acc_no": " 20001 ", "name": "x"}) else {
            unreachable!()
        };
        assert!(matches!(
            Record::from_map(padded, "acc_no", ["name"]),
            Err(CoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            Record::new("id", "20001\t").validate(),
            Err(CoreError::InvalidRecord(_))
        ));
    }

    #[test]
    fn with_field_cannot_overwrite_identifier() {
        let record = aarav().with_field("id", "99999");
        assert_eq!(record.id(), "20001");
        assert_eq!(record.get("id"), Some(&json!("20001")));
    }

    #[test]
    fn serialized_form_is_canonical() {
        let a = Record::new("id", "1").with_field("b", 2).with_field("a", 1);
        let b = Record::new("id", "1").with_field("a", 1).with_field("b", 2);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }
}
