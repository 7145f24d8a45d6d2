//! Catalog entries and the normalizer that produces them.
//!
//! Defines:
//! - `Entry`, one BOF in canonical form, and its `EntryId`
//! - `normalize` which coerces an arbitrary JSON record into an `Entry`
//! - `parse_catalog` which reads the `bofs` array out of an index document

use serde_json::Value;

/// Name given to entries whose record has no usable name
pub const UNNAMED: &str = "(unnamed)";

/// Stable identifier of an entry for the lifetime of one load.
///
/// It is the entry's position in the index document, so ordering by id is
/// ordering by load order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

/// A normalized catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub source_file: String,
    pub source_format: String,
    pub repository_stars: u64,
    pub repository_last_updated: String,
}

impl Entry {
    /// True when the entry links somewhere that can be opened or copied
    pub fn has_repository(&self) -> bool {
        !self.repository.is_empty()
    }
}

/// Coerce one raw record into an `Entry`. Never fails: anything missing or
/// of the wrong shape falls back to its default.
pub fn normalize(id: EntryId, raw: &Value) -> Entry {
    let name = string_field(raw, "name");

    Entry {
        id,
        name: if name.is_empty() {
            UNNAMED.to_string()
        } else {
            name
        },
        description: string_field(raw, "description"),
        repository: string_field(raw, "repository"),
        source_file: string_field(raw, "source_file"),
        source_format: string_field(raw, "source_format"),
        repository_stars: stars_field(raw.get("repository_stars")),
        repository_last_updated: string_field(raw, "repository_last_updated"),
    }
}

/// Normalize every record of the document's `bofs` array.
/// A missing or non-array `bofs` yields no entries.
pub fn parse_catalog(payload: &Value) -> Vec<Entry> {
    payload
        .get("bofs")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .enumerate()
                .map(|(i, raw)| normalize(EntryId(i), raw))
                .collect()
        })
        .unwrap_or_default()
}

fn string_field(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn stars_field(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else {
                n.as_f64().map(clamp_stars).unwrap_or(0)
            }
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().map(clamp_stars).unwrap_or(0),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

// Negative, NaN and infinite counts are not meaningful star counts
fn clamp_stars(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.trunc() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_record_is_kept_as_is() {
        let raw = json!({
            "name": "nanodump",
            "description": "LSASS dumper",
            "repository": "https://github.com/fortra/nanodump",
            "source_file": "bofs.md",
            "source_format": "markdown",
            "repository_stars": 1800,
            "repository_last_updated": "2024-05-01T10:00:00Z"
        });
        let entry = normalize(EntryId(3), &raw);
        assert_eq!(entry.id, EntryId(3));
        assert_eq!(entry.name, "nanodump");
        assert_eq!(entry.description, "LSASS dumper");
        assert_eq!(entry.repository_stars, 1800);
        assert_eq!(entry.repository_last_updated, "2024-05-01T10:00:00Z");
        assert!(entry.has_repository());
    }

    #[test]
    fn missing_fields_get_defaults() {
        let entry = normalize(EntryId(0), &json!({}));
        assert_eq!(entry.name, UNNAMED);
        assert_eq!(entry.description, "");
        assert_eq!(entry.repository, "");
        assert_eq!(entry.repository_stars, 0);
        assert!(!entry.has_repository());
    }

    #[test]
    fn empty_name_gets_placeholder() {
        let entry = normalize(EntryId(0), &json!({ "name": "" }));
        assert_eq!(entry.name, UNNAMED);
    }

    #[test]
    fn wrong_types_are_coerced() {
        let raw = json!({
            "name": 42,
            "description": ["not", "a", "string"],
            "repository": null,
            "repository_stars": "17"
        });
        let entry = normalize(EntryId(0), &raw);
        assert_eq!(entry.name, "42");
        assert_eq!(entry.description, "");
        assert_eq!(entry.repository, "");
        assert_eq!(entry.repository_stars, 17);
    }

    #[test]
    fn odd_star_values_never_fail() {
        let stars = |v: Value| normalize(EntryId(0), &json!({ "repository_stars": v })).repository_stars;
        assert_eq!(stars(json!(-5)), 0);
        assert_eq!(stars(json!(12.9)), 12);
        assert_eq!(stars(json!("lots")), 0);
        assert_eq!(stars(json!({ "count": 3 })), 0);
        assert_eq!(stars(Value::Null), 0);
    }

    #[test]
    fn non_object_record_normalizes_to_defaults() {
        let entry = normalize(EntryId(1), &json!("just a string"));
        assert_eq!(entry.name, UNNAMED);
        assert_eq!(entry.repository_stars, 0);
    }

    #[test]
    fn catalog_assigns_ids_in_load_order() {
        let payload = json!({ "bofs": [{ "name": "a" }, { "name": "b" }, { "name": "c" }] });
        let entries = parse_catalog(&payload);
        let ids: Vec<usize> = entries.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(entries[1].name, "b");
    }

    #[test]
    fn missing_or_non_array_bofs_is_empty() {
        assert!(parse_catalog(&json!({})).is_empty());
        assert!(parse_catalog(&json!({ "bofs": "nope" })).is_empty());
        assert!(parse_catalog(&json!([1, 2, 3])).is_empty());
    }
}
