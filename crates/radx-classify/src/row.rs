//! Tabular record source abstraction.

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::Value;

/// One row of a tabular source: field name to raw text, or absent.
pub trait Row {
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    /// [`Row::field`] with blank values treated as absent.
    fn present(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name).filter(|value| !value.trim().is_empty())
    }
}

impl<K, V, S> Row for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

impl<K, V> Row for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

/// JSON objects as exported by spreadsheet-to-JSON tools: strings pass
/// through, numbers and booleans are stringified, `null` is absent, and
/// arrays are joined with `"; "`.
impl Row for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        json_text(self.get(name)?)
    }
}

fn json_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
        Value::Array(items) => {
            let parts: Vec<Cow<'_, str>> = items.iter().filter_map(json_text).collect();
            (!parts.is_empty()).then(|| Cow::Owned(parts.join("; ")))
        }
        Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_expose_fields() {
        let row: HashMap<&str, &str> = HashMap::from([("phs", "phs002682"), ("DCC", "  ")]);
        assert_eq!(row.field("phs").as_deref(), Some("phs002682"));
        assert_eq!(row.field("DCC").as_deref(), Some("  "));
        assert_eq!(row.present("DCC"), None);
        assert_eq!(row.field("missing"), None);

        let row: BTreeMap<String, String> = BTreeMap::from([("a".into(), "b".into())]);
        assert_eq!(row.field("a").as_deref(), Some("b"));
    }

    #[test]
    fn json_values_are_stringified() {
        let value = json!({
            "phs": "phs002682",
            "Estimated Participants - Cleaned": 488,
            "DCC": null,
            "types": ["Survey", "Wearable"],
        });
        let Value::Object(row) = value else {
            unreachable!()
        };
        assert_eq!(row.field("phs").as_deref(), Some("phs002682"));
        assert_eq!(
            row.field("Estimated Participants - Cleaned").as_deref(),
            Some("488")
        );
        assert_eq!(row.field("DCC"), None);
        assert_eq!(row.field("types").as_deref(), Some("Survey; Wearable"));
    }
}
