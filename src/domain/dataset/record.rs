// ============================================================
// ROW RECORDS
// ============================================================
// JSON-safe values, one ordered record per source row

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A cell value that can always be encoded as JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SanitizedValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl SanitizedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SanitizedValue::Null)
    }

    #[cfg(test)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SanitizedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Floats that JSON cannot carry (NaN, infinities) become `Null`.
    pub fn from_f64(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(SanitizedValue::Number)
            .unwrap_or(SanitizedValue::Null)
    }
}

impl From<i64> for SanitizedValue {
    fn from(value: i64) -> Self {
        SanitizedValue::Number(value.into())
    }
}

/// Ordered mapping of column name to sanitized value.
///
/// Serializes as a JSON object whose keys follow column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowRecord {
    fields: Vec<(String, SanitizedValue)>,
}

impl RowRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: SanitizedValue) {
        self.fields.push((name.into(), value));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&SanitizedValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_in_column_order() {
        let mut record = RowRecord::default();
        record.push("zeta", SanitizedValue::from(1i64));
        record.push("alpha", SanitizedValue::Null);
        record.push("mid", SanitizedValue::Text(String::new()));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":null,"mid":""}"#);
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert!(SanitizedValue::from_f64(f64::NAN).is_null());
        assert!(SanitizedValue::from_f64(f64::INFINITY).is_null());
        assert!(SanitizedValue::from_f64(f64::NEG_INFINITY).is_null());
        assert_eq!(
            serde_json::to_string(&SanitizedValue::from_f64(2.5)).unwrap(),
            "2.5"
        );
    }

    #[test]
    fn test_bool_is_json_bool() {
        assert_eq!(
            serde_json::to_string(&SanitizedValue::Bool(true)).unwrap(),
            "true"
        );
    }
}
