use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A raw cell value as it arrived from the source dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Absent,
}

impl Value {
    /// Build a value from a delimited-text cell. Blank cells are absent.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            Self::Absent
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// True when the value carries any signal: not absent and not blank text.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Number(_) => true,
            Self::Text(s) => !s.trim().is_empty(),
            Self::Absent => false,
        }
    }

    /// Numeric coercion. String-typed numbers are accepted; NaN and infinities are not.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Absent => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Text coercion. Numbers render with their shortest round-trip form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Number(n) if n.is_finite() => Some(n.to_string()),
            Self::Number(_) => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Absent => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Absent,
            serde_json::Value::Bool(b) => Self::Text(b.to_string()),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Absent),
            serde_json::Value::String(s) => Self::Text(s),
            // Nested structures carry no scalar signal for any alias.
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Absent,
        }
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One input record: column name → raw value. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// True when `column` exists and holds a present value.
    pub fn has(&self, column: &str) -> bool {
        self.fields.get(column).is_some_and(Value::is_present)
    }

    pub fn has_any(&self, columns: &[&str]) -> bool {
        columns.iter().any(|c| self.has(c))
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.fields.get(column).and_then(Value::as_number)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.fields.get(column).and_then(Value::as_text)
    }

    /// First non-empty text among `columns`, in order.
    pub fn first_text(&self, columns: &[&str]) -> Option<String> {
        columns.iter().find_map(|c| self.text(c))
    }

    /// First finite number among `columns`, in order.
    pub fn first_number(&self, columns: &[&str]) -> Option<f64> {
        columns.iter().find_map(|c| self.number(c))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_from_text() {
        assert_eq!(Value::from(" 1.55 ").as_number(), Some(1.55));
        assert_eq!(Value::from("1e3").as_number(), Some(1000.0));
        assert_eq!(Value::from("n/a").as_number(), None);
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::from("-Infinity").as_number(), None);
    }

    #[test]
    fn blank_cells_are_absent() {
        assert_eq!(Value::from_cell("   "), Value::Absent);
        assert_eq!(Value::from_cell(" PC "), Value::Text("PC".into()));
    }

    #[test]
    fn has_ignores_blank_text() {
        let row = Row::from_pairs([("status", ""), ("name", "WASP-121b")]);
        assert!(!row.has("status"));
        assert!(row.has("name"));
        assert!(!row.has("missing"));
    }

    #[test]
    fn number_renders_as_text() {
        assert_eq!(Value::Number(365.0).as_text().as_deref(), Some("365"));
        assert_eq!(Value::Number(1.2).as_text().as_deref(), Some("1.2"));
    }

    #[test]
    fn json_values_convert() {
        let json: serde_json::Value =
            serde_json::json!({"a": 1.5, "b": "x", "c": null, "d": true, "e": [1]});
        let row = Row::from(json.as_object().unwrap().clone());
        assert_eq!(row.number("a"), Some(1.5));
        assert_eq!(row.text("b").as_deref(), Some("x"));
        assert!(!row.has("c"));
        assert_eq!(row.text("d").as_deref(), Some("true"));
        assert!(!row.has("e"));
    }
}
