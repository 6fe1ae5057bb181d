//! Many-to-many link fields.
//!
//! Solutions link directly to problems through a `problemIds` field that the
//! API may return either as a native JSON list or as a brace-delimited,
//! comma-separated string (`"{3,7,19}"`). [`LinkedIds`] keeps the field as it
//! arrived and parses it on demand. Parsing never fails: anything that cannot
//! be read as a list of ids yields an empty list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A many-to-many link field as received from the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkedIds {
    /// Field missing or null
    #[default]
    Absent,
    /// Already a list of ids
    List(Vec<String>),
    /// Brace-encoded string form, parsed lazily
    Encoded(String),
    /// Present but not interpretable (wrong JSON type, nested values)
    Malformed,
}

impl LinkedIds {
    /// Resolve the field to a list of ids.
    ///
    /// Lists are returned as-is; encoded strings go through
    /// [`parse_encoded_ids`]; absent and malformed fields yield `[]`.
    pub fn ids(&self) -> Vec<String> {
        match self {
            LinkedIds::List(ids) => ids.clone(),
            LinkedIds::Encoded(raw) => parse_encoded_ids(raw),
            LinkedIds::Absent | LinkedIds::Malformed => Vec::new(),
        }
    }

    /// Whether the field resolves to no ids at all.
    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Normalise to the parsed list form.
    pub fn normalized(&self) -> LinkedIds {
        LinkedIds::List(self.ids())
    }

    /// Classify an arbitrary JSON value.
    pub fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => LinkedIds::Absent,
            Some(Value::String(s)) => LinkedIds::Encoded(s),
            Some(Value::Array(items)) => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => ids.push(s),
                        Value::Number(n) if n.is_i64() || n.is_u64() => ids.push(n.to_string()),
                        _ => return LinkedIds::Malformed,
                    }
                }
                LinkedIds::List(ids)
            }
            Some(_) => LinkedIds::Malformed,
        }
    }
}

impl From<Vec<String>> for LinkedIds {
    fn from(ids: Vec<String>) -> Self {
        LinkedIds::List(ids)
    }
}

impl From<&str> for LinkedIds {
    fn from(raw: &str) -> Self {
        LinkedIds::Encoded(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for LinkedIds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(LinkedIds::from_value(value))
    }
}

impl Serialize for LinkedIds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LinkedIds::List(ids) => ids.serialize(serializer),
            LinkedIds::Encoded(raw) => serializer.serialize_str(raw),
            LinkedIds::Absent | LinkedIds::Malformed => serializer.serialize_none(),
        }
    }
}

/// Parse a brace-delimited comma list (`"{3, 7,19}"`) into ids.
///
/// Strips one leading `{` and one trailing `}`, splits on `,`, trims each
/// token and drops empty ones. Surrounding double quotes on a token are
/// removed. A token that still contains a brace means the input was not a
/// flat list, and the whole field resolves to `[]`.
pub fn parse_encoded_ids(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix('{').unwrap_or(trimmed);
    let inner = inner.strip_suffix('}').unwrap_or(inner);

    let mut ids = Vec::new();
    for token in inner.split(',') {
        let token = token.trim();
        let token = token
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(token)
            .trim();
        if token.is_empty() {
            continue;
        }
        if token.contains(['{', '}']) {
            return Vec::new();
        }
        ids.push(token.to_string());
    }
    ids
}
