// 💬 Quote - the record type and its strict decoder
//
// A quote is a `{text, category}` pair. Anything that arrives as JSON
// (persisted snapshot, imported file) goes through `decode_collection`,
// which either yields a typed collection or names the exact violation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// QUOTE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body, never empty
    pub text: String,

    /// Lower-cased category label, never empty
    pub category: String,
}

impl Quote {
    /// Build a quote from raw user input.
    ///
    /// Text is trimmed; category is trimmed and lower-cased. Returns `None`
    /// when either side is empty after trimming.
    pub fn new(text: &str, category: &str) -> Option<Self> {
        let text = text.trim();
        let category = normalize_category(category);

        if text.is_empty() || category.is_empty() {
            return None;
        }

        Some(Quote {
            text: text.to_string(),
            category,
        })
    }

    /// `"<text>" — <category>`
    pub fn display(&self) -> String {
        format!("\"{}\" — {}", self.text, self.category)
    }
}

pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

// ============================================================================
// DECODING
// ============================================================================

/// What was wrong with a JSON payload that was supposed to hold quotes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("expected a JSON array of quotes, found {found}")]
    NotAnArray { found: &'static str },

    #[error("entry {index} is not an object")]
    NotAnObject { index: usize },

    #[error("entry {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("entry {index} field `{field}` should be a string, found {found}")]
    WrongFieldType {
        index: usize,
        field: &'static str,
        found: &'static str,
    },

    #[error("entry {index} field `{field}` is empty")]
    EmptyField { index: usize, field: &'static str },
}

/// Parse text and decode it as a quote collection
pub fn decode_collection_str(raw: &str) -> Result<Vec<Quote>, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    decode_collection(&value)
}

/// Decode an already-parsed JSON value into quotes.
///
/// All-or-nothing: the first bad entry fails the whole payload.
pub fn decode_collection(value: &Value) -> Result<Vec<Quote>, DecodeError> {
    let entries = value.as_array().ok_or(DecodeError::NotAnArray {
        found: json_kind(value),
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_entry(index, entry))
        .collect()
}

/// Decode a single quote object (used for the session "last quote" slot)
pub fn decode_quote(value: &Value) -> Result<Quote, DecodeError> {
    decode_entry(0, value)
}

fn decode_entry(index: usize, entry: &Value) -> Result<Quote, DecodeError> {
    let object = entry.as_object().ok_or(DecodeError::NotAnObject { index })?;

    let text = string_field(index, object, "text")?;
    let category = string_field(index, object, "category")?;

    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::EmptyField { index, field: "text" });
    }

    let category = normalize_category(category);
    if category.is_empty() {
        return Err(DecodeError::EmptyField {
            index,
            field: "category",
        });
    }

    Ok(Quote {
        text: text.to_string(),
        category,
    })
}

fn string_field<'a>(
    index: usize,
    object: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    match object.get(field) {
        None => Err(DecodeError::MissingField { index, field }),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(DecodeError::WrongFieldType {
            index,
            field,
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_normalizes_input() {
        let quote = Quote::new("  Hello  ", " Wisdom ").unwrap();

        assert_eq!(quote.text, "Hello");
        assert_eq!(quote.category, "wisdom");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(Quote::new("", "x").is_none());
        assert!(Quote::new("x", "").is_none());
        assert!(Quote::new("   ", "x").is_none());
        assert!(Quote::new("x", "\t").is_none());
    }

    #[test]
    fn test_display_format() {
        let quote = Quote::new("Never stop learning.", "motivation").unwrap();
        assert_eq!(quote.display(), "\"Never stop learning.\" — motivation");
    }

    #[test]
    fn test_decode_valid_collection() {
        let value = json!([
            { "text": "Believe in yourself.", "category": "inspiration" },
            { "text": "Life is short. Enjoy it.", "category": "Life" },
        ]);

        let quotes = decode_collection(&value).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].category, "life");
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let value = json!([{ "text": "a", "category": "b", "author": "anon" }]);
        assert_eq!(decode_collection(&value).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_not_an_array() {
        assert_eq!(
            decode_collection(&json!("not an array")),
            Err(DecodeError::NotAnArray { found: "string" })
        );
        assert_eq!(
            decode_collection(&json!(42)),
            Err(DecodeError::NotAnArray { found: "number" })
        );
    }

    #[test]
    fn test_decode_entry_violations() {
        assert_eq!(
            decode_collection(&json!([{ "text": "a", "category": "b" }, 7])),
            Err(DecodeError::NotAnObject { index: 1 })
        );
        assert_eq!(
            decode_collection(&json!([{ "text": "a" }])),
            Err(DecodeError::MissingField {
                index: 0,
                field: "category"
            })
        );
        assert_eq!(
            decode_collection(&json!([{ "text": 3, "category": "b" }])),
            Err(DecodeError::WrongFieldType {
                index: 0,
                field: "text",
                found: "number"
            })
        );
        assert_eq!(
            decode_collection(&json!([{ "text": "a", "category": "  " }])),
            Err(DecodeError::EmptyField {
                index: 0,
                field: "category"
            })
        );
    }

    #[test]
    fn test_decode_str_malformed() {
        let err = decode_collection_str("[{\"text\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_decode_empty_array() {
        assert_eq!(decode_collection_str("[]").unwrap(), Vec::<Quote>::new());
    }
}
