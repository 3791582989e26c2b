//! Per-chat session storage.
//!
//! Session values are a small closed variant rather than an open `Any`
//! type: state execution only ever needs text, numbers, and sequences, and
//! the closed set makes the "must be a sequence" checks in the interpreter
//! explicit instead of runtime casts.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionValue {
    Text(String),
    Number(serde_json::Number),
    List(Vec<SessionValue>),
}

impl SessionValue {
    /// Converts a JSON value into a session value. Objects and nulls have
    /// no session representation and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<SessionValue> {
        match value {
            serde_json::Value::String(text) => Some(SessionValue::Text(text.clone())),
            serde_json::Value::Number(number) => Some(SessionValue::Number(number.clone())),
            serde_json::Value::Bool(flag) => Some(SessionValue::Text(flag.to_string())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(SessionValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(SessionValue::List),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SessionValue]> {
        match self {
            SessionValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for SessionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionValue::Text(text) => f.write_str(text),
            SessionValue::Number(number) => write!(f, "{number}"),
            SessionValue::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for SessionValue {
    fn from(text: &str) -> Self {
        SessionValue::Text(text.to_owned())
    }
}

impl From<String> for SessionValue {
    fn from(text: String) -> Self {
        SessionValue::Text(text)
    }
}

impl From<i64> for SessionValue {
    fn from(number: i64) -> Self {
        SessionValue::Number(number.into())
    }
}

impl From<Vec<SessionValue>> for SessionValue {
    fn from(items: Vec<SessionValue>) -> Self {
        SessionValue::List(items)
    }
}

/// The per-chat key/value store. Created empty when a chat's first message
/// arrives, mutated by state execution, destroyed when the conversation
/// reaches the end state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionData {
    data: BTreeMap<String, SessionValue>,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: SessionValue) {
        self.data.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
