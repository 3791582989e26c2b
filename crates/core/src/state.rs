//! The state variant model.
//!
//! States deserialize through private raw shapes so that every per-field
//! invariant is enforced during conversion: no partially-invalid state can
//! exist, let alone reach the graph builder.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::placeholders;
use crate::sql::{self, SqlShapeError};

/// One node of the conversation graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawState")]
pub enum BotState {
    Start {
        id: String,
    },
    End {
        id: String,
    },
    SendMessage {
        id: String,
        text: String,
    },
    WaitForInput {
        id: String,
        /// Session key the literal input is written to; empty discards it.
        session_field: String,
        expected: ExpectedValues,
    },
    JdbcRead {
        id: String,
        query: String,
        session_field: String,
    },
    JdbcWrite {
        id: String,
        query: String,
    },
    Http {
        id: String,
        request: HttpRequestDetails,
        extraction_key: String,
        session_field: String,
    },
}

impl BotState {
    pub fn id(&self) -> &str {
        match self {
            BotState::Start { id }
            | BotState::End { id }
            | BotState::SendMessage { id, .. }
            | BotState::WaitForInput { id, .. }
            | BotState::JdbcRead { id, .. }
            | BotState::JdbcWrite { id, .. }
            | BotState::Http { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BotState::Start { .. } => "start",
            BotState::End { .. } => "end",
            BotState::SendMessage { .. } => "send-message",
            BotState::WaitForInput { .. } => "wait-for-input",
            BotState::JdbcRead { .. } => "jdbc-read",
            BotState::JdbcWrite { .. } => "jdbc-write",
            BotState::Http { .. } => "http",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, BotState::Start { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, BotState::End { .. })
    }

    /// A traversal suspends when it appends a wait-for-input or end state.
    pub fn is_suspension_point(&self) -> bool {
        matches!(self, BotState::WaitForInput { .. } | BotState::End { .. })
    }
}

/// The policy by which a wait-for-input state classifies raw input.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpectedValues {
    /// A fixed list of valid inputs; anything else replays `on_mismatch`.
    Static { values: Vec<String>, on_mismatch: String },
    /// Any input is accepted.
    Any,
    /// Valid inputs are read from the session at dispatch time; the key
    /// must resolve to a sequence.
    Session { key: String, on_mismatch: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            _ => Err(ConfigError::InvalidHttpMethod { method: method.to_owned() }),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HttpParam {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HttpHeaders {
    #[serde(rename = "content-type", default)]
    pub content_type: String,
    #[serde(default)]
    pub accept: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequestDetails {
    pub method: HttpMethod,
    pub url: String,
    pub query_params: Vec<HttpParam>,
    pub body_params: Vec<HttpParam>,
    pub headers: HttpHeaders,
}

/// One edge of the conversation graph. Multiple relationships between the
/// same pair are not allowed; different input branches from one state go to
/// different targets or share one label list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "on-input", default)]
    pub on_input: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawState {
    Start {
        id: String,
    },
    End {
        id: String,
    },
    SendMessage {
        id: String,
        text: String,
    },
    WaitForInput {
        id: String,
        #[serde(rename = "session-field", default)]
        session_field: String,
        #[serde(rename = "expected-values")]
        expected: RawExpectedValues,
    },
    JdbcRead {
        id: String,
        query: String,
        #[serde(rename = "session-field")]
        session_field: String,
    },
    JdbcWrite {
        id: String,
        query: String,
    },
    Http {
        id: String,
        request: RawHttpRequest,
        #[serde(rename = "extraction-key")]
        extraction_key: String,
        #[serde(rename = "session-field")]
        session_field: String,
    },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawExpectedValues {
    Static {
        values: Vec<String>,
        #[serde(rename = "on-mismatch")]
        on_mismatch: String,
    },
    Any,
    Session {
        key: String,
        #[serde(rename = "on-mismatch")]
        on_mismatch: String,
    },
}

#[derive(Clone, Debug, Deserialize)]
struct RawHttpRequest {
    method: String,
    url: String,
    #[serde(rename = "query-params", default)]
    query_params: Vec<HttpParam>,
    #[serde(rename = "body-params", default)]
    body_params: Vec<HttpParam>,
    #[serde(default)]
    headers: HttpHeaders,
}

fn require_id(id: String) -> Result<String, ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::EmptyStateId);
    }
    Ok(id)
}

fn require_field(id: &str, field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyField { id: id.to_owned(), field: field.to_owned() });
    }
    Ok(())
}

fn validate_expected(id: &str, raw: RawExpectedValues) -> Result<ExpectedValues, ConfigError> {
    match raw {
        RawExpectedValues::Static { values, on_mismatch } => {
            if values.is_empty() {
                return Err(ConfigError::EmptyExpectedValues { id: id.to_owned() });
            }
            require_field(id, "on-mismatch", &on_mismatch)?;
            Ok(ExpectedValues::Static { values, on_mismatch })
        }
        RawExpectedValues::Any => Ok(ExpectedValues::Any),
        RawExpectedValues::Session { key, on_mismatch } => {
            require_field(id, "key", &key)?;
            require_field(id, "on-mismatch", &on_mismatch)?;
            Ok(ExpectedValues::Session { key, on_mismatch })
        }
    }
}

fn validate_request(id: &str, raw: RawHttpRequest) -> Result<HttpRequestDetails, ConfigError> {
    let method: HttpMethod = raw.method.parse()?;
    require_field(id, "url", &raw.url)?;

    // The url may embed placeholders; it only has to be syntactically
    // valid once they are substituted.
    let checkable = placeholders::mask(&raw.url, "sessiondata");
    if url::Url::parse(&checkable).is_err() {
        return Err(ConfigError::InvalidUrl { id: id.to_owned(), url: raw.url });
    }

    Ok(HttpRequestDetails {
        method,
        url: raw.url,
        query_params: raw.query_params,
        body_params: raw.body_params,
        headers: raw.headers,
    })
}

fn read_query_error(id: &str, query: &str, shape: SqlShapeError) -> ConfigError {
    let id = id.to_owned();
    let query = query.to_owned();
    match shape {
        SqlShapeError::NotASelect => ConfigError::QueryNotASelect { id, query },
        SqlShapeError::NotSingleColumn => ConfigError::QueryNotSingleColumn { id, query },
        SqlShapeError::NotAWrite | SqlShapeError::Malformed => {
            ConfigError::MalformedQuery { id, query }
        }
    }
}

fn write_query_error(id: &str, query: &str, shape: SqlShapeError) -> ConfigError {
    let id = id.to_owned();
    let query = query.to_owned();
    match shape {
        SqlShapeError::NotAWrite => ConfigError::QueryNotAWrite { id, query },
        _ => ConfigError::MalformedQuery { id, query },
    }
}

impl TryFrom<RawState> for BotState {
    type Error = ConfigError;

    fn try_from(raw: RawState) -> Result<Self, Self::Error> {
        match raw {
            RawState::Start { id } => Ok(BotState::Start { id: require_id(id)? }),
            RawState::End { id } => Ok(BotState::End { id: require_id(id)? }),
            RawState::SendMessage { id, text } => {
                let id = require_id(id)?;
                require_field(&id, "text", &text)?;
                Ok(BotState::SendMessage { id, text })
            }
            RawState::WaitForInput { id, session_field, expected } => {
                let id = require_id(id)?;
                let expected = validate_expected(&id, expected)?;
                Ok(BotState::WaitForInput { id, session_field, expected })
            }
            RawState::JdbcRead { id, query, session_field } => {
                let id = require_id(id)?;
                require_field(&id, "session-field", &session_field)?;
                require_field(&id, "query", &query)?;
                sql::expect_single_column_select(&query)
                    .map_err(|shape| read_query_error(&id, &query, shape))?;
                Ok(BotState::JdbcRead { id, query, session_field })
            }
            RawState::JdbcWrite { id, query } => {
                let id = require_id(id)?;
                require_field(&id, "query", &query)?;
                sql::expect_write_statement(&query)
                    .map_err(|shape| write_query_error(&id, &query, shape))?;
                Ok(BotState::JdbcWrite { id, query })
            }
            RawState::Http { id, request, extraction_key, session_field } => {
                let id = require_id(id)?;
                require_field(&id, "extraction-key", &extraction_key)?;
                require_field(&id, "session-field", &session_field)?;
                let request = validate_request(&id, request)?;
                Ok(BotState::Http { id, request, extraction_key, session_field })
            }
        }
    }
}
