use thiserror::Error;

/// Semantic configuration failures: the document deserialized, but the bot
/// logic it describes is invalid. Raised only while constructing states or
/// building the graph; fatal to startup.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("state field 'id' can't be empty")]
    EmptyStateId,
    #[error("state field '{field}' can't be empty for state '{id}'")]
    EmptyField { id: String, field: String },
    #[error("a static expected-values list can't be empty for state '{id}'")]
    EmptyExpectedValues { id: String },
    #[error("'{method}' is not a valid http method, supported methods are: [get, post, put, delete]")]
    InvalidHttpMethod { method: String },
    #[error("url '{url}' is not a valid url for state '{id}'")]
    InvalidUrl { id: String, url: String },
    #[error("invalid query '{query}' for state '{id}': not a select")]
    QueryNotASelect { id: String, query: String },
    #[error("invalid query '{query}' for state '{id}': must have a single column return")]
    QueryNotSingleColumn { id: String, query: String },
    #[error("invalid query '{query}' for state '{id}': not an insert or update")]
    QueryNotAWrite { id: String, query: String },
    #[error("invalid query '{query}' for state '{id}': malformed sql")]
    MalformedQuery { id: String, query: String },

    #[error("a bot configuration must have a start state")]
    MissingStartState,
    #[error("a bot configuration must have an end state")]
    MissingEndState,
    #[error("a bot configuration must have exactly one start state, found {ids:?}")]
    MultipleStartStates { ids: Vec<String> },
    #[error("a bot configuration must have exactly one end state, found {ids:?}")]
    MultipleEndStates { ids: Vec<String> },
    #[error("state ids {ids:?} are not unique")]
    DuplicateStateIds { ids: Vec<String> },
    #[error("relationships {pairs:?} are not unique")]
    DuplicateRelationships { pairs: Vec<String> },
    #[error("no state can be linked to itself: {ids:?}")]
    SelfLoops { ids: Vec<String> },
    #[error("relationships contain state ids {ids:?} which are not defined state ids")]
    UnknownRelationshipIds { ids: Vec<String> },
    #[error("a path between '{start}' and '{end}' must exist")]
    NoStartToEndPath { start: String, end: String },
    #[error("the following states are not connected with start or end state: {ids:?}")]
    DisconnectedStates { ids: Vec<String> },
    #[error("start state is not the first state, states {ids:?} are before it")]
    StatesBeforeStart { ids: Vec<String> },
    #[error("end state is not the last state, states {ids:?} are after it")]
    StatesAfterEnd { ids: Vec<String> },
    #[error("static input state '{id}' has no outgoing relationship on input {values:?}")]
    MissingInputRelationships { id: String, values: Vec<String> },
    #[error("static input state '{id}' doesn't declare expected values {values:?} used as on-input")]
    UndeclaredInputs { id: String, values: Vec<String> },

    /// State-level construction failure surfaced through document
    /// deserialization, where only the rendered message survives.
    #[error("{0}")]
    Definition(String),
}

/// The configuration document itself is not well-formed data. Kept apart
/// from [`ConfigError`] so operators can tell malformed JSON from valid
/// JSON describing invalid bot logic.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("bot definition document is not well-formed json: {0}")]
pub struct ConfigParseError(pub String);

/// A traversal defect surfaced at runtime. Should not occur on a graph
/// that passed validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("no state with id '{id}' found")]
    UnknownState { id: String },
    #[error("state '{id}' has no outgoing relationship matching inputs {inputs:?}")]
    NoMatchingTransition { id: String, inputs: Vec<String> },
}
