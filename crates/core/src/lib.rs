//! Core domain model for the bot engine: state definitions, the validated
//! conversation graph, per-chat session data, and placeholder templating.

pub mod config;
pub mod errors;
pub mod graph;
pub mod placeholders;
pub mod session;
pub mod sql;
pub mod state;

pub use config::{load_graph, parse_definition, BotDefinition, DefinitionError};
pub use errors::{ConfigError, ConfigParseError, GraphError};
pub use graph::ConversationGraph;
pub use session::{SessionData, SessionValue};
pub use state::{
    BotState, ExpectedValues, HttpHeaders, HttpMethod, HttpParam, HttpRequestDetails, Relationship,
};
