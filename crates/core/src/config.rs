//! Parsing of bot definition documents.

use serde::Deserialize;

use crate::errors::{ConfigError, ConfigParseError};
use crate::graph::ConversationGraph;
use crate::state::{BotState, Relationship};

/// The raw document shape: a list of states and a list of relationships.
/// State-level invariants are already enforced during deserialization;
/// graph-level ones when the definition is turned into a graph.
#[derive(Debug, Deserialize)]
pub struct BotDefinition {
    pub states: Vec<BotState>,
    pub relationships: Vec<Relationship>,
}

impl BotDefinition {
    pub fn into_graph(self) -> Result<ConversationGraph, ConfigError> {
        ConversationGraph::build(self.states, self.relationships)
    }
}

/// Why a definition document could not be loaded.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error(transparent)]
    Parse(#[from] ConfigParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parses a JSON bot definition, distinguishing a document that is not
/// valid JSON from valid JSON describing invalid bot logic.
pub fn parse_definition(document: &str) -> Result<BotDefinition, DefinitionError> {
    serde_json::from_str(document).map_err(|error| match error.classify() {
        serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
            DefinitionError::Parse(ConfigParseError(error.to_string()))
        }
        _ => DefinitionError::Config(ConfigError::Definition(error.to_string())),
    })
}

/// Parses a definition and builds the validated graph in one step.
pub fn load_graph(document: &str) -> Result<ConversationGraph, DefinitionError> {
    let definition = parse_definition(document)?;
    Ok(definition.into_graph()?)
}

#[cfg(test)]
mod tests {
    use super::{load_graph, parse_definition, DefinitionError};

    const HELLO_WORLD: &str = r#"{
        "states": [
            {"type": "start", "id": "start"},
            {"type": "send-message", "id": "greet", "text": "hello world"},
            {"type": "end", "id": "end"}
        ],
        "relationships": [
            {"from": "start", "to": "greet"},
            {"from": "greet", "to": "end"}
        ]
    }"#;

    #[test]
    fn parses_and_builds_a_valid_definition() {
        let graph = load_graph(HELLO_WORLD).expect("valid definition");
        assert_eq!(graph.states().len(), 3);
        assert_eq!(graph.start_state().id(), "start");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = parse_definition("{\"states\": [").expect_err("truncated document");
        assert!(matches!(error, DefinitionError::Parse(_)));
    }

    #[test]
    fn invalid_state_logic_is_a_config_error() {
        let document = r#"{
            "states": [{"type": "send-message", "id": "greet", "text": ""}],
            "relationships": []
        }"#;
        let error = parse_definition(document).expect_err("empty text");
        assert!(matches!(error, DefinitionError::Config(_)));
        assert!(error.to_string().contains("'text' can't be empty"));
    }

    #[test]
    fn unknown_state_type_is_a_config_error() {
        let document = r#"{
            "states": [{"type": "teleport", "id": "x"}],
            "relationships": []
        }"#;
        let error = parse_definition(document).expect_err("unknown variant");
        assert!(matches!(error, DefinitionError::Config(_)));
    }

    #[test]
    fn graph_level_failures_surface_through_load() {
        let document = r#"{
            "states": [{"type": "start", "id": "start"}],
            "relationships": []
        }"#;
        let error = load_graph(document).expect_err("no end state");
        assert!(error.to_string().contains("must have an end state"));
    }
}
