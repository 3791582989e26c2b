use flowbot_core::GraphError;
use thiserror::Error;

/// A collaborator call failed, or no collaborator was configured for a
/// state kind the configuration uses.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no {0} client configured but the bot definition requires one")]
    NotConfigured(&'static str),
    #[error("client call failed: {source}")]
    Call {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ClientError {
    pub fn call(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ClientError::Call { source: Box::new(source) }
    }
}

/// A turn failed mid-execution. The chat's stored record is left untouched
/// so the next message retries from the same state.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session keys [{}] not found in current context", .keys.join(", "))]
    MissingSessionKeys { keys: Vec<String> },
    #[error("session key '{key}' not found in current context")]
    SessionKeyNotFound { key: String },
    #[error("session key '{key}' doesn't contain a list: '{found}' found")]
    NotAList { key: String, found: String },
    #[error("extraction key [{key}] not found in response")]
    ExtractionKeyNotFound { key: String },
    #[error("value at extraction key [{key}] can't be stored in the session")]
    UnsupportedResponseValue { key: String },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
