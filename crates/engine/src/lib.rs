//! Turn execution for the bot engine: the interpreter that walks the
//! conversation graph, the collaborator traits it calls out through, and
//! the message types the surrounding runtime exchanges with it.

pub mod accumulator;
pub mod clients;
pub mod errors;
pub mod interpreter;
pub mod messages;

pub use accumulator::Accumulator;
pub use clients::{
    HttpClient, ResolvedHttpRequest, SqlClient, UnconfiguredHttpClient, UnconfiguredSqlClient,
};
pub use errors::{ClientError, RuntimeError};
pub use interpreter::{ConversationEngine, Turn};
pub use messages::{ChatId, InboundMessage, InputCheck, MemoryRecord, OutboundMessage};
