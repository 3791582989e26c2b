//! Message and record types flowing between transport, store, and engine.

use flowbot_core::SessionData;

/// Transport-level chat identifier.
pub type ChatId = i64;

/// A raw message from a chat participant.
#[derive(Clone, Debug, PartialEq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub text: String,
}

/// What a turn sends back: zero or more messages, plus the valid choices
/// when the conversation is parked on a constrained input.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub messages: Vec<String>,
    pub choices: Vec<String>,
}

/// Where a chat is parked between turns: the id of the state awaiting
/// input and the accumulated session data.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryRecord {
    pub state_id: String,
    pub session: SessionData,
}

impl MemoryRecord {
    pub fn new(state_id: impl Into<String>) -> Self {
        MemoryRecord { state_id: state_id.into(), session: SessionData::new() }
    }
}

/// The verdict on one piece of raw input against the parked state's
/// expected values.
#[derive(Clone, Debug, PartialEq)]
pub struct InputCheck {
    pub valid: bool,
    pub message: String,
    pub choices: Vec<String>,
}

impl InputCheck {
    pub fn valid() -> Self {
        InputCheck { valid: true, message: String::new(), choices: Vec::new() }
    }

    pub fn mismatch(message: impl Into<String>, choices: Vec<String>) -> Self {
        InputCheck { valid: false, message: message.into(), choices }
    }
}
