//! Turn-scoped accumulation of outputs and session mutations.

use flowbot_core::SessionData;

/// Collects what a run of states produces: outgoing messages in execution
/// order, the choices of the state the run parks on, and the session as
/// mutated along the way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accumulator {
    pub output_messages: Vec<String>,
    pub choices: Vec<String>,
    pub context: SessionData,
}

impl Accumulator {
    pub fn new(context: SessionData) -> Self {
        Accumulator { output_messages: Vec::new(), choices: Vec::new(), context }
    }

    /// Appends a message; empty texts are dropped rather than sent.
    pub fn push_message(&mut self, message: String) {
        if !message.is_empty() {
            self.output_messages.push(message);
        }
    }

    /// Replaces the current choices. An empty list leaves the previous
    /// choices in place so a branch without constraints can't erase them.
    pub fn set_choices(&mut self, choices: Vec<String>) {
        if !choices.is_empty() {
            self.choices = choices;
        }
    }
}
