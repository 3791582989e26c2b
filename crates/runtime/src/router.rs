//! Per-chat serialized dispatch.
//!
//! Each chat gets a mailbox drained by its own worker task, so turns for
//! one chat run strictly in arrival order while different chats proceed in
//! parallel against the shared engine.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use flowbot_core::BotState;
use flowbot_engine::{
    ChatId, ConversationEngine, HttpClient, InboundMessage, OutboundMessage, SqlClient,
};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::store::MemoryStore;

/// Sent when a turn fails for any reason; the stored record is left
/// untouched so the next message retries from the same state.
pub const GENERIC_FAILURE_REPLY: &str = "something went wrong, please try again";

const MAILBOX_DEPTH: usize = 32;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("outbound transport is closed")]
    Closed,
}

/// Where replies go. The process-facing side of whatever transport the
/// bot is attached to.
#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn deliver(&self, message: OutboundMessage) -> Result<(), TransportError>;
}

pub struct ChatRouter<S, H, K> {
    engine: Arc<ConversationEngine<S, H>>,
    store: Arc<MemoryStore>,
    sink: Arc<K>,
    mailboxes: Mutex<HashMap<ChatId, mpsc::Sender<InboundMessage>>>,
}

impl<S, H, K> ChatRouter<S, H, K>
where
    S: SqlClient + 'static,
    H: HttpClient + 'static,
    K: OutboundSink + 'static,
{
    pub fn new(
        engine: Arc<ConversationEngine<S, H>>,
        store: Arc<MemoryStore>,
        sink: Arc<K>,
    ) -> Self {
        ChatRouter { engine, store, sink, mailboxes: Mutex::new(HashMap::new()) }
    }

    /// Queues a message on its chat's mailbox, spawning the chat's worker
    /// on first contact.
    pub async fn dispatch(&self, message: InboundMessage) {
        let chat_id = message.chat_id;
        let sender = {
            let mut mailboxes = self.mailboxes.lock().await;
            match mailboxes.get(&chat_id) {
                Some(sender) if !sender.is_closed() => sender.clone(),
                _ => {
                    let sender = self.spawn_worker();
                    mailboxes.insert(chat_id, sender.clone());
                    sender
                }
            }
        };
        if sender.send(message).await.is_err() {
            tracing::error!(chat_id, "chat worker is gone, message dropped");
        }
    }

    fn spawn_worker(&self) -> mpsc::Sender<InboundMessage> {
        let (sender, mut receiver) = mpsc::channel(MAILBOX_DEPTH);
        let engine = Arc::clone(&self.engine);
        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                process(&engine, &store, &*sink, message).await;
            }
        });
        sender
    }
}

async fn process<S: SqlClient, H: HttpClient, K: OutboundSink>(
    engine: &ConversationEngine<S, H>,
    store: &MemoryStore,
    sink: &K,
    message: InboundMessage,
) {
    let chat_id = message.chat_id;
    let record = store.load_or_start(chat_id, engine.graph().start_state().id()).await;

    let outbound = match engine.handle_turn(&record, &message.text).await {
        Ok(turn) => {
            let ended =
                engine.graph().state(&turn.record.state_id).is_some_and(BotState::is_end);
            if ended {
                store.evict(chat_id).await;
            } else {
                store.save(chat_id, turn.record).await;
            }
            OutboundMessage { chat_id, messages: turn.messages, choices: turn.choices }
        }
        Err(error) => {
            tracing::error!(chat_id, %error, "turn failed, conversation left where it was");
            OutboundMessage {
                chat_id,
                messages: vec![GENERIC_FAILURE_REPLY.to_owned()],
                choices: Vec::new(),
            }
        }
    };

    if let Err(error) = sink.deliver(outbound).await {
        tracing::error!(chat_id, %error, "failed to deliver reply");
    }
}
