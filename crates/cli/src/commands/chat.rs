use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use flowbot_clients::{connect, ReqwestHttpClient, SqlxSqlClient};
use flowbot_core::load_graph;
use flowbot_engine::{
    ConversationEngine, HttpClient, InboundMessage, OutboundMessage, SqlClient,
    UnconfiguredSqlClient,
};
use flowbot_runtime::{ChatRouter, MemoryStore, OutboundSink, TransportError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

// The terminal is a single conversation.
const CHAT_ID: i64 = 0;

/// Hands each reply back to the prompt loop, which prints it before
/// reading the next line.
struct ReplySink {
    sender: mpsc::Sender<OutboundMessage>,
}

#[async_trait]
impl OutboundSink for ReplySink {
    async fn deliver(&self, message: OutboundMessage) -> Result<(), TransportError> {
        self.sender.send(message).await.map_err(|_| TransportError::Closed)
    }
}

pub async fn run(config: &Path, database_url: Option<&str>) -> anyhow::Result<()> {
    let document = fs::read_to_string(config)
        .with_context(|| format!("can't read bot definition at {}", config.display()))?;
    let graph = Arc::new(load_graph(&document)?);

    let sql: Box<dyn SqlClient> = match database_url {
        Some(url) => {
            let pool =
                connect(url).await.with_context(|| format!("can't connect to database {url}"))?;
            Box::new(SqlxSqlClient::new(pool))
        }
        None => Box::new(UnconfiguredSqlClient),
    };
    let http: Box<dyn HttpClient> = Box::new(ReqwestHttpClient::new());

    let engine = Arc::new(ConversationEngine::new(graph, sql, http));
    let store = Arc::new(MemoryStore::new());
    let (sender, mut replies) = mpsc::channel(16);
    let router = ChatRouter::new(engine, Arc::clone(&store), Arc::new(ReplySink { sender }));

    println!("chatting with '{}', ctrl-d to quit", config.display());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        router.dispatch(InboundMessage { chat_id: CHAT_ID, text: input.to_owned() }).await;
        let Some(reply) = replies.recv().await else { break };

        for message in &reply.messages {
            println!("{message}");
        }
        if !reply.choices.is_empty() {
            println!("[{}]", reply.choices.join(" | "));
        }
        // The router commits before delivering, so an empty store here
        // means no record survived this turn.
        if store.is_empty().await {
            println!("(conversation finished, the next message starts a new one)");
        }
    }
    Ok(())
}
