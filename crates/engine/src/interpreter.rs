//! Turn execution: input checking, traversal, and state visiting.

use std::collections::BTreeSet;
use std::sync::Arc;

use flowbot_core::{
    placeholders, BotState, ConversationGraph, ExpectedValues, HttpRequestDetails, SessionData,
    SessionValue,
};

use crate::accumulator::Accumulator;
use crate::clients::{HttpClient, ResolvedHttpRequest, SqlClient};
use crate::errors::RuntimeError;
use crate::messages::{InputCheck, MemoryRecord};

/// The outcome of one accepted inbound message: what to send back and the
/// record to park the chat on.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub messages: Vec<String>,
    pub choices: Vec<String>,
    pub record: MemoryRecord,
}

/// Executes turns against a shared read-only graph. Stateless apart from
/// its collaborators, so one engine serves every chat concurrently.
pub struct ConversationEngine<S, H> {
    graph: Arc<ConversationGraph>,
    sql: S,
    http: H,
}

impl<S: SqlClient, H: HttpClient> ConversationEngine<S, H> {
    pub fn new(graph: Arc<ConversationGraph>, sql: S, http: H) -> Self {
        ConversationEngine { graph, sql, http }
    }

    pub fn graph(&self) -> &ConversationGraph {
        &self.graph
    }

    /// Classifies `input` against the expected values of the state the
    /// chat is parked on. Any state that is not a constrained
    /// wait-for-input accepts everything.
    pub fn check_input(
        &self,
        state: &BotState,
        session: &SessionData,
        input: &str,
    ) -> Result<InputCheck, RuntimeError> {
        let BotState::WaitForInput { expected, .. } = state else {
            return Ok(InputCheck::valid());
        };
        match expected {
            ExpectedValues::Static { values, on_mismatch } => {
                if values.iter().any(|value| value == input) {
                    Ok(InputCheck::valid())
                } else {
                    Ok(InputCheck::mismatch(on_mismatch.clone(), values.clone()))
                }
            }
            ExpectedValues::Session { key, on_mismatch } => {
                let choices = session_choice_list(session, key)?;
                if choices.iter().any(|choice| choice == input) {
                    Ok(InputCheck::valid())
                } else {
                    Ok(InputCheck::mismatch(on_mismatch.clone(), choices))
                }
            }
            ExpectedValues::Any => Ok(InputCheck::valid()),
        }
    }

    /// Executes one inbound message against `record`. A mismatching input
    /// replays the prompt without touching the record; a valid one runs
    /// the graph to the next suspension point and returns the record the
    /// chat is now parked on.
    pub async fn handle_turn(
        &self,
        record: &MemoryRecord,
        input: &str,
    ) -> Result<Turn, RuntimeError> {
        let state = self.graph.require_state(&record.state_id)?;
        let check = self.check_input(state, &record.session, input)?;
        if !check.valid {
            return Ok(Turn {
                messages: vec![check.message],
                choices: check.choices,
                record: record.clone(),
            });
        }

        let mut session = record.session.clone();
        if let BotState::WaitForInput { session_field, .. } = state {
            if !session_field.is_empty() {
                session.set(session_field.clone(), SessionValue::from(input));
            }
        }

        let run = self.graph.states_until_wait(state, std::slice::from_ref(&input.to_owned()))?;
        let mut accumulator = Accumulator::new(session);
        for next in &run {
            self.visit(next, &mut accumulator).await?;
        }

        let state_id = run
            .last()
            .map(|parked| parked.id().to_owned())
            .unwrap_or_else(|| record.state_id.clone());
        Ok(Turn {
            messages: accumulator.output_messages,
            choices: accumulator.choices,
            record: MemoryRecord { state_id, session: accumulator.context },
        })
    }

    async fn visit(
        &self,
        state: &BotState,
        accumulator: &mut Accumulator,
    ) -> Result<(), RuntimeError> {
        match state {
            BotState::Start { .. } | BotState::End { .. } => {}
            BotState::SendMessage { text, .. } => {
                let message = render(text, &accumulator.context)?;
                accumulator.push_message(message);
            }
            BotState::WaitForInput { expected, .. } => match expected {
                ExpectedValues::Static { values, .. } => {
                    accumulator.set_choices(values.clone());
                }
                ExpectedValues::Session { key, .. } => {
                    let choices = session_choice_list(&accumulator.context, key)?;
                    accumulator.set_choices(choices);
                }
                ExpectedValues::Any => {}
            },
            BotState::JdbcRead { id, query, session_field } => {
                let sql = render(query, &accumulator.context)?;
                let rows = self.sql.query_for_list(&sql).await?;
                let mut values: Vec<SessionValue> =
                    rows.into_iter().flat_map(|row| row.into_values()).collect();
                tracing::debug!(state = %id, values = values.len(), "jdbc read");
                let value = if values.len() == 1 {
                    values.remove(0)
                } else {
                    SessionValue::List(values)
                };
                accumulator.context.set(session_field.clone(), value);
            }
            BotState::JdbcWrite { id, query } => {
                let sql = render(query, &accumulator.context)?;
                let affected = self.sql.update(&sql).await?;
                tracing::debug!(state = %id, affected, "jdbc write");
            }
            BotState::Http { id, request, extraction_key, session_field } => {
                let resolved = resolve_request(request, &accumulator.context)?;
                let response = self.http.execute(&resolved).await?;
                tracing::debug!(state = %id, method = %resolved.method, "http call");
                let value = extract(&response, extraction_key)?;
                accumulator.context.set(session_field.clone(), value);
            }
        }
        Ok(())
    }
}

fn render(text: &str, session: &SessionData) -> Result<String, RuntimeError> {
    placeholders::substitute(text, session).map_err(|keys| RuntimeError::MissingSessionKeys { keys })
}

fn session_choice_list(session: &SessionData, key: &str) -> Result<Vec<String>, RuntimeError> {
    let value = session
        .get(key)
        .ok_or_else(|| RuntimeError::SessionKeyNotFound { key: key.to_owned() })?;
    let items = value.as_list().ok_or_else(|| RuntimeError::NotAList {
        key: key.to_owned(),
        found: value.to_string(),
    })?;
    Ok(items.iter().map(SessionValue::to_string).collect())
}

/// Substitutes placeholders across the url and every parameter value. All
/// missing keys across the whole request are reported together, sorted.
fn resolve_request(
    request: &HttpRequestDetails,
    session: &SessionData,
) -> Result<ResolvedHttpRequest, RuntimeError> {
    let mut missing: BTreeSet<String> = BTreeSet::new();
    let mut render_part = |text: &str| match placeholders::substitute(text, session) {
        Ok(rendered) => rendered,
        Err(keys) => {
            missing.extend(keys);
            String::new()
        }
    };

    let url = render_part(&request.url);
    let query_params: Vec<(String, String)> = request
        .query_params
        .iter()
        .map(|param| (param.key.clone(), render_part(&param.value)))
        .collect();
    let body_params: Vec<(String, String)> = request
        .body_params
        .iter()
        .map(|param| (param.key.clone(), render_part(&param.value)))
        .collect();

    if !missing.is_empty() {
        return Err(RuntimeError::MissingSessionKeys { keys: missing.into_iter().collect() });
    }
    Ok(ResolvedHttpRequest {
        method: request.method,
        url,
        query_params,
        body_params,
        headers: request.headers.clone(),
    })
}

/// Walks a dot-separated path into the response body. A single-element
/// sequence at the end of the path unwraps to its only element.
fn extract(response: &serde_json::Value, key: &str) -> Result<SessionValue, RuntimeError> {
    let mut current = response;
    for segment in key.split('.') {
        current = current
            .get(segment)
            .ok_or_else(|| RuntimeError::ExtractionKeyNotFound { key: key.to_owned() })?;
    }
    let value = SessionValue::from_json(current)
        .ok_or_else(|| RuntimeError::UnsupportedResponseValue { key: key.to_owned() })?;
    Ok(match value {
        SessionValue::List(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use flowbot_core::{
        BotState, ConversationGraph, ExpectedValues, HttpHeaders, HttpMethod, HttpParam,
        HttpRequestDetails, Relationship, SessionData, SessionValue,
    };

    use crate::clients::{
        HttpClient, ResolvedHttpRequest, SqlClient, UnconfiguredHttpClient, UnconfiguredSqlClient,
    };
    use crate::errors::{ClientError, RuntimeError};
    use crate::messages::MemoryRecord;

    use super::ConversationEngine;

    #[derive(Default)]
    struct FakeSqlClient {
        results: Mutex<VecDeque<Vec<BTreeMap<String, SessionValue>>>>,
        queries: Mutex<Vec<String>>,
        updates: Mutex<Vec<String>>,
    }

    impl FakeSqlClient {
        fn with_result(rows: Vec<BTreeMap<String, SessionValue>>) -> Self {
            let client = FakeSqlClient::default();
            client.results.lock().unwrap().push_back(rows);
            client
        }
    }

    #[async_trait]
    impl SqlClient for FakeSqlClient {
        async fn query_for_list(
            &self,
            sql: &str,
        ) -> Result<Vec<BTreeMap<String, SessionValue>>, ClientError> {
            self.queries.lock().unwrap().push(sql.to_owned());
            Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn update(&self, sql: &str) -> Result<u64, ClientError> {
            self.updates.lock().unwrap().push(sql.to_owned());
            Ok(1)
        }
    }

    struct FakeHttpClient {
        response: serde_json::Value,
        requests: Mutex<Vec<ResolvedHttpRequest>>,
    }

    impl FakeHttpClient {
        fn returning(response: serde_json::Value) -> Self {
            FakeHttpClient { response, requests: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttpClient {
        async fn execute(
            &self,
            request: &ResolvedHttpRequest,
        ) -> Result<serde_json::Value, ClientError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn start(id: &str) -> BotState {
        BotState::Start { id: id.into() }
    }

    fn end(id: &str) -> BotState {
        BotState::End { id: id.into() }
    }

    fn message(id: &str, text: &str) -> BotState {
        BotState::SendMessage { id: id.into(), text: text.into() }
    }

    fn static_wait(id: &str, values: &[&str], on_mismatch: &str) -> BotState {
        BotState::WaitForInput {
            id: id.into(),
            session_field: String::new(),
            expected: ExpectedValues::Static {
                values: values.iter().map(|value| (*value).into()).collect(),
                on_mismatch: on_mismatch.into(),
            },
        }
    }

    fn any_wait(id: &str, session_field: &str) -> BotState {
        BotState::WaitForInput {
            id: id.into(),
            session_field: session_field.into(),
            expected: ExpectedValues::Any,
        }
    }

    fn edge(from: &str, to: &str) -> Relationship {
        Relationship { from: from.into(), to: to.into(), on_input: Vec::new() }
    }

    fn labelled_edge(from: &str, to: &str, labels: &[&str]) -> Relationship {
        Relationship {
            from: from.into(),
            to: to.into(),
            on_input: labels.iter().map(|label| (*label).into()).collect(),
        }
    }

    fn graph(states: Vec<BotState>, edges: Vec<Relationship>) -> Arc<ConversationGraph> {
        Arc::new(ConversationGraph::build(states, edges).expect("valid test graph"))
    }

    fn engine(
        graph: Arc<ConversationGraph>,
    ) -> ConversationEngine<UnconfiguredSqlClient, UnconfiguredHttpClient> {
        ConversationEngine::new(graph, UnconfiguredSqlClient, UnconfiguredHttpClient)
    }

    #[tokio::test]
    async fn hello_world_runs_from_start_to_end() {
        let graph = graph(
            vec![start("start"), message("greet", "hello world"), end("end")],
            vec![edge("start", "greet"), edge("greet", "end")],
        );
        let record = MemoryRecord::new("start");

        let turn = engine(graph).handle_turn(&record, "hi bot").await.expect("turn runs");
        assert_eq!(turn.messages, vec!["hello world"]);
        assert!(turn.choices.is_empty());
        assert_eq!(turn.record.state_id, "end");
    }

    #[tokio::test]
    async fn run_parks_on_wait_and_offers_static_choices() {
        let graph = graph(
            vec![
                start("start"),
                message("greet", "pick one"),
                static_wait("ask", &["yes", "no"], "yes or no please"),
                end("end"),
            ],
            vec![
                edge("start", "greet"),
                edge("greet", "ask"),
                labelled_edge("ask", "end", &["yes", "no"]),
            ],
        );
        let record = MemoryRecord::new("start");

        let turn = engine(graph).handle_turn(&record, "hi").await.expect("turn runs");
        assert_eq!(turn.messages, vec!["pick one"]);
        assert_eq!(turn.choices, vec!["yes", "no"]);
        assert_eq!(turn.record.state_id, "ask");
    }

    #[tokio::test]
    async fn mismatching_input_replays_prompt_and_keeps_the_record() {
        let graph = graph(
            vec![
                start("start"),
                static_wait("ask", &["yes", "no"], "yes or no please"),
                end("end"),
            ],
            vec![edge("start", "ask"), labelled_edge("ask", "end", &["yes", "no"])],
        );
        let engine = engine(graph);
        let record = MemoryRecord::new("ask");

        let turn = engine.handle_turn(&record, "maybe").await.expect("mismatch is not an error");
        assert_eq!(turn.messages, vec!["yes or no please"]);
        assert_eq!(turn.choices, vec!["yes", "no"]);
        assert_eq!(turn.record, record);

        let turn = engine.handle_turn(&record, "yes").await.expect("valid input");
        assert_eq!(turn.record.state_id, "end");
    }

    #[tokio::test]
    async fn a_retry_branch_loops_back_to_the_same_wait() {
        let graph = graph(
            vec![
                start("start"),
                static_wait("ask", &["again", "done"], "again or done"),
                message("retry", "one more time"),
                end("end"),
            ],
            vec![
                edge("start", "ask"),
                labelled_edge("ask", "retry", &["again"]),
                labelled_edge("ask", "end", &["done"]),
                edge("retry", "ask"),
            ],
        );
        let record = MemoryRecord::new("ask");

        let turn = engine(graph).handle_turn(&record, "again").await.expect("again branch");
        assert_eq!(turn.messages, vec!["one more time"]);
        assert_eq!(turn.choices, vec!["again", "done"]);
        assert_eq!(turn.record.state_id, "ask");
    }

    #[tokio::test]
    async fn valid_input_is_stored_under_the_session_field() {
        let graph = graph(
            vec![
                start("start"),
                any_wait("ask-name", "name"),
                message("greet", "hello !{name}"),
                end("end"),
            ],
            vec![edge("start", "ask-name"), edge("ask-name", "greet"), edge("greet", "end")],
        );
        let record = MemoryRecord::new("ask-name");

        let turn = engine(graph).handle_turn(&record, "world").await.expect("turn runs");
        assert_eq!(turn.messages, vec!["hello world"]);
        assert_eq!(turn.record.session.get("name"), Some(&SessionValue::from("world")));
    }

    #[tokio::test]
    async fn missing_template_keys_are_reported_together_and_sorted() {
        let graph = graph(
            vec![start("start"), message("greet", "!{foobar} says !{bar}"), end("end")],
            vec![edge("start", "greet"), edge("greet", "end")],
        );
        let record = MemoryRecord::new("start");

        let error = engine(graph).handle_turn(&record, "hi").await.expect_err("keys missing");
        assert_eq!(
            error.to_string(),
            "session keys [bar, foobar] not found in current context"
        );
    }

    #[tokio::test]
    async fn session_expected_values_check_membership() {
        let graph = graph(
            vec![
                start("start"),
                BotState::WaitForInput {
                    id: "pick".into(),
                    session_field: "picked".into(),
                    expected: ExpectedValues::Session {
                        key: "options".into(),
                        on_mismatch: "pick one of the options".into(),
                    },
                },
                end("end"),
            ],
            vec![edge("start", "pick"), edge("pick", "end")],
        );
        let engine = engine(graph);
        let mut record = MemoryRecord::new("pick");
        record.session.set(
            "options",
            SessionValue::List(vec![SessionValue::from("red"), SessionValue::from("blue")]),
        );

        let turn = engine.handle_turn(&record, "green").await.expect("mismatch is not an error");
        assert_eq!(turn.messages, vec!["pick one of the options"]);
        assert_eq!(turn.choices, vec!["red", "blue"]);
        assert_eq!(turn.record, record);

        let turn = engine.handle_turn(&record, "blue").await.expect("valid input");
        assert_eq!(turn.record.state_id, "end");
        assert_eq!(turn.record.session.get("picked"), Some(&SessionValue::from("blue")));
    }

    #[tokio::test]
    async fn session_expected_values_require_a_list_in_the_session() {
        let graph = graph(
            vec![
                start("start"),
                BotState::WaitForInput {
                    id: "pick".into(),
                    session_field: String::new(),
                    expected: ExpectedValues::Session {
                        key: "options".into(),
                        on_mismatch: "pick one".into(),
                    },
                },
                end("end"),
            ],
            vec![edge("start", "pick"), edge("pick", "end")],
        );
        let engine = engine(graph);

        let record = MemoryRecord::new("pick");
        let error = engine.handle_turn(&record, "red").await.expect_err("key missing");
        assert_eq!(error.to_string(), "session key 'options' not found in current context");

        let mut record = MemoryRecord::new("pick");
        record.session.set("options", SessionValue::from(1));
        let error = engine.handle_turn(&record, "red").await.expect_err("not a list");
        assert_eq!(error.to_string(), "session key 'options' doesn't contain a list: '1' found");
    }

    #[tokio::test]
    async fn jdbc_read_unwraps_a_single_value_to_a_scalar() {
        let graph = graph(
            vec![
                start("start"),
                BotState::JdbcRead {
                    id: "read".into(),
                    query: "select name from users where chat=!{chatId}".into(),
                    session_field: "name".into(),
                },
                message("greet", "hello !{name}"),
                end("end"),
            ],
            vec![edge("start", "read"), edge("read", "greet"), edge("greet", "end")],
        );
        let sql = FakeSqlClient::with_result(vec![BTreeMap::from([(
            "name".to_owned(),
            SessionValue::from("ada"),
        )])]);
        let engine = ConversationEngine::new(graph, sql, UnconfiguredHttpClient);

        let mut record = MemoryRecord::new("start");
        record.session.set("chatId", SessionValue::from(7));
        let turn = engine.handle_turn(&record, "hi").await.expect("turn runs");
        assert_eq!(turn.messages, vec!["hello ada"]);
        assert_eq!(
            *engine.sql.queries.lock().unwrap(),
            vec!["select name from users where chat=7"]
        );
    }

    #[tokio::test]
    async fn jdbc_read_keeps_multiple_values_as_a_list() {
        let graph = graph(
            vec![
                start("start"),
                BotState::JdbcRead {
                    id: "read".into(),
                    query: "select name from users".into(),
                    session_field: "names".into(),
                },
                end("end"),
            ],
            vec![edge("start", "read"), edge("read", "end")],
        );
        let sql = FakeSqlClient::with_result(vec![
            BTreeMap::from([("name".to_owned(), SessionValue::from("ada"))]),
            BTreeMap::from([("name".to_owned(), SessionValue::from("grace"))]),
        ]);
        let engine = ConversationEngine::new(graph, sql, UnconfiguredHttpClient);

        let turn = engine.handle_turn(&MemoryRecord::new("start"), "hi").await.expect("turn runs");
        assert_eq!(
            turn.record.session.get("names"),
            Some(&SessionValue::List(vec![
                SessionValue::from("ada"),
                SessionValue::from("grace"),
            ]))
        );
    }

    #[tokio::test]
    async fn jdbc_read_stores_an_empty_list_when_nothing_matches() {
        let graph = graph(
            vec![
                start("start"),
                BotState::JdbcRead {
                    id: "read".into(),
                    query: "select name from users".into(),
                    session_field: "names".into(),
                },
                end("end"),
            ],
            vec![edge("start", "read"), edge("read", "end")],
        );
        let engine =
            ConversationEngine::new(graph, FakeSqlClient::default(), UnconfiguredHttpClient);

        let turn = engine.handle_turn(&MemoryRecord::new("start"), "hi").await.expect("turn runs");
        assert_eq!(turn.record.session.get("names"), Some(&SessionValue::List(Vec::new())));
    }

    #[tokio::test]
    async fn jdbc_write_runs_the_substituted_statement() {
        let graph = graph(
            vec![
                start("start"),
                BotState::JdbcWrite {
                    id: "save".into(),
                    query: "insert into answers values(!{chatId}, '!{answer}')".into(),
                },
                end("end"),
            ],
            vec![edge("start", "save"), edge("save", "end")],
        );
        let engine =
            ConversationEngine::new(graph, FakeSqlClient::default(), UnconfiguredHttpClient);

        let mut record = MemoryRecord::new("start");
        record.session.set("chatId", SessionValue::from(7));
        record.session.set("answer", SessionValue::from("yes"));
        engine.handle_turn(&record, "hi").await.expect("turn runs");
        assert_eq!(
            *engine.sql.updates.lock().unwrap(),
            vec!["insert into answers values(7, 'yes')"]
        );
    }

    fn http_state(url: &str, query_params: Vec<HttpParam>) -> BotState {
        BotState::Http {
            id: "fetch".into(),
            request: HttpRequestDetails {
                method: HttpMethod::Get,
                url: url.into(),
                query_params,
                body_params: Vec::new(),
                headers: HttpHeaders::default(),
            },
            extraction_key: "foo.bar".into(),
            session_field: "result".into(),
        }
    }

    #[tokio::test]
    async fn http_extraction_walks_the_dot_path_and_unwraps_single_lists() {
        let graph = graph(
            vec![start("start"), http_state("http://localhost/api", Vec::new()), end("end")],
            vec![edge("start", "fetch"), edge("fetch", "end")],
        );
        let http = FakeHttpClient::returning(serde_json::json!({"foo": {"bar": [42]}}));
        let engine = ConversationEngine::new(graph, UnconfiguredSqlClient, http);

        let turn = engine.handle_turn(&MemoryRecord::new("start"), "hi").await.expect("turn runs");
        assert_eq!(turn.record.session.get("result"), Some(&SessionValue::from(42)));
    }

    #[tokio::test]
    async fn http_missing_extraction_key_fails_the_turn() {
        let graph = graph(
            vec![start("start"), http_state("http://localhost/api", Vec::new()), end("end")],
            vec![edge("start", "fetch"), edge("fetch", "end")],
        );
        let http = FakeHttpClient::returning(serde_json::json!({"foo": {"baz": 1}}));
        let engine = ConversationEngine::new(graph, UnconfiguredSqlClient, http);

        let error =
            engine.handle_turn(&MemoryRecord::new("start"), "hi").await.expect_err("key missing");
        assert_eq!(error.to_string(), "extraction key [foo.bar] not found in response");
    }

    #[tokio::test]
    async fn http_placeholders_are_substituted_across_the_whole_request() {
        let graph = graph(
            vec![
                start("start"),
                http_state(
                    "http://localhost/api/!{chatId}",
                    vec![HttpParam { key: "who".into(), value: "!{name}".into() }],
                ),
                end("end"),
            ],
            vec![edge("start", "fetch"), edge("fetch", "end")],
        );
        let http = FakeHttpClient::returning(serde_json::json!({"foo": {"bar": "ok"}}));
        let engine = ConversationEngine::new(graph, UnconfiguredSqlClient, http);

        let mut record = MemoryRecord::new("start");
        record.session.set("chatId", SessionValue::from(7));
        record.session.set("name", SessionValue::from("ada"));
        engine.handle_turn(&record, "hi").await.expect("turn runs");

        let requests = engine.http.requests.lock().unwrap();
        assert_eq!(requests[0].url, "http://localhost/api/7");
        assert_eq!(requests[0].query_params, vec![("who".to_owned(), "ada".to_owned())]);
    }

    #[tokio::test]
    async fn http_missing_keys_are_collected_across_url_and_params() {
        let graph = graph(
            vec![
                start("start"),
                http_state(
                    "http://localhost/api/!{zed}",
                    vec![HttpParam { key: "who".into(), value: "!{alpha}".into() }],
                ),
                end("end"),
            ],
            vec![edge("start", "fetch"), edge("fetch", "end")],
        );
        let http = FakeHttpClient::returning(serde_json::json!({}));
        let engine = ConversationEngine::new(graph, UnconfiguredSqlClient, http);

        let error =
            engine.handle_turn(&MemoryRecord::new("start"), "hi").await.expect_err("keys missing");
        assert_eq!(error.to_string(), "session keys [alpha, zed] not found in current context");
    }

    #[tokio::test]
    async fn unconfigured_clients_fail_jdbc_states() {
        let graph = graph(
            vec![
                start("start"),
                BotState::JdbcRead {
                    id: "read".into(),
                    query: "select name from users".into(),
                    session_field: "names".into(),
                },
                end("end"),
            ],
            vec![edge("start", "read"), edge("read", "end")],
        );

        let error = engine(graph)
            .handle_turn(&MemoryRecord::new("start"), "hi")
            .await
            .expect_err("no sql client");
        assert!(matches!(error, RuntimeError::Client(ClientError::NotConfigured("sql"))));
    }
}
