//! The validated conversation graph and its traversal.
//!
//! `ConversationGraph::build` runs the whole validation pipeline in a fixed
//! order, so a given broken configuration always reports the same failure.
//! Adjacency lists keep the declaration order of the relationships, which
//! makes traversal deterministic: ties are broken by whichever edge was
//! declared first.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::errors::{ConfigError, GraphError};
use crate::state::{BotState, ExpectedValues, Relationship};

/// A validated directed multigraph of bot states. Immutable once built and
/// shared read-only across every chat.
#[derive(Debug)]
pub struct ConversationGraph {
    states: Vec<BotState>,
    edges: Vec<Relationship>,
    index: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    start: usize,
    end: usize,
}

impl ConversationGraph {
    pub fn build(
        states: Vec<BotState>,
        relationships: Vec<Relationship>,
    ) -> Result<Self, ConfigError> {
        let start = require_unique_terminal(
            &states,
            BotState::is_start,
            ConfigError::MissingStartState,
            |ids| ConfigError::MultipleStartStates { ids },
        )?;
        let end = require_unique_terminal(
            &states,
            BotState::is_end,
            ConfigError::MissingEndState,
            |ids| ConfigError::MultipleEndStates { ids },
        )?;

        let duplicate_ids = duplicates(states.iter().map(|state| state.id().to_owned()));
        if !duplicate_ids.is_empty() {
            return Err(ConfigError::DuplicateStateIds { ids: duplicate_ids });
        }
        let duplicate_pairs = duplicates(
            relationships
                .iter()
                .map(|relationship| format!("{}->{}", relationship.from, relationship.to)),
        );
        if !duplicate_pairs.is_empty() {
            return Err(ConfigError::DuplicateRelationships { pairs: duplicate_pairs });
        }

        let self_loops: Vec<String> = sorted(
            relationships
                .iter()
                .filter(|relationship| relationship.from == relationship.to)
                .map(|relationship| relationship.from.clone()),
        );
        if !self_loops.is_empty() {
            return Err(ConfigError::SelfLoops { ids: self_loops });
        }

        let index: HashMap<String, usize> = states
            .iter()
            .enumerate()
            .map(|(position, state)| (state.id().to_owned(), position))
            .collect();

        let unknown: Vec<String> = sorted(
            relationships
                .iter()
                .flat_map(|relationship| [&relationship.from, &relationship.to])
                .filter(|id| !index.contains_key(*id))
                .cloned(),
        );
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownRelationshipIds { ids: unknown });
        }

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); states.len()];
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); states.len()];
        for (position, relationship) in relationships.iter().enumerate() {
            outgoing[index[&relationship.from]].push(position);
            incoming[index[&relationship.to]].push(position);
        }

        let graph = ConversationGraph {
            states,
            edges: relationships,
            index,
            outgoing,
            incoming,
            start,
            end,
        };
        graph.check_connectivity()?;
        graph.check_terminal_positions()?;
        graph.check_input_coverage()?;
        Ok(graph)
    }

    /// Every state must sit on some undirected path touching start or end,
    /// and a directed path from start to end must exist.
    fn check_connectivity(&self) -> Result<(), ConfigError> {
        let forward = self.reach(self.start, Direction::Forward);
        if !forward.contains(&self.end) {
            return Err(ConfigError::NoStartToEndPath {
                start: self.states[self.start].id().to_owned(),
                end: self.states[self.end].id().to_owned(),
            });
        }

        let component = self.reach(self.start, Direction::Undirected);
        let disconnected: Vec<String> = sorted(
            (0..self.states.len())
                .filter(|position| !component.contains(position))
                .map(|position| self.states[position].id().to_owned()),
        );
        if !disconnected.is_empty() {
            return Err(ConfigError::DisconnectedStates { ids: disconnected });
        }
        Ok(())
    }

    /// No edges may lead into start or out of end.
    fn check_terminal_positions(&self) -> Result<(), ConfigError> {
        if !self.incoming[self.start].is_empty() {
            let mut before = self.reach(self.start, Direction::Backward);
            before.remove(&self.start);
            return Err(ConfigError::StatesBeforeStart {
                ids: sorted(before.iter().map(|&position| self.states[position].id().to_owned())),
            });
        }
        if !self.outgoing[self.end].is_empty() {
            let mut after = self.reach(self.end, Direction::Forward);
            after.remove(&self.end);
            return Err(ConfigError::StatesAfterEnd {
                ids: sorted(after.iter().map(|&position| self.states[position].id().to_owned())),
            });
        }
        Ok(())
    }

    /// Static wait-for-input states must route every declared value through
    /// some outgoing relationship, and must not be routed on values they
    /// never declared.
    fn check_input_coverage(&self) -> Result<(), ConfigError> {
        for (position, state) in self.states.iter().enumerate() {
            let BotState::WaitForInput {
                id,
                expected: ExpectedValues::Static { values, .. },
                ..
            } = state
            else {
                continue;
            };

            let declared: BTreeSet<&String> = values.iter().collect();
            let labelled: BTreeSet<&String> = self.outgoing[position]
                .iter()
                .flat_map(|&edge| self.edges[edge].on_input.iter())
                .collect();

            let unrouted: Vec<String> =
                declared.difference(&labelled).map(|value| (*value).clone()).collect();
            if !unrouted.is_empty() {
                return Err(ConfigError::MissingInputRelationships {
                    id: id.clone(),
                    values: unrouted,
                });
            }

            let undeclared: Vec<String> =
                labelled.difference(&declared).map(|value| (*value).clone()).collect();
            if !undeclared.is_empty() {
                return Err(ConfigError::UndeclaredInputs { id: id.clone(), values: undeclared });
            }
        }
        Ok(())
    }

    fn reach(&self, origin: usize, direction: Direction) -> HashSet<usize> {
        let mut seen = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        while let Some(position) = queue.pop_front() {
            let mut visit = |edge: &Relationship, toward_from: bool| {
                let next = if toward_from {
                    self.index[&edge.from]
                } else {
                    self.index[&edge.to]
                };
                if seen.insert(next) {
                    queue.push_back(next);
                }
            };
            if matches!(direction, Direction::Forward | Direction::Undirected) {
                for &edge in &self.outgoing[position] {
                    visit(&self.edges[edge], false);
                }
            }
            if matches!(direction, Direction::Backward | Direction::Undirected) {
                for &edge in &self.incoming[position] {
                    visit(&self.edges[edge], true);
                }
            }
        }
        seen
    }

    pub fn start_state(&self) -> &BotState {
        &self.states[self.start]
    }

    pub fn end_state(&self) -> &BotState {
        &self.states[self.end]
    }

    pub fn state(&self, id: &str) -> Option<&BotState> {
        self.index.get(id).map(|&position| &self.states[position])
    }

    pub fn require_state(&self, id: &str) -> Result<&BotState, GraphError> {
        self.state(id).ok_or_else(|| GraphError::UnknownState { id: id.to_owned() })
    }

    pub fn states(&self) -> &[BotState] {
        &self.states
    }

    /// Collects the run of states a turn executes: leave `from` along the
    /// edge selected by `inputs`, then walk breadth-first in declaration
    /// order, appending each newly-reached state until a wait-for-input or
    /// end state is appended (inclusive). The whole walk stops there, so a
    /// run always ends on the state the chat parks on. `from` itself may be
    /// reached again, which lets a retry branch loop back to its wait.
    pub fn states_until_wait(
        &self,
        from: &BotState,
        inputs: &[String],
    ) -> Result<Vec<&BotState>, GraphError> {
        let position = self.index[from.id()];
        let root = self.select_edge(position, from, inputs)?;

        let mut run = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        let first = self.index[&self.edges[root].to];
        seen.insert(first);
        queue.push_back(first);

        while let Some(current) = queue.pop_front() {
            let state = &self.states[current];
            run.push(state);
            if state.is_suspension_point() {
                break;
            }
            for &edge in &self.outgoing[current] {
                let next = self.index[&self.edges[edge].to];
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        Ok(run)
    }

    fn select_edge(
        &self,
        position: usize,
        from: &BotState,
        inputs: &[String],
    ) -> Result<usize, GraphError> {
        let no_transition = || GraphError::NoMatchingTransition {
            id: from.id().to_owned(),
            inputs: inputs.to_vec(),
        };

        if let BotState::WaitForInput { expected: ExpectedValues::Static { .. }, .. } = from {
            return self.outgoing[position]
                .iter()
                .copied()
                .find(|&edge| {
                    let labels = &self.edges[edge].on_input;
                    inputs.iter().all(|input| labels.contains(input))
                })
                .ok_or_else(no_transition);
        }
        self.outgoing[position].first().copied().ok_or_else(no_transition)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
    Undirected,
}

fn require_unique_terminal(
    states: &[BotState],
    matches: impl Fn(&BotState) -> bool,
    missing: ConfigError,
    multiple: impl FnOnce(Vec<String>) -> ConfigError,
) -> Result<usize, ConfigError> {
    let found: Vec<usize> = states
        .iter()
        .enumerate()
        .filter(|(_, state)| matches(state))
        .map(|(position, _)| position)
        .collect();
    match found.as_slice() {
        [] => Err(missing),
        [position] => Ok(*position),
        _ => Err(multiple(sorted(
            found.iter().map(|&position| states[position].id().to_owned()),
        ))),
    }
}

fn duplicates(keys: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut repeated = BTreeSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            repeated.insert(key);
        }
    }
    repeated.into_iter().collect()
}

fn sorted(ids: impl Iterator<Item = String>) -> Vec<String> {
    let set: BTreeSet<String> = ids.collect();
    set.into_iter().collect()
}
