use std::fs;
use std::path::Path;

use anyhow::Context;
use flowbot_core::{load_graph, BotState};

use super::CommandResult;

pub fn run(config: &Path) -> CommandResult {
    match check(config) {
        Ok(summary) => CommandResult { exit_code: 0, output: summary },
        Err(error) => {
            CommandResult { exit_code: 1, output: format!("invalid bot definition: {error:#}") }
        }
    }
}

fn check(config: &Path) -> anyhow::Result<String> {
    let document = fs::read_to_string(config)
        .with_context(|| format!("can't read bot definition at {}", config.display()))?;
    let graph = load_graph(&document)?;

    let waits = graph
        .states()
        .iter()
        .filter(|state| matches!(state, BotState::WaitForInput { .. }))
        .count();
    Ok(format!(
        "bot definition is valid: {} states ({} waiting for input), start '{}', end '{}'",
        graph.states().len(),
        waits,
        graph.start_state().id(),
        graph.end_state().id(),
    ))
}
