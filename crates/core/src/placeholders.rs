//! `!{key}` placeholder handling for message texts, SQL queries, and HTTP
//! request components.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::session::SessionData;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\{(.*?)\}").expect("placeholder pattern is valid"));

/// Lists the session keys referenced by `text`, in order of first
/// appearance, without duplicates.
pub fn extract_keys(text: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for captures in PLACEHOLDER.captures_iter(text) {
        let key = captures[1].to_string();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Replaces every placeholder with the stringified session value for its
/// key. If any referenced key is absent the whole substitution fails and
/// the missing keys are reported together, sorted.
pub fn substitute(text: &str, session: &SessionData) -> Result<String, Vec<String>> {
    let mut missing: BTreeSet<String> = BTreeSet::new();
    let substituted = PLACEHOLDER.replace_all(text, |captures: &Captures| {
        let key = &captures[1];
        match session.get(key) {
            Some(value) => value.to_string(),
            None => {
                missing.insert(key.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(substituted.into_owned())
    } else {
        Err(missing.into_iter().collect())
    }
}

/// Replaces every placeholder with a fixed token. Used to validate SQL and
/// URL shapes at construction time, before any session exists.
pub fn mask(text: &str, replacement: &str) -> String {
    PLACEHOLDER.replace_all(text, replacement).into_owned()
}
