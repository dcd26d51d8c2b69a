use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Field of a remainder document the search matches against.
const FULL_NAME_FIELD: &str = "full_name";

/// Finds the remainder names most similar to a free-text query.
///
/// Every whitespace-separated word of the query is matched case-insensitively as a
/// substring of each document's `full_name`. A name scores one hit per matching
/// word and per document carrying it; the best `limit` names are returned, highest
/// score first, ties broken alphabetically.
pub fn search_similar(documents: &[Map<String, Value>], query: &str, limit: usize) -> Vec<String> {
    let mut counter: HashMap<&str, usize> = HashMap::new();

    for word in query.split_whitespace() {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            continue;
        }
        tracing::debug!("Searching word: {}", word);

        for doc in documents {
            let Some(full_name) = doc.get(FULL_NAME_FIELD).and_then(Value::as_str) else {
                continue;
            };
            if full_name.to_lowercase().contains(&word) {
                *counter.entry(full_name).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(&str, usize)> = counter.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}
