//! Parsing of the agent's final JSON answer.
//!
//! Models often wrap JSON in markdown fences or emit Python-style literals,
//! so the text is cleaned up before parsing. Parsing never fails: anything
//! unusable becomes [`SuggestionResult::parse_failure`].

use crate::tmdb::Movie;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Explanation used when the model returned `null` or no explanation.
pub const MISSING_EXPLANATION: &str = "No explanation provided by the LLM.";

/// Explanation used when the model returned a bare array.
pub const ARRAY_ONLY_EXPLANATION: &str =
    "LLM returned an array; no explanation field was present.";

/// Explanation used when the answer could not be parsed at all.
pub const PARSE_FAILURE_EXPLANATION: &str =
    "Failed to parse LLM response or no explanation provided.";

/// Structured outcome of one suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub suggestions: Vec<Movie>,
    pub explanation: String,
}

impl SuggestionResult {
    /// Empty result carrying an explanation of what went wrong.
    pub fn empty(explanation: impl Into<String>) -> Self {
        Self {
            suggestions: Vec::new(),
            explanation: explanation.into(),
        }
    }

    pub fn parse_failure() -> Self {
        Self::empty(PARSE_FAILURE_EXPLANATION)
    }
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?i)^```(?:json)?\s*|```$").expect("valid fence regex"))
}

/// Parse the model's terminal text into a [`SuggestionResult`].
pub fn parse_suggestions(raw: &str) -> SuggestionResult {
    let trimmed = raw.trim();
    let unfenced = fence_pattern().replace_all(trimmed, "");
    let cleaned = normalize_literals(&unfenced);

    let parsed: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse final LLM answer as JSON: {}", e);
            debug!("Cleaned answer text: {}", cleaned);
            return SuggestionResult::parse_failure();
        }
    };

    match parsed {
        Value::Object(mut object) => {
            let explanation = match object.remove("explanation") {
                Some(Value::String(text)) => text,
                None | Some(Value::Null) => MISSING_EXPLANATION.to_string(),
                Some(other) => {
                    warn!("Unexpected explanation type in LLM answer: {}", other);
                    return SuggestionResult::parse_failure();
                }
            };

            match object.remove("suggestions") {
                Some(Value::Array(entries)) => SuggestionResult {
                    suggestions: collect_movies(entries),
                    explanation,
                },
                _ => {
                    warn!("LLM answer object has no 'suggestions' array");
                    SuggestionResult::parse_failure()
                }
            }
        }
        Value::Array(entries) => {
            warn!("LLM returned a bare array; treating it as suggestions only");
            SuggestionResult {
                suggestions: collect_movies(entries),
                explanation: ARRAY_ONLY_EXPLANATION.to_string(),
            }
        }
        other => {
            warn!("LLM answer is neither an object nor an array: {}", other);
            SuggestionResult::parse_failure()
        }
    }
}

/// Convert suggestion entries into movies, dropping nulls and malformed items.
fn collect_movies(entries: Vec<Value>) -> Vec<Movie> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Null => None,
            Value::Object(fields) => movie_from_fields(fields),
            other => {
                warn!("Skipping non-object suggestion: {}", other);
                None
            }
        })
        .collect()
}

/// Build a movie from a suggestion object.
///
/// Only `id` and `title` are required. Optional fields of the wrong type are
/// dropped rather than rejecting the entry.
fn movie_from_fields(fields: Map<String, Value>) -> Option<Movie> {
    let Some(id) = fields.get("id").and_then(whole_number) else {
        warn!("Skipping suggestion without a numeric id: {:?}", fields.get("id"));
        return None;
    };
    let Some(title) = fields.get("title").and_then(Value::as_str) else {
        warn!("Skipping suggestion {} without a string title", id);
        return None;
    };

    let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);

    Some(Movie {
        id,
        title: title.to_string(),
        overview: text("overview"),
        poster_path: text("poster_path"),
        vote_average: fields.get("vote_average").and_then(Value::as_f64),
        genre_ids: fields.get("genre_ids").and_then(|v| {
            v.as_array()?
                .iter()
                .map(|g| whole_number(g).and_then(|n| u32::try_from(n).ok()))
                .collect()
        }),
        reason: text("reason").filter(|r| !r.is_empty()),
    })
}

/// A non-negative integer, also accepting integral floats such as `603.0`.
fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Rewrite near-JSON into JSON.
///
/// Outside string literals, the bare words `True` and `False` become `true`
/// and `false`. Inside string literals, `\'` becomes `'`.
fn normalize_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut in_string = false;

    while let Some((idx, c)) = chars.next() {
        if in_string {
            match c {
                '\\' => match chars.next() {
                    Some((_, '\'')) => out.push('\''),
                    Some((_, escaped)) => {
                        out.push('\\');
                        out.push(escaped);
                    }
                    None => out.push('\\'),
                },
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            'T' | 'F' if starts_word(text, idx) => {
                let rest = &text[idx..];
                let (word, replacement) = if c == 'T' {
                    ("True", "true")
                } else {
                    ("False", "false")
                };
                if rest.starts_with(word) && ends_word(text, idx + word.len()) {
                    out.push_str(replacement);
                    for _ in 1..word.len() {
                        chars.next();
                    }
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_word(text: &str, idx: usize) -> bool {
    text[..idx].chars().next_back().map_or(true, |c| !is_word_char(c))
}

fn ends_word(text: &str, idx: usize) -> bool {
    text[idx..].chars().next().map_or(true, |c| !is_word_char(c))
}
