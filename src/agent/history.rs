//! Append-only conversation log for one suggestion request.

use crate::error::{CinemoodError, Result};
use crate::llm::{FunctionCall, Part, Role, Turn};
use serde_json::Value;

/// Ordered turns exchanged with the model.
///
/// Every MODEL turn carrying a function call is followed by exactly one TOOL
/// turn answering it before another call can be appended.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    pending_call: Option<String>,
}

impl ConversationHistory {
    /// Start a conversation with a single user prompt.
    pub fn new(initial_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn {
                role: Role::User,
                parts: vec![Part::text(initial_prompt)],
            }],
            pending_call: None,
        }
    }

    /// Record the model's request to call a tool.
    pub fn append_model_function_call(&mut self, call: FunctionCall) -> Result<()> {
        if let Some(pending) = &self.pending_call {
            return Err(CinemoodError::History(format!(
                "function call '{}' appended while '{}' is still awaiting a response",
                call.name, pending
            )));
        }

        self.pending_call = Some(call.name.clone());
        self.turns.push(Turn {
            role: Role::Model,
            parts: vec![Part::function_call(call)],
        });
        Ok(())
    }

    /// Record a tool's output for the pending call.
    pub fn append_tool_response(&mut self, name: &str, content: Value) -> Result<()> {
        match self.pending_call.as_deref() {
            Some(pending) if pending == name => {}
            Some(pending) => {
                return Err(CinemoodError::History(format!(
                    "tool response for '{}' does not match pending call '{}'",
                    name, pending
                )))
            }
            None => {
                return Err(CinemoodError::History(format!(
                    "tool response for '{}' without a pending function call",
                    name
                )))
            }
        }

        self.pending_call = None;
        self.turns.push(Turn {
            role: Role::Tool,
            parts: vec![Part::function_response(name, content)],
        });
        Ok(())
    }

    /// Independent copy of all turns so far.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn last_role(&self) -> Option<Role> {
        self.turns.last().map(|t| t.role)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str) -> FunctionCall {
        FunctionCall {
            name: name.to_string(),
            args: json!({"genreIds": [18]}),
        }
    }

    #[test]
    fn test_new_seeds_user_turn() {
        let history = ConversationHistory::new("pick something");
        let turns = history.snapshot();

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].parts, vec![Part::text("pick something")]);
    }

    #[test]
    fn test_call_then_response() {
        let mut history = ConversationHistory::new("prompt");
        history
            .append_model_function_call(call("get_movies_by_genre"))
            .unwrap();
        history
            .append_tool_response("get_movies_by_genre", json!([{"id": 1}]))
            .unwrap();

        let turns = history.snapshot();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].role, Role::Model);
        assert_eq!(turns[2].role, Role::Tool);
        assert_eq!(
            turns[2].parts,
            vec![Part::function_response("get_movies_by_genre", json!([{"id": 1}]))]
        );
        assert_eq!(history.last_role(), Some(Role::Tool));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut history = ConversationHistory::new("prompt");
        let mut snapshot = history.snapshot();
        snapshot.push(Turn {
            role: Role::Model,
            parts: vec![Part::text("injected")],
        });
        snapshot[0].parts.clear();

        assert_eq!(history.len(), 1);
        assert_eq!(history.snapshot()[0].parts, vec![Part::text("prompt")]);

        history.append_model_function_call(call("a")).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_response_requires_matching_call() {
        let mut history = ConversationHistory::new("prompt");
        assert!(history.append_tool_response("a", json!(null)).is_err());

        history.append_model_function_call(call("a")).unwrap();
        assert!(history.append_tool_response("b", json!(null)).is_err());
        assert!(history.append_model_function_call(call("c")).is_err());

        history.append_tool_response("a", json!(null)).unwrap();
        assert_eq!(history.len(), 3);
    }
}
