//! Agent runner with the tool calling loop.

use super::history::ConversationHistory;
use super::tools::ToolRegistry;
use crate::error::{CinemoodError, Result};
use crate::llm::{FunctionCall, GenerateRequest, LanguageModel, Part, Role};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Where the loop currently stands.
#[derive(Debug)]
enum LoopState {
    /// A request to the model is due.
    AwaitingModel,
    /// The model asked for a tool; it runs before the next request.
    ToolCallPending(FunctionCall),
    /// The model produced its final text.
    Done(String),
}

/// Agent that drives a conversation with a model until it answers in text.
pub struct Agent {
    model: Arc<dyn LanguageModel>,
    tools: Arc<ToolRegistry>,
    max_steps: usize,
}

impl Agent {
    /// Create an agent. The step ceiling defaults to the tool count plus two.
    pub fn new(model: Arc<dyn LanguageModel>, tools: Arc<ToolRegistry>) -> Self {
        let max_steps = tools.len() + 2;
        Self {
            model,
            tools,
            max_steps,
        }
    }

    /// Set maximum model round trips for one run.
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max.max(1);
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run the loop on `history` until the model returns text.
    ///
    /// Structural and transport errors abort the run; tool failures are fed
    /// back to the model as data.
    #[instrument(skip(self, history), fields(model = %self.model.model_name()))]
    pub async fn run(&self, history: &mut ConversationHistory) -> Result<AgentResponse> {
        let mut state = LoopState::AwaitingModel;
        let mut steps = 0;
        let mut tool_calls = Vec::new();

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    steps += 1;
                    if steps > self.max_steps {
                        return Err(CinemoodError::LoopExceeded(self.max_steps));
                    }
                    debug!("Agent step {}", steps);
                    self.step(history).await?
                }
                LoopState::ToolCallPending(call) => {
                    history.append_model_function_call(call.clone())?;
                    let result = self.tools.execute(&call).await;
                    tool_calls.push(ToolCallRecord::new(&call, &result));
                    history.append_tool_response(&call.name, result)?;
                    LoopState::AwaitingModel
                }
                LoopState::Done(content) => {
                    if tool_calls.is_empty() {
                        debug!("Model answered without calling any tool");
                    }
                    info!(
                        "Agent finished in {} step(s) with {} tool call(s)",
                        steps,
                        tool_calls.len()
                    );
                    return Ok(AgentResponse {
                        content,
                        tool_calls,
                        steps,
                    });
                }
            };
        }
    }

    /// Send one request and classify the response.
    async fn step(&self, history: &ConversationHistory) -> Result<LoopState> {
        let contents = history.snapshot();
        let expecting_text = history.last_role() == Some(Role::Tool);

        let request = if expecting_text {
            GenerateRequest::text_only(contents)
        } else {
            GenerateRequest::with_tools(contents, self.tools.declarations())
        };

        let response = self.model.generate(&request).await?;

        let parts = match response.first_parts() {
            Some(parts) if !parts.is_empty() => parts,
            _ => {
                return Err(CinemoodError::InvalidResponse(
                    "Received invalid response structure from LLM.".to_string(),
                ))
            }
        };

        if let Some(call) = parts.iter().find_map(|part| match part {
            Part::FunctionCall { function_call } => Some(function_call.clone()),
            _ => None,
        }) {
            return Ok(LoopState::ToolCallPending(call));
        }

        let text = parts.iter().find_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::FunctionCall { .. } | Part::FunctionResponse { .. } | Part::Other(_) => None,
        });

        match text {
            Some(text) if !text.is_empty() => Ok(LoopState::Done(text.to_string())),
            _ => Err(CinemoodError::InvalidResponse(
                "LLM did not provide a function call or final text.".to_string(),
            )),
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The model's final text.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model round trips used.
    pub steps: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: Value,
    /// Whether the tool answered with an error payload.
    pub failed: bool,
}

impl ToolCallRecord {
    fn new(call: &FunctionCall, result: &Value) -> Self {
        Self {
            name: call.name.clone(),
            arguments: call.args.clone(),
            failed: result.get("error").is_some(),
        }
    }
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools::ToolHandler;
    use crate::llm::{GenerateResponse, ParametersSchema, ToolDeclaration};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Model double that replays canned responses and records requests.
    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<GenerateResponse>>>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<GenerateResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(GenerateResponse::from_parts(vec![Part::text("fallback")])))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct MoviesTool;

    #[async_trait]
    impl ToolHandler for MoviesTool {
        fn declaration(&self) -> ToolDeclaration {
            ToolDeclaration {
                name: "get_movies_by_genre".to_string(),
                description: "stub".to_string(),
                parameters: ParametersSchema::number_array("genreIds", "ids"),
            }
        }

        async fn call(&self, _args: Value) -> Result<Value> {
            Ok(json!([{"id": 1, "title": "A"}]))
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MoviesTool)).unwrap();
        Arc::new(registry)
    }

    fn call_response(name: &str) -> Result<GenerateResponse> {
        Ok(GenerateResponse::from_parts(vec![Part::function_call(FunctionCall {
            name: name.to_string(),
            args: json!({"genreIds": [35]}),
        })]))
    }

    fn text_response(text: &str) -> Result<GenerateResponse> {
        Ok(GenerateResponse::from_parts(vec![Part::text(text)]))
    }

    #[tokio::test]
    async fn test_tool_call_then_text_terminates_in_two_steps() {
        let model = ScriptedModel::new(vec![
            call_response("get_movies_by_genre"),
            text_response("{\"suggestions\":[],\"explanation\":\"x\"}"),
        ]);
        let agent = Agent::new(model.clone(), registry());
        let mut history = ConversationHistory::new("prompt");

        let response = agent.run(&mut history).await.unwrap();

        assert_eq!(response.steps, 2);
        assert_eq!(response.content, "{\"suggestions\":[],\"explanation\":\"x\"}");
        assert_eq!(response.tool_calls.len(), 1);
        assert!(!response.tool_calls[0].failed);

        let turns = history.snapshot();
        let roles: Vec<Role> = turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::Tool]);
        assert_eq!(
            turns[2].parts,
            vec![Part::function_response(
                "get_movies_by_genre",
                json!([{"id": 1, "title": "A"}])
            )]
        );
    }

    #[tokio::test]
    async fn test_text_only_after_tool_turn() {
        let model = ScriptedModel::new(vec![
            call_response("get_movies_by_genre"),
            text_response("done"),
        ]);
        let agent = Agent::new(model.clone(), registry());
        let mut history = ConversationHistory::new("prompt");
        agent.run(&mut history).await.unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 2);

        assert!(!requests[0].is_text_only());
        assert_eq!(
            requests[0].tools.as_ref().unwrap()[0].function_declarations[0].name,
            "get_movies_by_genre"
        );

        assert!(requests[1].is_text_only());
        assert!(requests[1].tools.is_none());
        assert_eq!(requests[1].contents.last().unwrap().role, Role::Tool);
    }

    #[tokio::test]
    async fn test_turn_alternation_with_unknown_tool() {
        let model = ScriptedModel::new(vec![
            call_response("made_up_tool"),
            call_response("get_movies_by_genre"),
            text_response("done"),
        ]);
        let agent = Agent::new(model.clone(), registry());
        let mut history = ConversationHistory::new("prompt");

        let response = agent.run(&mut history).await.unwrap();
        assert_eq!(response.steps, 3);
        assert!(response.tool_calls[0].failed);

        let turns = history.snapshot();
        for (i, turn) in turns.iter().enumerate() {
            if let Some(Part::FunctionCall { function_call }) = turn.parts.first() {
                let next = &turns[i + 1];
                assert_eq!(next.role, Role::Tool);
                match &next.parts[0] {
                    Part::FunctionResponse { function_response } => {
                        assert_eq!(function_response.name, function_call.name)
                    }
                    other => panic!("Expected function response, got {:?}", other),
                }
            }
        }
        match &turns[2].parts[0] {
            Part::FunctionResponse { function_response } => assert_eq!(
                function_response.response.content["error"],
                "Unknown tool function requested: made_up_tool"
            ),
            other => panic!("Expected function response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_direct_text_answer_is_tolerated() {
        let model = ScriptedModel::new(vec![text_response("[]")]);
        let agent = Agent::new(model, registry());
        let mut history = ConversationHistory::new("prompt");

        let response = agent.run(&mut history).await.unwrap();
        assert_eq!(response.steps, 1);
        assert!(response.tool_calls.is_empty());
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_function_call_wins_over_text() {
        let model = ScriptedModel::new(vec![
            Ok(GenerateResponse::from_parts(vec![
                Part::text("Let me look that up."),
                Part::function_call(FunctionCall {
                    name: "get_movies_by_genre".to_string(),
                    args: json!({"genreIds": [35]}),
                }),
            ])),
            text_response("done"),
        ]);
        let agent = Agent::new(model, registry());
        let mut history = ConversationHistory::new("prompt");

        let response = agent.run(&mut history).await.unwrap();
        assert_eq!(response.content, "done");
        assert_eq!(response.tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_parts_is_structural_error() {
        let model = ScriptedModel::new(vec![Ok(GenerateResponse::default())]);
        let agent = Agent::new(model, registry());
        let mut history = ConversationHistory::new("prompt");

        let err = agent.run(&mut history).await.unwrap_err();
        assert!(matches!(err, CinemoodError::InvalidResponse(_)));
        assert_eq!(err.to_string(), "Received invalid response structure from LLM.");
    }

    #[tokio::test]
    async fn test_no_call_and_no_text_is_structural_error() {
        let model = ScriptedModel::new(vec![
            Ok(GenerateResponse::from_parts(vec![Part::Other(json!({"inlineData": {}}))])),
        ]);
        let agent = Agent::new(model, registry());
        let mut history = ConversationHistory::new("prompt");

        let err = agent.run(&mut history).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "LLM did not provide a function call or final text."
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let model = ScriptedModel::new(vec![Err(CinemoodError::Api {
            status: 500,
            message: None,
        })]);
        let agent = Agent::new(model, registry());
        let mut history = ConversationHistory::new("prompt");

        let err = agent.run(&mut history).await.unwrap_err();
        assert!(matches!(err, CinemoodError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_step_ceiling() {
        let model = ScriptedModel::new(vec![
            call_response("get_movies_by_genre"),
            call_response("get_movies_by_genre"),
            call_response("get_movies_by_genre"),
            call_response("get_movies_by_genre"),
        ]);
        let agent = Agent::new(model.clone(), registry());
        assert_eq!(agent.max_steps(), 3);
        let mut history = ConversationHistory::new("prompt");

        let err = agent.run(&mut history).await.unwrap_err();
        assert!(matches!(err, CinemoodError::LoopExceeded(3)));
        assert_eq!(model.requests().len(), 3);
    }

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "get_movies_by_genre".to_string(),
            arguments: json!({"genreIds": [28]}),
            failed: false,
        };
        assert_eq!(format!("{}", record), r#"get_movies_by_genre({"genreIds":[28]})"#);
    }
}
