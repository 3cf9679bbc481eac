//! Agent system for movie suggestions with tool calling.
//!
//! Provides the conversation log, the tool registry, the interaction loop
//! that drives the model until it answers in text, and the parser that turns
//! that answer into a [`SuggestionResult`].

mod history;
mod parser;
mod runner;
mod tools;

pub use history::ConversationHistory;
pub use parser::{
    parse_suggestions, SuggestionResult, ARRAY_ONLY_EXPLANATION, MISSING_EXPLANATION,
    PARSE_FAILURE_EXPLANATION,
};
pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{ToolHandler, ToolRegistry};
