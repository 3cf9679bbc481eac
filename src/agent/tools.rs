//! Tool registry for the agent system.

use crate::error::{CinemoodError, Result};
use crate::llm::{FunctionCall, ToolDeclaration};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A tool the model can call by name.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Declaration sent to the model.
    fn declaration(&self) -> ToolDeclaration;

    /// Run the tool with the model-supplied arguments.
    async fn call(&self, args: Value) -> Result<Value>;
}

/// Registered tools, read-only once handed to an agent.
#[derive(Default)]
pub struct ToolRegistry {
    declarations: Vec<ToolDeclaration>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its declared name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<()> {
        let declaration = handler.declaration();
        if self.handlers.contains_key(&declaration.name) {
            return Err(CinemoodError::Tool(format!(
                "Tool '{}' is already registered",
                declaration.name
            )));
        }

        self.handlers.insert(declaration.name.clone(), handler);
        self.declarations.push(declaration);
        Ok(())
    }

    /// Declarations in registration order.
    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Dispatch a call to its handler.
    ///
    /// Never fails: unknown tools and handler failures come back as an
    /// `{"error": ...}` value so the model can react to them.
    pub async fn execute(&self, call: &FunctionCall) -> Value {
        let name = &call.name;
        info!("Executing tool: {} with args: {}", name, call.args);

        let Some(handler) = self.handlers.get(name) else {
            let message = format!("Unknown tool function requested: {}", name);
            warn!("{}", message);
            return json!({ "error": message });
        };

        match AssertUnwindSafe(handler.call(call.args.clone()))
            .catch_unwind()
            .await
        {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                error!("Tool {} failed: {}", name, e);
                json!({ "error": format!("{} execution failed: {}", name, e) })
            }
            Err(_) => {
                error!("Tool {} panicked", name);
                json!({ "error": format!("{} execution failed: handler panicked", name) })
            }
        }
    }
}
