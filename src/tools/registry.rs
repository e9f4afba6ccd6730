//! Tool registry and turn resolution.

use super::base::Tool;
use crate::client::ModelReply;
use crate::types::{Conversation, ToolCall, ToolDefinition, ToolResult};
use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Name → tool mapping. Declarations keep registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tool`; a second tool with the same name is rejected.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.definition().function.name;
        if self.index.contains_key(&name) {
            return Err(Error::validation_with_context(
                format!("tool '{}' is already registered", name),
                ErrorContext::new().with_source("tool_registry"),
            ));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: impl Tool + 'static) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|t| t.definition().function.name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations for every registered tool, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Execute one invocation.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| Error::unknown_tool(&call.name))?;
        debug!(tool = %call.name, call_id = %call.id, "executing tool");
        let content = tool.call(call.arguments.clone()).await?;
        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            content,
        })
    }

    /// Execute each invocation requested by `reply` in order, then append the
    /// assistant turn followed by one `tool` message per result.
    ///
    /// Every invocation runs before anything is appended, so any failure leaves the
    /// conversation untouched.
    pub async fn resolve_tool_calls(
        &self,
        conversation: &mut Conversation,
        reply: &ModelReply,
    ) -> Result<Vec<ToolResult>> {
        let calls = reply.tool_calls_requested();
        if let Some(unknown) = calls.iter().find(|c| !self.contains(&c.name)) {
            return Err(Error::unknown_tool(&unknown.name));
        }

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            info!(tool = %call.name, call_id = %call.id, "model requested tool");
            results.push(self.execute(call).await?);
        }

        let mut staged = conversation.clone();
        staged.push(reply.message.clone())?;
        for result in &results {
            staged.push_tool_result(result)?;
        }
        *conversation = staged;
        Ok(results)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Free-function form of [`ToolRegistry::resolve_tool_calls`].
pub async fn resolve_tool_calls(
    conversation: &mut Conversation,
    reply: &ModelReply,
    registry: &ToolRegistry,
) -> Result<Vec<ToolResult>> {
    registry.resolve_tool_calls(conversation, reply).await
}
