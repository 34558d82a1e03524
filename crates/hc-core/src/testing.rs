//! Test utilities shared across the workspace.
//! Only compiled when running tests or with the `testing` feature.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::message::{Message, ToolCall, Usage};
use crate::provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};
use crate::tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

/// A mock provider that returns pre-configured responses.
pub struct MockProvider {
    responses: Mutex<Vec<Result<CompletionResponse, Error>>>,
    /// Captured requests (for assertion).
    pub captured_requests: Mutex<Vec<CompletionRequest>>,
    pub name: String,
    pub default_model: Option<String>,
    next_call_id: Mutex<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            captured_requests: Mutex::new(Vec::new()),
            name: "mock".to_string(),
            default_model: None,
            next_call_id: Mutex::new(0),
        }
    }

    /// Queue a response to be returned by the next complete() call.
    /// Responses are returned in FIFO order (first queued = first returned).
    pub fn queue_response(&self, content: &str) {
        self.queue_raw_response(Message::assistant(content), FinishReason::Stop);
    }

    /// Queue a response asking for a single tool call.
    pub fn queue_tool_call(&self, tool: &str, arguments: Value) {
        let id = {
            let mut next = self.next_call_id.lock().unwrap();
            *next += 1;
            format!("call-{}", next)
        };
        let message = Message::assistant_with_tool_calls("", vec![ToolCall::new(id, tool, arguments)]);
        self.queue_raw_response(message, FinishReason::ToolCalls);
    }

    /// Queue an error for the next complete() call.
    pub fn queue_error(&self, error: Error) {
        self.responses.lock().unwrap().insert(0, Err(error));
    }

    fn queue_raw_response(&self, message: Message, finish_reason: FinishReason) {
        let response = CompletionResponse {
            message,
            usage: Usage::new(0, 0),
            model: "mock-model".to_string(),
            finish_reason,
        };
        self.responses.lock().unwrap().insert(0, Ok(response));
    }

    /// Get the number of captured requests.
    pub fn request_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    /// Get all captured requests in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    /// Get the last captured request.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, Error> {
        self.captured_requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop() {
            Some(response) => response,
            None => Err(Error::Unknown("No mock response queued".to_string())),
        }
    }
}

/// A mock tool that records its arguments and returns a fixed result.
pub struct MockTool {
    name: String,
    output: Result<String, String>,
    calls: Mutex<Vec<Value>>,
}

impl MockTool {
    pub fn new(name: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            output: Ok(output.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A tool whose every call fails with a network error.
    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            output: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Arguments of every call so far.
    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Mock tool"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property("query", PropertySchema::string("Query"), false),
        )
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
        self.calls.lock().unwrap().push(arguments);
        match &self.output {
            Ok(content) => Ok(ToolOutput::success(content.clone())),
            Err(message) => Err(Error::network(message.clone())),
        }
    }
}
