//! The agentic loop that runs a single role against a model.
//!
//! An agent sends the conversation to the provider, executes any tool calls
//! the model asks for and feeds the results back, until the model answers
//! without requesting tools.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Error;
use crate::message::{Message, ToolCall, Usage};
use crate::provider::{CompletionRequest, ModelSettings, Provider};
use crate::tool::ToolRegistry;

/// Configuration for one agent run.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Name used in logs and progress events.
    pub id: String,
    /// System prompt for the agent.
    pub system_prompt: Option<String>,
    /// Maximum agentic loop iterations.
    pub max_iterations: usize,
    /// Model and sampling parameters.
    pub settings: ModelSettings,
}

impl AgentConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system_prompt: None,
            max_iterations: 15,
            settings: ModelSettings::default(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Events emitted while a crew runs, for status display.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A stage has started.
    StageStart {
        stage: String,
        role: String,
        index: usize,
        total: usize,
    },
    /// A tool execution has started.
    ToolStart { agent: String, tool: String },
    /// A tool execution has completed.
    ToolComplete {
        agent: String,
        tool: String,
        is_error: bool,
    },
    /// A stage finished and produced output.
    StageComplete { stage: String, output_len: usize },
}

/// Receives progress events during execution.
#[async_trait]
pub trait ProgressHandler: Send + Sync {
    async fn on_progress(&self, event: ProgressEvent);
}

/// Final answer of an agent run.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub content: String,
    pub usage: Usage,
    pub iterations: usize,
}

pub struct Agent;

impl Agent {
    /// Run a one-shot task with the given context.
    ///
    /// The agent runs until the model produces a response without tool
    /// calls. Provider failures and hard tool failures end the run with an
    /// error.
    pub async fn run_once(
        provider: &Arc<dyn Provider>,
        tools: &ToolRegistry,
        config: &AgentConfig,
        context: Vec<Message>,
        progress: Option<&Arc<dyn ProgressHandler>>,
    ) -> Result<AgentRun, Error> {
        debug!(
            agent = %config.id,
            context_messages = context.len(),
            tools_available = tools.len(),
            "Agent run_once starting"
        );

        let mut messages = Vec::new();
        if let Some(system) = &config.system_prompt {
            messages.push(Message::system(system.as_str()));
        }
        messages.extend(context);

        let mut usage = Usage::default();

        for iteration in 0..config.max_iterations {
            debug!(
                agent = %config.id,
                iteration = iteration,
                message_count = messages.len(),
                "Agent iteration starting"
            );

            let request = CompletionRequest::new(messages.clone())
                .with_settings(&config.settings)
                .with_tools(tools.definitions());

            let response = provider.complete(request).await?;
            usage.add(&response.usage);

            let tool_calls = response.message.tool_calls;
            if tool_calls.is_empty() {
                debug!(
                    agent = %config.id,
                    iterations = iteration + 1,
                    response_len = response.message.content.len(),
                    "Agent completed successfully"
                );
                return Ok(AgentRun {
                    content: response.message.content,
                    usage,
                    iterations: iteration + 1,
                });
            }

            debug!(agent = %config.id, tool_count = tool_calls.len(), "Agent executing tools");
            messages.push(Message::assistant_with_tool_calls(
                response.message.content,
                tool_calls.clone(),
            ));

            for tool_call in &tool_calls {
                if let Some(handler) = progress {
                    handler
                        .on_progress(ProgressEvent::ToolStart {
                            agent: config.id.clone(),
                            tool: tool_call.name.clone(),
                        })
                        .await;
                }

                let (result, is_error) = execute_tool(tools, tool_call).await?;

                if let Some(handler) = progress {
                    handler
                        .on_progress(ProgressEvent::ToolComplete {
                            agent: config.id.clone(),
                            tool: tool_call.name.clone(),
                            is_error,
                        })
                        .await;
                }

                messages.push(Message::tool_result(&tool_call.id, result));
            }
        }

        Err(Error::Unknown(format!(
            "Agent {} exceeded max iterations ({})",
            config.id, config.max_iterations
        )))
    }
}

/// Execute a single tool call.
///
/// Unknown tools and soft tool errors are rendered as `Error: ...` text for
/// the model; a hard failure from the tool is returned as `Err`.
async fn execute_tool(registry: &ToolRegistry, tool_call: &ToolCall) -> Result<(String, bool), Error> {
    let Some(tool) = registry.get(&tool_call.name) else {
        return Ok((format!("Error: Unknown tool '{}'", tool_call.name), true));
    };

    debug!(tool = %tool_call.name, arguments = %tool_call.arguments, "Executing tool");
    let output = tool.execute(tool_call.arguments.clone()).await?;
    if output.is_error {
        Ok((format!("Error: {}", output.content), true))
    } else {
        Ok((output.content, false))
    }
}
