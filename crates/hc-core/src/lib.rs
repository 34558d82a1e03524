//! hc-core: Core types and traits for the help center assistant
//!
//! This crate provides the provider and tool abstractions, the agentic loop
//! and the sequential crew runner that the help center pipeline is built on.

pub mod agent;
pub mod crew;
pub mod error;
pub mod message;
pub mod provider;
pub mod role;
pub mod task;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use agent::{Agent, AgentConfig, AgentRun, ProgressEvent, ProgressHandler};
pub use crew::{Crew, CrewOutput};
pub use error::Error;
pub use message::{Message, Role, ToolCall, Usage};
pub use provider::{CompletionRequest, CompletionResponse, FinishReason, ModelSettings, Provider};
pub use role::RoleSpec;
pub use task::{aggregate_outputs, TaskOutput, TaskSpec, CONTEXT_SEPARATOR};
pub use tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters, ToolRegistry};

pub type Result<T> = std::result::Result<T, Error>;
