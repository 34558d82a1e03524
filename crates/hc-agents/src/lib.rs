//! Roles, tasks and the question pipeline for the help center assistant.
//!
//! This crate provides:
//! - `RoleDefinition` trait and the three built-in roles
//! - Task templates for each pipeline stage
//! - Question validation
//! - `HelpDesk`, the orchestrator behind the `AnswerService` trait

use hc_core::RoleSpec;

mod answerer;
mod orchestrator;
mod quality;
mod researcher;
mod tasks;
mod validate;
mod verdict;

pub use answerer::AnswererRole;
pub use orchestrator::{AnswerService, HelpDesk, PipelineResult, PipelineStatus};
pub use quality::QualityCheckerRole;
pub use researcher::ResearcherRole;
pub use tasks::{
    answer_task, pipeline_tasks, quality_task, research_task, ANSWER_TASK, NOT_FOUND_FALLBACK,
    OFF_TOPIC_FALLBACK, QUALITY_TASK, RESEARCH_TASK,
};
pub use validate::{validate_question, ValidationResult, MAX_QUESTION_CHARS, MIN_QUESTION_CHARS};
pub use verdict::QualityVerdict;

/// A built-in role.
///
/// Implementations are static instruction bundles; [`RoleDefinition::role`]
/// builds a fresh [`RoleSpec`] each time it is called.
pub trait RoleDefinition: Send + Sync {
    /// Display name the model is addressed by
    fn name(&self) -> &str;

    /// One-sentence objective
    fn goal(&self) -> &str;

    /// Behavioral instructions (backstory)
    fn instructions(&self) -> &str;

    /// Tools the role may call
    fn tool_names(&self) -> &[&str] {
        &[]
    }

    /// Whether the role may hand work to other roles. Not supported by the crew.
    fn allow_delegation(&self) -> bool {
        false
    }

    fn role(&self) -> RoleSpec {
        RoleSpec::new(self.name(), self.goal(), self.instructions())
            .with_tools(self.tool_names().iter().copied())
            .with_delegation(self.allow_delegation())
    }
}
