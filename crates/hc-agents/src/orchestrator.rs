//! The question pipeline: research, answer, quality check.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use hc_core::{Crew, Error, ModelSettings, ProgressHandler, Provider, ToolRegistry};
use hc_tools::{create_search_tools_arc, DomainConfig, SearchProvider};

use crate::tasks::{pipeline_tasks, ANSWER_TASK, QUALITY_TASK};
use crate::validate::{validate_question, ValidationResult};
use crate::verdict::QualityVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Completed,
    Error,
}

/// Outcome of one question. Exactly one is produced per `process` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub question: String,
    pub status: PipelineStatus,
}

impl PipelineResult {
    pub fn completed(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            success: true,
            answer: Some(answer.into()),
            error: None,
            question: question.into(),
            status: PipelineStatus::Completed,
        }
    }

    pub fn failed(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            answer: None,
            error: Some(error.into()),
            question: question.into(),
            status: PipelineStatus::Error,
        }
    }
}

/// What the chat surface needs from the backend.
#[async_trait]
pub trait AnswerService: Send + Sync {
    fn validate(&self, question: &str) -> ValidationResult {
        validate_question(question)
    }

    async fn process(&self, question: &str) -> PipelineResult;
}

/// Runs the three-stage crew against the configured model and search backend.
pub struct HelpDesk {
    provider: Arc<dyn Provider>,
    search: Arc<dyn SearchProvider>,
    domains: DomainConfig,
    settings: ModelSettings,
    max_iterations: usize,
    progress: Option<Arc<dyn ProgressHandler>>,
}

impl HelpDesk {
    pub fn new(
        provider: Arc<dyn Provider>,
        search: Arc<dyn SearchProvider>,
        domains: DomainConfig,
    ) -> Self {
        Self {
            provider,
            search,
            domains,
            settings: ModelSettings::default(),
            max_iterations: 15,
            progress: None,
        }
    }

    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = Some(progress);
        self
    }

    async fn run(&self, question: &str) -> Result<String, Error> {
        let mut tools = ToolRegistry::new();
        for tool in create_search_tools_arc(self.search.clone()) {
            tools.register(tool);
        }

        let tasks = pipeline_tasks(question, &self.domains);
        let output = Crew::new(self.provider.clone(), tools)
            .with_settings(self.settings.clone())
            .with_max_iterations(self.max_iterations)
            .with_progress(self.progress.clone())
            .kickoff(&tasks)
            .await?;

        if let Some(check) = output.task(QUALITY_TASK) {
            let verdict = QualityVerdict::parse(&check.raw);
            info!(%verdict, "Quality check finished");
            debug!(review = %check.raw, "Quality check output");
        }

        // Crew::kickoff returns one output per task or an error, so this only
        // fails if the answer task was left out of the chain.
        output
            .task(ANSWER_TASK)
            .map(|t| t.raw.clone())
            .ok_or_else(|| Error::Unknown("Answer stage produced no output".to_string()))
    }
}

#[async_trait]
impl AnswerService for HelpDesk {
    async fn process(&self, question: &str) -> PipelineResult {
        match self.run(question).await {
            Ok(answer) => {
                info!(answer_len = answer.len(), "Question answered");
                PipelineResult::completed(question, answer)
            }
            Err(e) => {
                warn!(error = %e, "Pipeline failed");
                PipelineResult::failed(question, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serialization() {
        let ok = serde_json::to_value(PipelineResult::completed("q", "a")).unwrap();
        assert_eq!(ok["status"], "completed");
        assert_eq!(ok["success"], true);
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(PipelineResult::failed("q", "boom")).unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["error"], "boom");
        assert!(err.get("answer").is_none());
    }
}
