//! Sequential crew runner.
//!
//! A crew executes an ordered list of tasks. Each task runs under its own
//! role in a fresh agent loop; the outputs of earlier tasks are handed to
//! later ones as context. Execution is all-or-nothing: the first error ends
//! the run and no partial output is returned.

use std::sync::Arc;

use tracing::{debug, info};

use crate::agent::{Agent, AgentConfig, ProgressEvent, ProgressHandler};
use crate::error::Error;
use crate::message::{Message, Usage};
use crate::provider::{ModelSettings, Provider};
use crate::task::{aggregate_outputs, TaskOutput, TaskSpec};
use crate::tool::ToolRegistry;

/// Outputs of a completed crew run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct CrewOutput {
    pub tasks: Vec<TaskOutput>,
    pub usage: Usage,
}

impl CrewOutput {
    /// Look up the output of a task by name.
    pub fn task(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Output of the last task that ran.
    pub fn final_output(&self) -> Option<&TaskOutput> {
        self.tasks.last()
    }
}

pub struct Crew {
    provider: Arc<dyn Provider>,
    tools: ToolRegistry,
    settings: ModelSettings,
    max_iterations: usize,
    progress: Option<Arc<dyn ProgressHandler>>,
}

impl Crew {
    pub fn new(provider: Arc<dyn Provider>, tools: ToolRegistry) -> Self {
        Self {
            provider,
            tools,
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

    pub fn with_progress(mut self, progress: Option<Arc<dyn ProgressHandler>>) -> Self {
        self.progress = progress;
        self
    }

    /// Run the tasks strictly in order.
    pub async fn kickoff(&self, tasks: &[TaskSpec]) -> Result<CrewOutput, Error> {
        if tasks.is_empty() {
            return Err(Error::config("Crew has no tasks to run"));
        }

        // Validate every stage up front so a bad role never costs a model call.
        let mut stage_tools = Vec::with_capacity(tasks.len());
        for task in tasks {
            if task.role.allow_delegation {
                return Err(Error::config(format!(
                    "Role '{}' allows delegation, which is not supported",
                    task.role.name
                )));
            }
            stage_tools.push(self.tools.subset(&task.role.tools)?);
        }

        let mut output = CrewOutput::default();
        let total = tasks.len();

        for (index, (task, tools)) in tasks.iter().zip(stage_tools).enumerate() {
            if let Some(handler) = &self.progress {
                handler
                    .on_progress(ProgressEvent::StageStart {
                        stage: task.name.clone(),
                        role: task.role.name.clone(),
                        index,
                        total,
                    })
                    .await;
            }

            let context = aggregate_outputs(&output.tasks);
            let prompt = task.prompt(Some(&context));

            debug!(
                stage = %task.name,
                role = %task.role.name,
                tools = ?task.role.tools,
                prompt_len = prompt.len(),
                "Crew stage starting"
            );

            let config = AgentConfig::new(task.name.clone())
                .with_system_prompt(task.role.system_prompt())
                .with_max_iterations(self.max_iterations)
                .with_settings(self.settings.clone());

            let run = Agent::run_once(
                &self.provider,
                &tools,
                &config,
                vec![Message::user(prompt)],
                self.progress.as_ref(),
            )
            .await?;

            if let Some(handler) = &self.progress {
                handler
                    .on_progress(ProgressEvent::StageComplete {
                        stage: task.name.clone(),
                        output_len: run.content.len(),
                    })
                    .await;
            }

            output.usage.add(&run.usage);
            output.tasks.push(TaskOutput {
                name: task.name.clone(),
                role: task.role.name.clone(),
                raw: run.content,
            });
        }

        info!(
            stages = output.tasks.len(),
            total_tokens = output.usage.total_tokens,
            "Crew run finished"
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::role::RoleSpec;
    use crate::testing::{MockProvider, MockTool};

    fn role(name: &str) -> RoleSpec {
        RoleSpec::new(name, format!("{} goal", name), format!("{} instructions", name))
    }

    fn crew(mock: &Arc<MockProvider>, tools: ToolRegistry) -> Crew {
        let provider: Arc<dyn Provider> = mock.clone();
        Crew::new(provider, tools)
    }

    #[tokio::test]
    async fn test_stages_run_in_order_with_context() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response("first output");
        mock.queue_response("second output");

        let tasks = vec![
            TaskSpec::new("one", "Do one", role("A"), "one thing"),
            TaskSpec::new("two", "Do two", role("B"), "two things"),
        ];
        let output = crew(&mock, ToolRegistry::new()).kickoff(&tasks).await.unwrap();

        assert_eq!(output.tasks.len(), 2);
        assert_eq!(output.task("one").unwrap().raw, "first output");
        assert_eq!(output.final_output().unwrap().role, "B");

        let requests = mock.requests();
        assert!(requests[0].messages[0].content.starts_with("You are A."));
        assert!(!requests[0].messages[1].content.contains("first output"));
        assert!(requests[1].messages[1].content.contains("first output"));
    }

    #[tokio::test]
    async fn test_stage_only_sees_its_role_tools() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response("a");
        mock.queue_response("b");

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(MockTool::new("lookup", "")));

        let tasks = vec![
            TaskSpec::new("one", "Do one", role("A").with_tools(["lookup"]), "x"),
            TaskSpec::new("two", "Do two", role("B"), "y"),
        ];
        crew(&mock, tools).kickoff(&tasks).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].tools.len(), 1);
        assert!(requests[1].tools.is_empty());
    }

    #[tokio::test]
    async fn test_settings_applied_to_requests() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response("a");

        let settings = ModelSettings {
            model: Some("gpt-4o".into()),
            temperature: Some(0.1),
            max_tokens: Some(2000),
        };
        let tasks = vec![TaskSpec::new("one", "Do one", role("A"), "x")];
        crew(&mock, ToolRegistry::new())
            .with_settings(settings)
            .kickoff(&tasks)
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(2000));
    }

    #[tokio::test]
    async fn test_error_stops_later_stages() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_error(Error::network("connection reset"));
        mock.queue_response("never used");

        let tasks = vec![
            TaskSpec::new("one", "Do one", role("A"), "x"),
            TaskSpec::new("two", "Do two", role("B"), "y"),
        ];
        let err = crew(&mock, ToolRegistry::new()).kickoff(&tasks).await.unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_delegation_and_unknown_tools() {
        let mock = Arc::new(MockProvider::new());

        let delegating = vec![TaskSpec::new("one", "x", role("A").with_delegation(true), "x")];
        let err = crew(&mock, ToolRegistry::new()).kickoff(&delegating).await.unwrap_err();
        assert!(err.to_string().contains("delegation"));

        let unknown = vec![TaskSpec::new("one", "x", role("A").with_tools(["web_search"]), "x")];
        let err = crew(&mock, ToolRegistry::new()).kickoff(&unknown).await.unwrap_err();
        assert!(err.to_string().contains("web_search"));

        assert!(crew(&mock, ToolRegistry::new()).kickoff(&[]).await.is_err());
        assert_eq!(mock.request_count(), 0);
    }

    struct Recorder(Mutex<Vec<String>>);

    #[async_trait]
    impl ProgressHandler for Recorder {
        async fn on_progress(&self, event: ProgressEvent) {
            let label = match event {
                ProgressEvent::StageStart { stage, .. } => format!("start:{}", stage),
                ProgressEvent::ToolStart { tool, .. } => format!("tool:{}", tool),
                ProgressEvent::ToolComplete { .. } => "tool-done".to_string(),
                ProgressEvent::StageComplete { stage, .. } => format!("done:{}", stage),
            };
            self.0.lock().unwrap().push(label);
        }
    }

    #[tokio::test]
    async fn test_progress_events() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_tool_call("lookup", serde_json::json!({}));
        mock.queue_response("a");

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(MockTool::new("lookup", "found")));

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let handler: Arc<dyn ProgressHandler> = recorder.clone();
        let tasks = vec![TaskSpec::new("one", "x", role("A").with_tools(["lookup"]), "x")];
        crew(&mock, tools)
            .with_progress(Some(handler))
            .kickoff(&tasks)
            .await
            .unwrap();

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["start:one", "tool:lookup", "tool-done", "done:one"]
        );
    }
}
