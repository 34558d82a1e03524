//! Task specifications and their outputs.

use serde::{Deserialize, Serialize};

use crate::role::RoleSpec;

/// Separator placed between prior stage outputs in a task's context.
pub const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// One parameterized instruction bound to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Stable identifier used to look the output up after a run.
    pub name: String,
    /// Instruction text, already interpolated with the user's question.
    pub description: String,
    /// Role the task is executed under.
    pub role: RoleSpec,
    /// Description of the shape the answer should take.
    pub expected_output: String,
    /// Whether outputs of earlier stages are passed along as context.
    pub sees_prior_outputs: bool,
}

impl TaskSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        role: RoleSpec,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            role,
            expected_output: expected_output.into(),
            sees_prior_outputs: true,
        }
    }

    pub fn without_prior_outputs(mut self) -> Self {
        self.sees_prior_outputs = false;
        self
    }

    /// Render the user message for this task.
    ///
    /// `context` is only included when the task accepts prior outputs and
    /// there is something to show.
    pub fn prompt(&self, context: Option<&str>) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.description.trim(),
            self.expected_output
        );

        if self.sees_prior_outputs {
            if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
                prompt.push_str("\n\nThis is the context you're working with:\n");
                prompt.push_str(context);
            }
        }

        prompt.push_str("\n\nBegin! This is VERY important to you, use the tools available and give your best Final Answer.");
        prompt
    }
}

/// Raw output of one executed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub name: String,
    pub role: String,
    pub raw: String,
}

/// Join task outputs into the context handed to the next stage.
pub fn aggregate_outputs(outputs: &[TaskOutput]) -> String {
    outputs
        .iter()
        .map(|o| o.raw.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskSpec {
        TaskSpec::new(
            "answer",
            "  Answer the question \"x\"  ",
            RoleSpec::new("Writer", "Write", "You write."),
            "Short answer",
        )
    }

    #[test]
    fn test_prompt_includes_context() {
        let prompt = task().prompt(Some("research notes"));
        assert!(prompt.starts_with("Current Task: Answer the question \"x\""));
        assert!(prompt.contains("expected criteria for your final answer: Short answer"));
        assert!(prompt.contains("This is the context you're working with:\nresearch notes"));
    }

    #[test]
    fn test_prompt_skips_blank_or_refused_context() {
        assert!(!task().prompt(Some("   ")).contains("context you're working with"));
        assert!(!task()
            .without_prior_outputs()
            .prompt(Some("notes"))
            .contains("notes"));
    }

    #[test]
    fn test_aggregate_outputs() {
        let outputs = vec![
            TaskOutput {
                name: "a".into(),
                role: "r".into(),
                raw: "first".into(),
            },
            TaskOutput {
                name: "b".into(),
                role: "r".into(),
                raw: "second".into(),
            },
        ];
        assert_eq!(aggregate_outputs(&outputs), format!("first{}second", CONTEXT_SEPARATOR));
        assert_eq!(aggregate_outputs(&[]), "");
    }
}
