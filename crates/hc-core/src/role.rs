//! Role specifications: the persona a model invocation runs under.

use serde::{Deserialize, Serialize};

/// A static bundle of behavioral instructions and permitted tools.
///
/// Roles carry no runtime state; a fresh value is built for every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Display name, e.g. "Quality Assurance Specialist".
    pub name: String,
    /// One-sentence objective the model should pursue.
    pub goal: String,
    /// Longer behavioral instructions (the role's backstory).
    pub instructions: String,
    /// Names of the tools the role may call.
    pub tools: Vec<String>,
    /// Whether the role may hand work to other roles.
    pub allow_delegation: bool,
}

impl RoleSpec {
    pub fn new(
        name: impl Into<String>,
        goal: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            allow_delegation: false,
        }
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Render the system prompt for a model call made under this role.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\n\nYour personal goal is: {}",
            self.name,
            self.instructions.trim(),
            self.goal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults() {
        let role = RoleSpec::new("Tester", "Test things", "You test.");
        assert!(role.tools.is_empty());
        assert!(!role.allow_delegation);
    }

    #[test]
    fn test_system_prompt_contains_all_parts() {
        let role = RoleSpec::new("Researcher", "Find facts", "\n   You dig.\n   ")
            .with_tools(["web_search"]);
        let prompt = role.system_prompt();

        assert!(prompt.starts_with("You are Researcher. You dig."));
        assert!(prompt.ends_with("Your personal goal is: Find facts"));
        assert_eq!(role.tools, vec!["web_search".to_string()]);
    }
}
