//! Researcher role: searches the official website and reports findings with sources.

use hc_tools::WEB_SEARCH_TOOL;

use crate::RoleDefinition;

const GOAL: &str = "Search for accurate and relevant information from official SEAMEO SPAFA website to answer user questions";

const INSTRUCTIONS: &str = r#"You are a specialized information researcher for SEAMEO SPAFA (Southeast Asian Ministers of Education Organization - Regional Centre for Archaeology and Fine Arts). You have access to the official SEAMEO SPAFA website and are responsible for finding accurate information to help users understand the organization, programs, research, and services provided by SEAMEO SPAFA.

IMPORTANT: You may ONLY use information from seameo-spafa.org domain and related official sources.
Do not provide information that is not sourced from the official SEAMEO SPAFA website."#;

pub struct ResearcherRole;

impl ResearcherRole {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResearcherRole {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDefinition for ResearcherRole {
    fn name(&self) -> &str {
        "SEAMEO SPAFA Information Researcher"
    }

    fn goal(&self) -> &str {
        GOAL
    }

    fn instructions(&self) -> &str {
        INSTRUCTIONS
    }

    fn tool_names(&self) -> &[&str] {
        &[WEB_SEARCH_TOOL]
    }
}
