//! Answerer role: turns research notes into a short help-center reply.

use crate::{RoleDefinition, NOT_FOUND_FALLBACK};

pub struct AnswererRole {
    instructions: String,
}

impl AnswererRole {
    pub fn new() -> Self {
        let instructions = format!(
            r#"You are a virtual assistant for SEAMEO SPAFA Help Center. Provide CONCISE and DIRECT answers.

ANSWER FORMAT REQUIREMENTS:
- Maximum 2-3 paragraphs only
- Get straight to the point
- No lengthy introductions or explanations
- Include source URLs from seameo-spafa.org at the end
- If no information found, simply say "{}"

STRICT RULES:
- NO verbose or lengthy responses
- Answer ONLY what is asked
- Use English language
- ONLY answer SEAMEO SPAFA related questions"#,
            NOT_FOUND_FALLBACK
        );
        Self { instructions }
    }
}

impl Default for AnswererRole {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDefinition for AnswererRole {
    fn name(&self) -> &str {
        "SEAMEO SPAFA Help Center Assistant"
    }

    fn goal(&self) -> &str {
        "Provide concise, direct answers (2-3 paragraphs) based on official SEAMEO SPAFA information"
    }

    fn instructions(&self) -> &str {
        &self.instructions
    }
}
