//! Quality checker role.

use crate::RoleDefinition;

const INSTRUCTIONS: &str = r#"You verify that answers are:
1. Maximum 2-3 paragraphs
2. Direct and to the point
3. Include source URLs when information is found
4. Use "Maaf..." responses when no information available

Approve concise answers or request revision for verbose ones."#;

pub struct QualityCheckerRole;

impl QualityCheckerRole {
    pub fn new() -> Self {
        Self
    }
}

impl Default for QualityCheckerRole {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDefinition for QualityCheckerRole {
    fn name(&self) -> &str {
        "Quality Assurance Specialist"
    }

    fn goal(&self) -> &str {
        "Ensure answers are concise (2-3 paragraphs max) and include source URLs"
    }

    fn instructions(&self) -> &str {
        INSTRUCTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_role() {
        let role = QualityCheckerRole::new().role();
        assert_eq!(role.name, "Quality Assurance Specialist");
        assert!(role.tools.is_empty());
        assert!(!role.allow_delegation);
        assert!(role.system_prompt().contains("request revision"));
    }
}
