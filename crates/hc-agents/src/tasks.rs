//! Per-question task templates, one per pipeline stage.

use hc_core::TaskSpec;
use hc_tools::DomainConfig;

use crate::{AnswererRole, QualityCheckerRole, ResearcherRole, RoleDefinition};

pub const RESEARCH_TASK: &str = "research";
pub const ANSWER_TASK: &str = "answer";
pub const QUALITY_TASK: &str = "quality_check";

/// Reply when the website has nothing on the question.
pub const NOT_FOUND_FALLBACK: &str =
    "Maaf, saya tidak dapat menemukan informasi tersebut di website SEAMEO SPAFA";

/// Reply when the question is not about the organization at all.
pub const OFF_TOPIC_FALLBACK: &str =
    "Maaf, saya hanya dapat membantu dengan informasi terkait SEAMEO SPAFA.";

pub fn research_task(question: &str, domains: &DomainConfig) -> TaskSpec {
    let search_query = domains.restrict_query(question);
    let description = format!(
        r#"Search for relevant information to answer user question: "{question}"

Steps:
1. Use search tool with query: "{search_query}"
2. Focus on results from seameo-spafa.org domain
3. Collect the most relevant and accurate information
4. Ensure information comes from official SEAMEO SPAFA sources
5. If no relevant information is found, report honestly

IMPORTANT:
- ONLY use information from official SEAMEO SPAFA website
- Do not create information or use general knowledge outside SEAMEO SPAFA
- Provide source URLs for each piece of information found"#
    );

    TaskSpec::new(
        RESEARCH_TASK,
        description,
        ResearcherRole::new().role(),
        "Collection of relevant information from official SEAMEO SPAFA website with clear source URLs",
    )
}

pub fn answer_task(question: &str) -> TaskSpec {
    let description = format!(
        r#"Answer the question "{question}" with MAXIMUM 2-3 paragraphs ONLY.

REQUIRED FORMAT:
1. Direct answer (1-2 paragraphs max)
2. Source URLs from seameo-spafa.org (if available)

STRICT RULES:
- NO introductions like "Based on my research..." or "According to..."
- Get straight to the point
- If no information found: "{NOT_FOUND_FALLBACK}."
- If not SEAMEO SPAFA related: "{OFF_TOPIC_FALLBACK}"
- Include website URLs at the end if information is found"#
    );

    TaskSpec::new(
        ANSWER_TASK,
        description,
        AnswererRole::new().role(),
        "Concise answer (2-3 paragraphs max) with source URLs",
    )
}

pub fn quality_task(question: &str) -> TaskSpec {
    let description = format!(
        r#"Quick quality check for answer to: "{question}"

Check:
1. Answer is 2-3 paragraphs max?
2. No unnecessary intro/verbose text?
3. Contains source URLs if info found?
4. Uses correct "Maaf..." response if no info?

If OK: Approve answer
If not OK: Request revision"#
    );

    TaskSpec::new(
        QUALITY_TASK,
        description,
        QualityCheckerRole::new().role(),
        "Quick approval or revision request",
    )
}

/// The fixed chain: research, answer, quality check.
pub fn pipeline_tasks(question: &str, domains: &DomainConfig) -> Vec<TaskSpec> {
    vec![
        research_task(question, domains),
        answer_task(question),
        quality_task(question),
    ]
}
