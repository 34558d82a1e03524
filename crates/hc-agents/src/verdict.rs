use std::fmt;

use serde::Serialize;

/// The quality checker's judgement of an answer. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityVerdict {
    Approved,
    RevisionRequested,
    Unclear,
}

/// Leading keywords that settle the verdict outright. Checked in order.
const LEADING_VERDICTS: &[(&str, QualityVerdict)] = &[
    ("not approved", QualityVerdict::RevisionRequested),
    ("request revision", QualityVerdict::RevisionRequested),
    ("revision requested", QualityVerdict::RevisionRequested),
    ("revise", QualityVerdict::RevisionRequested),
    ("approved", QualityVerdict::Approved),
    ("approve", QualityVerdict::Approved),
    ("lgtm", QualityVerdict::Approved),
];

const REVISION_MARKERS: &[&str] = &[
    "request revision",
    "revision request",
    "needs revision",
    "revision required",
    "not approved",
    "not ok",
];

const APPROVAL_MARKERS: &[&str] = &["approve", "approved", "lgtm", "looks good"];

impl QualityVerdict {
    /// Judge the checker's reply by its opening keyword, falling back to a
    /// scan of the whole text when it opens with something else.
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        let lead = lower.trim_start_matches(|c: char| !c.is_alphanumeric());

        for (keyword, verdict) in LEADING_VERDICTS {
            if let Some(rest) = lead.strip_prefix(keyword) {
                if !rest.starts_with(|c: char| c.is_alphanumeric()) {
                    return *verdict;
                }
            }
        }

        if REVISION_MARKERS.iter().any(|m| lower.contains(m)) {
            QualityVerdict::RevisionRequested
        } else if APPROVAL_MARKERS.iter().any(|m| lower.contains(m)) {
            QualityVerdict::Approved
        } else {
            QualityVerdict::Unclear
        }
    }
}

impl fmt::Display for QualityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityVerdict::Approved => write!(f, "approved"),
            QualityVerdict::RevisionRequested => write!(f, "revision_requested"),
            QualityVerdict::Unclear => write!(f, "unclear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(QualityVerdict::parse("APPROVED. Concise with sources."), QualityVerdict::Approved);
        assert_eq!(QualityVerdict::parse("No revision needed, approved"), QualityVerdict::Approved);
        assert_eq!(
            QualityVerdict::parse("REVISE: the answer has five paragraphs"),
            QualityVerdict::RevisionRequested
        );
        assert_eq!(QualityVerdict::parse("Not approved, too long"), QualityVerdict::RevisionRequested);
        assert_eq!(QualityVerdict::parse("Hmm."), QualityVerdict::Unclear);
    }

    #[test]
    fn test_parse_leading_keyword_wins() {
        assert_eq!(
            QualityVerdict::parse("Approved. No need to revise; it is concise and has URLs."),
            QualityVerdict::Approved
        );
        assert_eq!(
            QualityVerdict::parse("**APPROVE**\nThe answer needs revision only if URLs change."),
            QualityVerdict::Approved
        );
        assert_eq!(
            QualityVerdict::parse("Revise: the answer looks good but has no source URL."),
            QualityVerdict::RevisionRequested
        );
        assert_eq!(
            QualityVerdict::parse("Request revision. Approve once shortened."),
            QualityVerdict::RevisionRequested
        );
    }

    #[test]
    fn test_parse_fallback_ignores_revised() {
        assert_eq!(
            QualityVerdict::parse("The draft was revised and is approved."),
            QualityVerdict::Approved
        );
        assert_eq!(
            QualityVerdict::parse("Overall this needs revision before it is approved."),
            QualityVerdict::RevisionRequested
        );
        assert_eq!(QualityVerdict::parse("Revised wording, all fine."), QualityVerdict::Unclear);
    }
}
