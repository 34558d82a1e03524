//! Allowed search domains.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hc_core::Error;

/// Default location of the domain file, relative to the working directory.
pub const DEFAULT_DOMAINS_FILE: &str = "seameo_urls.json";

/// The set of domains search results are restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub search_domains: Vec<String>,
}

impl DomainConfig {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the domain file. An empty domain list is rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read domain file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_json(&content)
            .map_err(|e| Error::config(format!("{} ({})", e, path.display())))?;
        debug!(path = %path.display(), domains = config.search_domains.len(), "Loaded domain config");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, Error> {
        let config: DomainConfig = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Invalid domain file: {}", e)))?;
        if config.search_domains.iter().all(|d| d.trim().is_empty()) {
            return Err(Error::config("Domain file lists no search_domains"));
        }
        Ok(config)
    }

    /// `(site:a OR site:b)`, or `None` when no domains are configured.
    pub fn site_filter(&self) -> Option<String> {
        let clauses: Vec<String> = self
            .search_domains
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(|d| format!("site:{}", d))
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(format!("({})", clauses.join(" OR ")))
        }
    }

    /// Prefix the question with the site filter.
    pub fn restrict_query(&self, question: &str) -> String {
        match self.site_filter() {
            Some(filter) => format!("{} {}", filter, question),
            None => question.to_string(),
        }
    }
}
