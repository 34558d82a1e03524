//! hc-tools: Search tools for the help center assistant
//!
//! This crate provides:
//! - Domain config: the set of sites answers may be sourced from
//! - Search: the hosted search provider (Serper)
//! - Web: the `web_search` tool exposed to agents

pub mod domain;
pub mod search;
pub mod web;

pub use domain::{DomainConfig, DEFAULT_DOMAINS_FILE};
pub use search::{SearchProvider, SearchResult, SerperClient, DEFAULT_NUM_RESULTS};
pub use web::{create_search_tools_arc, WebSearchTool, WEB_SEARCH_TOOL};
