//! Hosted web search.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hc_core::Error;

const DEFAULT_SERPER_URL: &str = "https://google.serper.dev";

/// Default number of results requested per query.
pub const DEFAULT_NUM_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub position: u32,
}

/// A web search backend: query string in, top results out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Error>;
}

/// Client for the Serper Google search API.
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
    num_results: usize,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("hc/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: DEFAULT_SERPER_URL.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_num_results(mut self, n: usize) -> Self {
        self.num_results = n;
        self
    }

    pub fn num_results(&self) -> usize {
        self.num_results
    }
}

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    position: Option<u32>,
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Error> {
        debug!(query = %query, num = self.num_results, "Serper search");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest {
                q: query,
                num: self.num_results,
            })
            .send()
            .await
            .map_err(|e| Error::network(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => Error::auth(format!("Search API rejected the key: {}", body)),
                429 => Error::rate_limit(body),
                code => Error::api(code, format!("Search API error: {}", body)),
            });
        }

        let data: SerperResponse = response
            .json()
            .await
            .map_err(|e| Error::serialization(format!("Failed to parse search response: {}", e)))?;

        let results: Vec<SearchResult> = data
            .organic
            .into_iter()
            .take(self.num_results)
            .enumerate()
            .map(|(i, item)| SearchResult {
                title: item.title,
                url: item.link,
                snippet: item.snippet,
                position: item.position.unwrap_or(i as u32 + 1),
            })
            .collect();

        debug!(results = results.len(), "Serper search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_reads_organic_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "serper-key"))
            .and(body_json(serde_json::json!({"q": "(site:seameo-spafa.org) programs", "num": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "searchParameters": {"q": "(site:seameo-spafa.org) programs"},
                "organic": [
                    {
                        "title": "Programmes",
                        "link": "https://www.seameo-spafa.org/programmes/",
                        "snippet": "Training and research programmes.",
                        "position": 1
                    },
                    {
                        "title": "About",
                        "link": "https://www.seameo-spafa.org/about/"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = SerperClient::new("serper-key").with_base_url(server.uri());
        let results = client.search("(site:seameo-spafa.org) programs").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://www.seameo-spafa.org/programmes/");
        assert_eq!(results[0].snippet, "Training and research programmes.");
        assert_eq!(results[1].position, 2);
        assert!(results[1].snippet.is_empty());
    }

    #[tokio::test]
    async fn test_missing_organic_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = SerperClient::new("k").with_base_url(server.uri()).with_num_results(3);
        assert!(client.search("nothing").await.unwrap().is_empty());
        assert_eq!(client.num_results(), 3);
    }

    #[tokio::test]
    async fn test_http_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized."))
            .mount(&server)
            .await;

        let client = SerperClient::new("bad").with_base_url(server.uri());
        let err = client.search("q").await.unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = SerperClient::new("k").with_base_url("http://127.0.0.1:1");
        let err = client.search("q").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
