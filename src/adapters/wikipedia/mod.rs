//! Wikipedia adapter: Implementation of KnowledgeSource.
//!
//! Uses the REST `page/summary` endpoint of the language's subdomain, e.g.
//! `https://sw.wikipedia.org/api/rest_v1/page/summary/Malaria`. A 404 is a
//! normal miss; every other failure is reported as `KnowledgeError`.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::domain::Language;
use crate::ports::{KnowledgeError, KnowledgeSource};

/// Default endpoint template; `{lang}` is replaced by the ISO code.
pub const DEFAULT_BASE_URL: &str = "https://{lang}.wikipedia.org/api/rest_v1/page/summary/";

/// Default `User-Agent`, as required by the Wikimedia API etiquette.
pub const DEFAULT_USER_AGENT: &str = "DiagAI/1.0";

/// Response body from `page/summary`.
#[derive(Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Blocking HTTP client for Wikipedia summaries.
pub struct WikipediaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl WikipediaClient {
    /// Create a client for the given endpoint template.
    ///
    /// # Errors
    /// Returns `KnowledgeError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, KnowledgeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| KnowledgeError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Summary URL of `topic` in `language`.
    ///
    /// # Errors
    /// Returns `KnowledgeError::InvalidUrl` when the template does not yield
    /// a hierarchical URL.
    pub fn page_url(&self, topic: &str, language: Language) -> Result<Url, KnowledgeError> {
        let base = self.base_url.replace("{lang}", language.code());
        let mut url = Url::parse(&base).map_err(|e| KnowledgeError::InvalidUrl(format!("{base}: {e}")))?;

        // Page titles use underscores for spaces; the segment is percent-encoded.
        let title = topic.trim().replace(' ', "_");
        url.path_segments_mut()
            .map_err(|()| KnowledgeError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .push(&title);
        Ok(url)
    }
}

impl KnowledgeSource for WikipediaClient {
    fn summary(&self, topic: &str, language: Language) -> Result<Option<String>, KnowledgeError> {
        let url = self.page_url(topic, language)?;
        tracing::debug!("Fetching summary for '{}' ({})", topic, language.code());

        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                KnowledgeError::Transport(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                KnowledgeError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!("No '{}' page for {}", topic, language.code());
            return Ok(None);
        }
        if !status.is_success() {
            return Err(KnowledgeError::Status {
                status: status.as_u16(),
                topic: topic.to_string(),
            });
        }

        let parsed: PageSummary = response
            .json()
            .map_err(|e| KnowledgeError::Parse(e.to_string()))?;

        let extract = parsed.extract.trim();
        if extract.is_empty() {
            Ok(None)
        } else {
            Ok(Some(extract.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WikipediaClient {
        WikipediaClient::new(DEFAULT_BASE_URL, DEFAULT_USER_AGENT, 5).expect("client")
    }

    #[test]
    fn test_page_url_per_language() {
        let c = client();
        assert_eq!(
            c.page_url("malaria", Language::English).expect("url").as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/malaria"
        );
        assert_eq!(
            c.page_url("Malaria", Language::Swahili).expect("url").as_str(),
            "https://sw.wikipedia.org/api/rest_v1/page/summary/Malaria"
        );
    }

    #[test]
    fn test_page_url_escapes_title() {
        let url = client()
            .page_url(" yellow fever/virus ", Language::English)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/yellow_fever%2Fvirus"
        );
    }

    #[test]
    fn test_invalid_template() {
        let c = WikipediaClient::new("not a url", DEFAULT_USER_AGENT, 5).expect("client");
        assert!(matches!(
            c.page_url("malaria", Language::English),
            Err(KnowledgeError::InvalidUrl(_))
        ));
    }
}
