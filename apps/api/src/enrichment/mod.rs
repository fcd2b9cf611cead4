//! External enrichment — best-effort summaries of a candidate's public
//! footprint (GitHub, LinkedIn, portfolio website).
//!
//! Every sub-fetch is independent and failure-isolated: a source either
//! produces a fully populated summary or an explicit stub, and one source
//! failing never blocks the others. `enrich` itself cannot fail.

pub mod github;
pub mod portfolio;
pub mod urls;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use github::GithubSummary;
pub use portfolio::PortfolioSummary;

/// LinkedIn is a deliberate no-op collaborator boundary: scraping is a ToS
/// violation, so without API access the record just flags the limitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedinSummary {
    pub url: String,
    pub note: String,
}

const LINKEDIN_NOTE: &str = "Full LinkedIn analysis requires API access or manual data entry";

/// Per-source enrichment results. `None` means the source was not present
/// in the candidate's material at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentBundle {
    pub github: Option<GithubSummary>,
    pub linkedin: Option<LinkedinSummary>,
    pub portfolio: Option<PortfolioSummary>,
}

/// Collects enrichment data from profile URLs found in the CV text and an
/// optionally supplied portfolio URL.
#[derive(Clone)]
pub struct EnrichmentClient {
    http: reqwest::Client,
    github_token: Option<String>,
}

impl EnrichmentClient {
    pub fn new(github_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            github_token,
        }
    }

    /// Gathers summaries for every detectable source. Sources without a URL
    /// yield `None`; sources with a URL always yield a summary or stub.
    pub async fn enrich(&self, cv_text: &str, portfolio_url: Option<&str>) -> EnrichmentBundle {
        let profile_urls = urls::extract_profile_urls(cv_text);
        let mut bundle = EnrichmentBundle::default();

        if let Some(github_url) = &profile_urls.github {
            info!("Fetching GitHub profile data from {github_url}");
            bundle.github =
                github::fetch_summary(&self.http, self.github_token.as_deref(), github_url).await;
        }

        if let Some(linkedin_url) = &profile_urls.linkedin {
            bundle.linkedin = Some(LinkedinSummary {
                url: linkedin_url.clone(),
                note: LINKEDIN_NOTE.to_string(),
            });
        }

        if let Some(portfolio_url) = portfolio_url {
            info!("Fetching portfolio website {portfolio_url}");
            bundle.portfolio = Some(portfolio::fetch_summary(&self.http, portfolio_url).await);
        }

        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enrich_without_urls_touches_no_network() {
        let client = EnrichmentClient::new(None);
        let bundle = client.enrich("A CV with no links at all.", None).await;
        assert!(bundle.github.is_none());
        assert!(bundle.linkedin.is_none());
        assert!(bundle.portfolio.is_none());
    }

    #[tokio::test]
    async fn test_linkedin_presence_yields_stub_without_scraping() {
        let client = EnrichmentClient::new(None);
        let bundle = client
            .enrich("Find me at https://linkedin.com/in/janedoe", None)
            .await;
        let linkedin = bundle.linkedin.expect("linkedin stub expected");
        assert_eq!(linkedin.url, "https://linkedin.com/in/janedoe");
        assert!(linkedin.note.contains("requires API access"));
    }

    #[tokio::test]
    async fn test_invalid_portfolio_url_yields_stub_not_error() {
        let client = EnrichmentClient::new(None);
        let bundle = client.enrich("", Some("not-a-url")).await;
        let portfolio = bundle.portfolio.expect("portfolio stub expected");
        assert!(!portfolio.accessible);
    }

    #[test]
    fn test_bundle_serializes_missing_sources_as_null() {
        let json = serde_json::to_value(EnrichmentBundle::default()).unwrap();
        assert!(json["github"].is_null());
        assert!(json["linkedin"].is_null());
        assert!(json["portfolio"].is_null());
    }
}
