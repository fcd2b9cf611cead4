//! GitHub profile enrichment via the public REST API.
//!
//! Two unauthenticated-or-token GETs: the user profile and the first page
//! of repositories (100 per page, one page only). Any non-200 or transport
//! failure degrades to an all-zero summary — once a username resolves, a
//! summary is always produced.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

const GITHUB_API: &str = "https://api.github.com";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Aggregated public-profile signals used as open-source evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubSummary {
    pub username: String,
    pub public_repos: u32,
    pub followers: u32,
    pub total_stars: u64,
    pub total_forks: u64,
    pub languages: Vec<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GithubUser {
    #[serde(default)]
    public_repos: u32,
    #[serde(default)]
    followers: u32,
    bio: Option<String>,
    company: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubRepo {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
}

/// Extracts the username from a GitHub profile URL: the first path segment.
pub fn extract_username(github_url: &str) -> Option<String> {
    let parsed = url::Url::parse(github_url).ok()?;
    let segment = parsed.path_segments()?.find(|s| !s.is_empty())?;
    Some(segment.to_string())
}

/// Fetches and aggregates a profile summary. Returns `None` only when no
/// username can be derived from the URL.
pub async fn fetch_summary(
    http: &reqwest::Client,
    token: Option<&str>,
    github_url: &str,
) -> Option<GithubSummary> {
    let username = extract_username(github_url)?;

    let user = get_json::<GithubUser>(http, token, &format!("{GITHUB_API}/users/{username}"))
        .await
        .unwrap_or_default();
    let repos = get_json::<Vec<GithubRepo>>(
        http,
        token,
        &format!("{GITHUB_API}/users/{username}/repos?per_page=100"),
    )
    .await
    .unwrap_or_default();

    let total_stars = repos.iter().map(|r| r.stargazers_count).sum();
    let total_forks = repos.iter().map(|r| r.forks_count).sum();
    let languages: BTreeSet<String> = repos.iter().filter_map(|r| r.language.clone()).collect();

    Some(GithubSummary {
        username,
        public_repos: user.public_repos,
        followers: user.followers,
        total_stars,
        total_forks,
        languages: languages.into_iter().collect(),
        bio: user.bio,
        company: user.company,
        location: user.location,
    })
}

/// GET + deserialize; any failure collapses to `None` (empty dataset).
async fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    token: Option<&str>,
    url: &str,
) -> Option<T> {
    let mut request = http.get(url).timeout(TIMEOUT);
    if let Some(token) = token {
        request = request.header("Authorization", format!("token {token}"));
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("GitHub request to {url} failed: {e}");
            return None;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        warn!("GitHub returned {} for {url}", response.status());
        return None;
    }

    match response.json::<T>().await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("GitHub response from {url} failed to parse: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_from_profile_url() {
        assert_eq!(
            extract_username("https://github.com/janedoe").as_deref(),
            Some("janedoe")
        );
    }

    #[test]
    fn test_username_from_repo_url_takes_first_segment() {
        assert_eq!(
            extract_username("https://github.com/janedoe/some-project").as_deref(),
            Some("janedoe")
        );
    }

    #[test]
    fn test_username_with_trailing_slash() {
        assert_eq!(
            extract_username("https://github.com/janedoe/").as_deref(),
            Some("janedoe")
        );
    }

    #[test]
    fn test_bare_host_yields_no_username() {
        assert_eq!(extract_username("https://github.com"), None);
        assert_eq!(extract_username("https://github.com/"), None);
    }

    #[test]
    fn test_unparseable_url_yields_no_username() {
        assert_eq!(extract_username("not a url"), None);
    }

    #[test]
    fn test_summary_serializes_with_stable_language_order() {
        let summary = GithubSummary {
            username: "janedoe".into(),
            languages: vec!["Python".into(), "Rust".into()],
            total_stars: 1200,
            ..Default::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_stars"], 1200);
        assert_eq!(json["languages"][1], "Rust");
    }
}
