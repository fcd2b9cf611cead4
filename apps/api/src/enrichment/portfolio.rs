//! Portfolio website enrichment: a two-stage fetch strategy.
//!
//! Stage 1 fetches the page directly and strips it to plain text. If the
//! extraction looks like a JavaScript shell (under `MIN_USEFUL_CHARS` of
//! text, or an "enable JavaScript" marker), stage 2 retries once through a
//! rendering proxy and the longer extraction wins. Every failure mode
//! collapses to an explicit inaccessible stub — this function never errors.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const RENDER_TIMEOUT: Duration = Duration::from_secs(20);
/// Some sites refuse non-browser user agents outright.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
/// Rendering proxy that executes JavaScript and returns page text.
const RENDER_PROXY: &str = "https://r.jina.ai/";

/// Quality heuristic: below this much extracted text, assume the page
/// needs JavaScript to render.
const MIN_USEFUL_CHARS: usize = 100;
const JS_SHELL_MARKER: &str = "enable JavaScript";

/// Final text is capped for LLM context; the marker tells the model (and a
/// human reader) the cut was deliberate.
const MAX_CONTENT_CHARS: usize = 5000;
const TRUNCATION_MARKER: &str = "... [truncated]";

static SCRIPT_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
        .expect("script/style regex must compile")
});
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex must compile"));

/// Outcome of the portfolio fetch: either readable text or an explicit
/// inaccessible marker, never a partial record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub url: String,
    pub accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PortfolioSummary {
    pub(crate) fn inaccessible(url: &str, error: impl Into<String>) -> Self {
        PortfolioSummary {
            url: url.to_string(),
            accessible: false,
            content: None,
            extracted_chars: None,
            error: Some(error.into()),
        }
    }
}

/// Fetches and extracts a portfolio website.
pub async fn fetch_summary(http: &reqwest::Client, portfolio_url: &str) -> PortfolioSummary {
    if !portfolio_url.starts_with("http") {
        return PortfolioSummary::inaccessible(portfolio_url, "Invalid portfolio URL");
    }

    let response = match http
        .get(portfolio_url)
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            return PortfolioSummary::inaccessible(
                portfolio_url,
                "Portfolio website request timed out",
            );
        }
        Err(e) => {
            return PortfolioSummary::inaccessible(
                portfolio_url,
                format!("Error fetching portfolio: {e}"),
            );
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        return PortfolioSummary::inaccessible(
            portfolio_url,
            format!("Failed to fetch portfolio (Status: {})", response.status()),
        );
    }

    let html = response.text().await.unwrap_or_default();
    let mut text = html_to_text(&html);

    if needs_render_fallback(&text) {
        debug!(
            "Portfolio looks JavaScript-heavy ({} chars extracted), trying rendering proxy",
            text.chars().count()
        );
        if let Some(rendered) = fetch_rendered(http, portfolio_url).await {
            if rendered.chars().count() > text.chars().count() {
                text = rendered;
            }
        }
    }

    let (content, extracted_chars) = cap_content(text);

    PortfolioSummary {
        url: portfolio_url.to_string(),
        accessible: true,
        content: Some(content),
        extracted_chars: Some(extracted_chars),
        error: None,
    }
}

/// Caps extracted text at `MAX_CONTENT_CHARS`, returning the (possibly
/// marked) content and the pre-cap character count.
fn cap_content(text: String) -> (String, usize) {
    let extracted_chars = text.chars().count();
    if extracted_chars > MAX_CONTENT_CHARS {
        let cut: String = text.chars().take(MAX_CONTENT_CHARS).collect();
        (cut + TRUNCATION_MARKER, extracted_chars)
    } else {
        (text, extracted_chars)
    }
}

/// Stage-2 fetch through the rendering proxy. Best effort only.
async fn fetch_rendered(http: &reqwest::Client, portfolio_url: &str) -> Option<String> {
    let render_url = format!("{RENDER_PROXY}{portfolio_url}");
    let response = match http
        .get(&render_url)
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .timeout(RENDER_TIMEOUT)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!("Rendering proxy failed for {portfolio_url}: {e}");
            return None;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        warn!(
            "Rendering proxy returned {} for {portfolio_url}",
            response.status()
        );
        return None;
    }

    let body = response.text().await.ok()?;
    Some(collapse_whitespace(&body))
}

/// Decides whether the direct extraction is good enough to keep.
fn needs_render_fallback(text: &str) -> bool {
    text.chars().count() < MIN_USEFUL_CHARS || text.contains(JS_SHELL_MARKER)
}

/// Strips script/style blocks, then lets the HTML parser flatten the rest
/// to text.
fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(html, " ");
    let document = Html::parse_document(&without_scripts);
    let text: String = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").to_string()
}
