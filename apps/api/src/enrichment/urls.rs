//! Profile URL detection in extracted CV text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic URL matcher; deliberately loose, since CV text extraction mangles
/// punctuation around links.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("URL regex must compile")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUrls {
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

/// Scans text for the first GitHub and first LinkedIn URL.
/// Absence of a match is a `None`, not an error.
pub fn extract_profile_urls(text: &str) -> ProfileUrls {
    let mut urls = ProfileUrls::default();

    for candidate in URL_RE.find_iter(text) {
        let url = candidate.as_str();
        let lowered = url.to_lowercase();
        if urls.github.is_none() && lowered.contains("github.com") {
            urls.github = Some(url.to_string());
        } else if urls.linkedin.is_none() && lowered.contains("linkedin.com") {
            urls.linkedin = Some(url.to_string());
        }
        if urls.github.is_some() && urls.linkedin.is_some() {
            break;
        }
    }

    urls
}
