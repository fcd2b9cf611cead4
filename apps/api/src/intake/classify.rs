//! Filename-based document classification.
//!
//! Classification is a ranked list of keyword rules evaluated in order, so
//! the heuristic can later be swapped for content-based classification
//! without changing the pipeline contract. Anything no rule claims is a
//! portfolio item; the 10-item evidence cap is reported, not enforced.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::intake::extract::extract_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Cv,
    RecommendationLetter,
    PortfolioItem,
}

/// A parsed document ready for prompt assembly.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub path: PathBuf,
    pub text: String,
    pub kind: DocumentKind,
}

/// Classifier output. The CV slot holds at most one document — when several
/// filenames match the CV rule, the last one wins.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedDocuments {
    pub cv: Option<Document>,
    pub letters: Vec<Document>,
    pub portfolio: Vec<Document>,
}

/// One classification rule: filename substrings that claim a document kind.
pub struct KeywordRule {
    pub kind: DocumentKind,
    pub keywords: &'static [&'static str],
}

/// Rules are checked top to bottom against the lowercased filename;
/// the first rule with a matching keyword wins.
pub const DEFAULT_RULES: &[KeywordRule] = &[
    KeywordRule {
        kind: DocumentKind::Cv,
        keywords: &["cv", "resume"],
    },
    KeywordRule {
        kind: DocumentKind::RecommendationLetter,
        keywords: &["letter", "recommendation", "reference"],
    },
];

/// Classifies a filename against a rule list. Unmatched filenames fall
/// through to the portfolio bucket.
pub fn classify_filename(rules: &[KeywordRule], filename: &str) -> DocumentKind {
    let lowered = filename.to_lowercase();
    for rule in rules {
        if rule.keywords.iter().any(|kw| lowered.contains(kw)) {
            return rule.kind;
        }
    }
    DocumentKind::PortfolioItem
}

/// Extracts and buckets a batch of document paths.
///
/// Per-document failures degrade rather than abort: a missing file is
/// logged and skipped, and an unreadable file is classified with empty
/// text so the batch always completes.
pub fn classify_documents(paths: &[PathBuf]) -> ClassifiedDocuments {
    let mut classified = ClassifiedDocuments::default();

    for path in paths {
        if !path.exists() {
            warn!("Document not found, skipping: {}", path.display());
            continue;
        }

        let text = match extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Text extraction failed for {}: {e:#}", path.display());
                String::new()
            }
        };

        let filename = file_name_of(path);
        let kind = classify_filename(DEFAULT_RULES, &filename);
        let document = Document {
            filename,
            path: path.clone(),
            text,
            kind,
        };

        match kind {
            DocumentKind::Cv => classified.cv = Some(document),
            DocumentKind::RecommendationLetter => classified.letters.push(document),
            DocumentKind::PortfolioItem => classified.portfolio.push(document),
        }
    }

    classified
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
