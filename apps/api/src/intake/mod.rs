//! Document intake — text extraction and filename-based classification.
//!
//! Documents are classified lazily at analysis time, not at upload time:
//! the classifier re-reads whatever is on disk for the session, so a
//! re-analysis sees exactly the current document set.

pub mod classify;
pub mod extract;

pub use classify::{classify_documents, ClassifiedDocuments, Document, DocumentKind};
