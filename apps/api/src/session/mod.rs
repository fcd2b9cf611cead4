//! Session lifecycle: models and the HTTP handlers for field selection,
//! document upload, and questionnaire submission.

pub mod handlers;
pub mod models;
