//! Assessment orchestrator — runs one application through the full pipeline.
//!
//! Flow: preconditions → classify documents → external enrichment →
//!       assessment LLM call → roadmap LLM call → combined report.
//!
//! One invocation is one sequential unit of work: no internal parallelism,
//! exactly one attempt per external call, no retry. The orchestrator holds
//! no session state — it receives everything it needs and returns a report
//! for the caller to merge back into the store.
//!
//! Failure policy: precondition violations error out before any external
//! spend; everything after that degrades instead of failing, so callers
//! always receive a complete, schema-conformant report.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::analysis::models::{
    AnalysisReport, Assessment, DocumentCounts, ExternalDataPresence, Roadmap,
};
use crate::analysis::prompts::{
    build_assessment_prompt, build_roadmap_prompt, ASSESSMENT_SYSTEM, ROADMAP_SYSTEM,
};
use crate::enrichment::{EnrichmentBundle, EnrichmentClient};
use crate::errors::AppError;
use crate::intake::{classify_documents, ClassifiedDocuments};
use crate::llm_client::{strip_json_fences, ChatModel};
use crate::rubric::Field;

/// Time budget handed to the roadmap call when the caller does not supply one.
pub const DEFAULT_TIMELINE_WEEKS: u32 = 40;

/// Runs the complete analysis pipeline for one application.
pub async fn analyze_application(
    llm: &dyn ChatModel,
    enrichment: &EnrichmentClient,
    field: Field,
    document_paths: &[PathBuf],
    responses: &Map<String, Value>,
) -> Result<AnalysisReport, AppError> {
    // Preconditions come before any external call, to avoid wasted LLM spend.
    if document_paths.is_empty() {
        return Err(AppError::Precondition("No documents uploaded".to_string()));
    }
    if responses.is_empty() {
        return Err(AppError::Precondition(
            "Questionnaire not completed".to_string(),
        ));
    }

    info!(
        "Analyzing {} application with {} documents",
        field.as_str(),
        document_paths.len()
    );

    // Step 1: classify and extract documents.
    let documents = classify_documents(document_paths);

    // Step 2: enrichment from CV-embedded profile URLs and the
    // questionnaire's portfolio_url (field-specific; may be absent).
    let cv_text = documents.cv.as_ref().map(|d| d.text.as_str()).unwrap_or("");
    let portfolio_url = responses
        .get("portfolio_url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty());
    let external = enrichment.enrich(cv_text, portfolio_url).await;

    // Steps 3-5: assessment call, degraded on any failure.
    let assessment = run_assessment(llm, field, &documents, responses, &external).await;

    // Step 6: roadmap call, only when the assessment itself is usable.
    let roadmap = if assessment.is_degraded() {
        Roadmap::degraded("assessment unavailable, no roadmap generated")
    } else {
        generate_roadmap(llm, field, &assessment, DEFAULT_TIMELINE_WEEKS).await
    };

    // Step 7: the combined unit the store persists.
    Ok(AnalysisReport {
        field,
        timestamp: Utc::now(),
        documents_analyzed: DocumentCounts {
            cv: documents.cv.is_some(),
            recommendation_letters_count: documents.letters.len(),
            portfolio_items_count: documents.portfolio.len(),
        },
        external_data: ExternalDataPresence {
            github: external.github.is_some(),
            linkedin: external.linkedin.is_some(),
            portfolio: external.portfolio.is_some(),
        },
        analysis: assessment,
        roadmap,
    })
}

/// Single assessment attempt. Provider errors and malformed or
/// non-conforming responses all collapse to `Assessment::degraded`.
async fn run_assessment(
    llm: &dyn ChatModel,
    field: Field,
    documents: &ClassifiedDocuments,
    responses: &Map<String, Value>,
    external: &EnrichmentBundle,
) -> Assessment {
    let prompt = build_assessment_prompt(field, documents, responses, external);

    let raw = match llm.complete(&prompt, ASSESSMENT_SYSTEM).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Assessment LLM call failed: {e}");
            return Assessment::degraded(&e.to_string());
        }
    };

    match serde_json::from_str::<Assessment>(strip_json_fences(&raw)) {
        Ok(assessment) => assessment,
        Err(e) => {
            warn!("Assessment response did not match schema: {e}");
            Assessment::degraded(&format!("response did not match schema: {e}"))
        }
    }
}

/// Single roadmap attempt with the same fence-strip and degrade policy.
async fn generate_roadmap(
    llm: &dyn ChatModel,
    field: Field,
    assessment: &Assessment,
    timeline_weeks: u32,
) -> Roadmap {
    let prompt = build_roadmap_prompt(field, assessment, timeline_weeks);

    let raw = match llm.complete(&prompt, ROADMAP_SYSTEM).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Roadmap LLM call failed: {e}");
            return Roadmap::degraded(&e.to_string());
        }
    };

    match serde_json::from_str::<Roadmap>(strip_json_fences(&raw)) {
        Ok(roadmap) => roadmap,
        Err(e) => {
            warn!("Roadmap response did not match schema: {e}");
            Roadmap::degraded(&format!("response did not match schema: {e}"))
        }
    }
}
