//! Result models for the assessment pipeline.
//!
//! `Assessment` and `Roadmap` mirror the JSON schemas the LLM is instructed
//! to produce. Parse or provider failures never escape the pipeline; they
//! become the degraded shapes below, so downstream consumers always receive
//! a complete envelope. A degraded assessment is distinguishable from a
//! genuinely weak candidate only by its `analysis_error` gap type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rubric::Field;

/// Gap type used when the analysis itself failed (provider error, malformed
/// or non-conforming response).
pub const ANALYSIS_ERROR_GAP: &str = "analysis_error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// A rubric requirement the model judged unmet or weakly met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    #[serde(rename = "type")]
    pub gap_type: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Status of the three mandatory document groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandatoryDocumentStatus {
    pub cv: String,
    pub recommendation_letters: String,
    pub portfolio_evidence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidencePresence {
    pub mandatory_documents: MandatoryDocumentStatus,
    #[serde(default)]
    pub innovation_evidence: Vec<String>,
    #[serde(default)]
    pub recognition_evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvFeedback {
    pub score: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub improvement_recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReview {
    pub accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths_from_portfolio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaps_from_portfolio: Option<String>,
}

/// The LLM's structured judgement against the field rubric.
/// Immutable once produced; re-analysis supersedes, never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Endorsement likelihood in [0.0, 1.0].
    pub likelihood: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_present: Option<EvidencePresence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_summary: Option<PortfolioReview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_feedback: Option<CvFeedback>,
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub overall_assessment: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl Assessment {
    /// The fixed-shape result substituted when the LLM phase fails.
    pub fn degraded(detail: &str) -> Self {
        Assessment {
            likelihood: 0.0,
            assessment_level: None,
            evidence_present: None,
            portfolio_summary: None,
            cv_feedback: None,
            gaps: vec![Gap {
                gap_type: ANALYSIS_ERROR_GAP.to_string(),
                severity: Severity::Critical,
                description: format!("Failed to analyze: {detail}"),
                recommendation: None,
            }],
            strengths: vec![],
            overall_assessment: "Analysis failed due to technical error".to_string(),
            next_steps: vec![],
        }
    }

    /// True when this assessment is the degraded error shape rather than a
    /// real judgement. The gap type is the only discriminator.
    pub fn is_degraded(&self) -> bool {
        self.gaps.iter().any(|g| g.gap_type == ANALYSIS_ERROR_GAP)
    }
}

/// One time-boxed step of the improvement roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
    pub duration_weeks: u32,
    pub priority: Severity,
    #[serde(default)]
    pub evidence_to_collect: Vec<String>,
    #[serde(default)]
    pub addresses_gaps: Vec<String>,
}

/// LLM-generated action plan derived from the assessment's gaps.
/// On the fallback path `total_weeks` equals the (empty) milestone sum;
/// an LLM-reported total is trusted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub total_weeks: u32,
    pub feasibility_assessment: String,
    #[serde(default)]
    pub critical_path: Vec<String>,
}

impl Roadmap {
    pub fn degraded(detail: &str) -> Self {
        Roadmap {
            milestones: vec![],
            total_weeks: 0,
            feasibility_assessment: format!("Roadmap generation failed: {detail}"),
            critical_path: vec![],
        }
    }
}

/// Document counts surfaced alongside the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCounts {
    pub cv: bool,
    pub recommendation_letters_count: usize,
    pub portfolio_items_count: usize,
}

/// Which external sources contributed data to this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDataPresence {
    pub github: bool,
    pub linkedin: bool,
    pub portfolio: bool,
}

/// The unit persisted by the store and served back verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub field: Field,
    pub timestamp: DateTime<Utc>,
    pub documents_analyzed: DocumentCounts,
    pub external_data: ExternalDataPresence,
    pub analysis: Assessment,
    pub roadmap: Roadmap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_assessment_shape() {
        let assessment = Assessment::degraded("provider unavailable");
        assert_eq!(assessment.likelihood, 0.0);
        assert_eq!(assessment.gaps.len(), 1);
        assert_eq!(assessment.gaps[0].gap_type, ANALYSIS_ERROR_GAP);
        assert_eq!(assessment.gaps[0].severity, Severity::Critical);
        assert!(assessment.gaps[0].description.contains("provider unavailable"));
        assert!(assessment.is_degraded());
    }

    #[test]
    fn test_real_assessment_is_not_degraded() {
        let assessment: Assessment = serde_json::from_str(
            r#"{
                "likelihood": 0.7,
                "gaps": [{"type": "recommendation_letters", "severity": "high",
                          "description": "Only one letter provided",
                          "recommendation": "Collect two more letters"}],
                "overall_assessment": "Promising candidate"
            }"#,
        )
        .unwrap();
        assert!(!assessment.is_degraded());
        assert_eq!(assessment.gaps[0].severity, Severity::High);
    }

    #[test]
    fn test_assessment_parses_full_schema() {
        let assessment: Assessment = serde_json::from_str(
            r#"{
                "likelihood": 0.55,
                "assessment_level": "Exceptional Promise",
                "evidence_present": {
                    "mandatory_documents": {
                        "cv": "complete",
                        "recommendation_letters": "incomplete",
                        "portfolio_evidence": "adequate"
                    },
                    "innovation_evidence": ["Founded a dev-tools startup"],
                    "recognition_evidence": []
                },
                "portfolio_summary": {
                    "accessible": true,
                    "url": "https://janedoe.dev",
                    "key_findings": ["Open-source parser with 2k stars"]
                },
                "cv_feedback": {
                    "score": 6,
                    "strengths": ["Clear progression"],
                    "weaknesses": ["No metrics"],
                    "improvement_recommendations": ["Add impact numbers"]
                },
                "gaps": [],
                "strengths": ["Strong open-source footprint"],
                "overall_assessment": "Solid but thin on recognition.",
                "next_steps": ["Request third letter"]
            }"#,
        )
        .unwrap();

        let evidence = assessment.evidence_present.unwrap();
        assert_eq!(evidence.mandatory_documents.recommendation_letters, "incomplete");
        assert_eq!(assessment.cv_feedback.unwrap().score, 6);
        assert_eq!(
            assessment.assessment_level.as_deref(),
            Some("Exceptional Promise")
        );
    }

    #[test]
    fn test_schema_violation_fails_parse() {
        // likelihood is mandatory — a response without it must not parse.
        let result: Result<Assessment, _> =
            serde_json::from_str(r#"{"overall_assessment": "looks fine"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_degraded_roadmap_total_matches_empty_milestones() {
        let roadmap = Roadmap::degraded("assessment unavailable");
        assert!(roadmap.milestones.is_empty());
        assert_eq!(roadmap.total_weeks, 0);
        assert!(roadmap
            .feasibility_assessment
            .contains("assessment unavailable"));
    }

    #[test]
    fn test_milestone_priority_parses_lowercase() {
        let milestone: Milestone = serde_json::from_str(
            r#"{
                "title": "Publish two articles",
                "description": "Write for a recognized tech outlet",
                "duration_weeks": 8,
                "priority": "high",
                "evidence_to_collect": ["published article links"],
                "addresses_gaps": ["recognition"]
            }"#,
        )
        .unwrap();
        assert_eq!(milestone.priority, Severity::High);
        assert_eq!(milestone.duration_weeks, 8);
    }
}
