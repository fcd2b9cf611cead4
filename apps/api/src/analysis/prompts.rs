//! Prompt templates and builders for the two LLM calls of the pipeline.
//!
//! Document excerpts are head-truncated at fixed caps — no smart
//! excerpting — so prompt size stays bounded regardless of upload size.

use serde_json::{Map, Value};

use crate::enrichment::EnrichmentBundle;
use crate::intake::ClassifiedDocuments;
use crate::rubric::{criteria, Field};

/// Per-section excerpt caps, in characters from the start of the text.
pub const CV_EXCERPT_CHARS: usize = 3000;
pub const LETTER_EXCERPT_CHARS: usize = 1000;
pub const PORTFOLIO_ITEM_EXCERPT_CHARS: usize = 800;
pub const WEBSITE_EXCERPT_CHARS: usize = 2500;

/// System prompt for the assessment call — enforces JSON-only output.
pub const ASSESSMENT_SYSTEM: &str =
    "You are an expert UK immigration advisor specializing in the Global Talent visa. \
    You evaluate candidate evidence against the official endorsement criteria. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Assessment prompt template.
/// Replace: {field_name}, {criteria_json}, {cv_excerpt}, {letters_count},
///          {letters_section}, {portfolio_count}, {portfolio_section},
///          {questionnaire_json}, {external_section}
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Evaluate this candidate's evidence for the {field_name} field of the UK Global Talent visa.

OFFICIAL VISA CRITERIA:
{criteria_json}

CANDIDATE EVIDENCE:

1. CV/Resume:
{cv_excerpt}

2. Recommendation Letters ({letters_count} provided, 3 required):
{letters_section}

3. Portfolio Evidence ({portfolio_count} items provided, up to 10 allowed):
{portfolio_section}

4. Questionnaire Responses:
{questionnaire_json}
{external_section}

YOUR TASK:
Evaluate the application against the official criteria above. Respond with a JSON object of this EXACT structure:

{
    "likelihood": <float between 0.0 and 1.0>,
    "assessment_level": "<Exceptional Talent or Exceptional Promise>",
    "evidence_present": {
        "mandatory_documents": {
            "cv": "<complete, incomplete, or missing>",
            "recommendation_letters": "<complete (3 letters), incomplete (fewer than 3), or missing>",
            "portfolio_evidence": "<strong, adequate, or weak>"
        },
        "innovation_evidence": ["<identified innovation evidence, one string per item>"],
        "recognition_evidence": ["<identified recognition evidence, one string per item>"]
    },
    "portfolio_summary": {
        "accessible": <true or false — was the portfolio website successfully accessed>,
        "url": "<portfolio URL if provided>",
        "key_findings": ["<3-5 specific projects, tools, or achievements found on the portfolio>"],
        "strengths_from_portfolio": "<paragraph describing strengths evident from the portfolio>",
        "gaps_from_portfolio": "<paragraph describing what the portfolio fails to demonstrate>"
    },
    "cv_feedback": {
        "score": <integer 0-10 representing CV quality for this visa>,
        "strengths": ["<4-6 detailed, specific strengths with examples from the CV>"],
        "weaknesses": ["<4-6 detailed, specific weaknesses with examples>"],
        "improvement_recommendations": ["<3-5 actionable recommendations to improve the CV>"]
    },
    "gaps": [
        {
            "type": "<gap type>",
            "severity": "<critical, high, medium, or low>",
            "description": "<2-3 sentence description of what is missing>",
            "recommendation": "<detailed, specific action to address this gap>"
        }
    ],
    "strengths": ["<5-7 key strengths citing specific CV/portfolio evidence>"],
    "overall_assessment": "<3-4 paragraph assessment explaining the likelihood score, key strengths, main concerns, and overall recommendation>",
    "next_steps": ["<5-8 prioritized, actionable recommendations>"]
}

HARD RULES:
1. Be specific: names, numbers, dates, and concrete examples. NEVER generic phrases like "good experience" or "strong background".
2. Cross-reference ALL sources (CV, portfolio, GitHub, letters); point out consistencies and discrepancies explicitly.
3. If the portfolio website was not accessible, state that in portfolio_summary and assess from the remaining evidence.
4. Likelihood and severities must reflect the official criteria above, not generic career advice.
5. Every list item must be a plain string, not a nested object, except in "gaps"."#;

/// System prompt for the roadmap call.
pub const ROADMAP_SYSTEM: &str =
    "You are an expert UK immigration advisor creating actionable preparation plans. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Roadmap prompt template.
/// Replace: {field_name}, {likelihood}, {strengths_json}, {gaps_json},
///          {next_steps_json}, {timeline_weeks}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a detailed, actionable roadmap to strengthen a UK Global Talent visa application in the {field_name} field.

CURRENT ASSESSMENT:
- Likelihood: {likelihood}
- Strengths: {strengths_json}
- Gaps: {gaps_json}
- Suggested next steps: {next_steps_json}

AVAILABLE TIME: {timeline_weeks} weeks

Create a roadmap with specific, achievable milestones. Respond with a JSON object of this EXACT structure:

{
    "milestones": [
        {
            "title": "<milestone title>",
            "description": "<detailed actions>",
            "duration_weeks": <number>,
            "priority": "<critical, high, medium, or low>",
            "evidence_to_collect": ["<specific evidence item>"],
            "addresses_gaps": ["<gap type>"]
        }
    ],
    "total_weeks": <total duration>,
    "feasibility_assessment": "<assessment of whether the timeline is realistic>",
    "critical_path": ["<must-do items in order>"]
}"#;

/// Head-truncates to at most `max_chars` characters, on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Assembles the single structured assessment prompt from all evidence.
pub fn build_assessment_prompt(
    field: Field,
    documents: &ClassifiedDocuments,
    responses: &Map<String, Value>,
    external: &EnrichmentBundle,
) -> String {
    let criteria_json = to_pretty_json(criteria::criteria_for(field));

    let cv_excerpt = documents
        .cv
        .as_ref()
        .map(|cv| excerpt(&cv.text, CV_EXCERPT_CHARS).to_string())
        .unwrap_or_else(|| "NOT PROVIDED".to_string());

    let letters_section = if documents.letters.is_empty() {
        "NOT PROVIDED".to_string()
    } else {
        documents
            .letters
            .iter()
            .enumerate()
            .map(|(i, letter)| {
                format!(
                    "Letter {}: {}",
                    i + 1,
                    excerpt(&letter.text, LETTER_EXCERPT_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let portfolio_section = if documents.portfolio.is_empty() {
        "NOT PROVIDED".to_string()
    } else {
        documents
            .portfolio
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "Item {} ({}): {}",
                    i + 1,
                    item.filename,
                    excerpt(&item.text, PORTFOLIO_ITEM_EXCERPT_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let external_section = build_external_section(external);

    ASSESSMENT_PROMPT_TEMPLATE
        .replace("{field_name}", field.display_name())
        .replace("{criteria_json}", &criteria_json)
        .replace("{cv_excerpt}", &cv_excerpt)
        .replace("{letters_count}", &documents.letters.len().to_string())
        .replace("{letters_section}", &letters_section)
        .replace("{portfolio_count}", &documents.portfolio.len().to_string())
        .replace("{portfolio_section}", &portfolio_section)
        .replace("{questionnaire_json}", &to_pretty_json(responses))
        .replace("{external_section}", &external_section)
}

/// GitHub data and portfolio-website text are appended only when present,
/// mirroring the numbered evidence sections.
fn build_external_section(external: &EnrichmentBundle) -> String {
    let mut section = String::new();

    if let Some(github) = &external.github {
        section.push_str(&format!(
            "\n5. GitHub Profile Data:\n{}\n",
            to_pretty_json(github)
        ));
    }

    if let Some(portfolio) = &external.portfolio {
        if portfolio.accessible {
            section.push_str(&format!(
                "\n6. Portfolio Website:\nURL: {}\nContent Preview:\n{}\n",
                portfolio.url,
                excerpt(
                    portfolio.content.as_deref().unwrap_or("No content extracted"),
                    WEBSITE_EXCERPT_CHARS
                )
            ));
        } else {
            section.push_str(&format!(
                "\n6. Portfolio Website:\nURL: {}\nNote: Portfolio could not be accessed - {}\n",
                portfolio.url,
                portfolio.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    section
}

/// Assembles the roadmap prompt from the assessment's findings.
pub fn build_roadmap_prompt(
    field: Field,
    assessment: &crate::analysis::models::Assessment,
    timeline_weeks: u32,
) -> String {
    ROADMAP_PROMPT_TEMPLATE
        .replace("{field_name}", field.display_name())
        .replace("{likelihood}", &assessment.likelihood.to_string())
        .replace("{strengths_json}", &to_pretty_json(&assessment.strengths))
        .replace("{gaps_json}", &to_pretty_json(&assessment.gaps))
        .replace("{next_steps_json}", &to_pretty_json(&assessment.next_steps))
        .replace("{timeline_weeks}", &timeline_weeks.to_string())
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{Document, DocumentKind};
    use std::path::PathBuf;

    fn doc(filename: &str, text: &str, kind: DocumentKind) -> Document {
        Document {
            filename: filename.to_string(),
            path: PathBuf::from(filename),
            text: text.to_string(),
            kind,
        }
    }

    fn responses(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_excerpt_truncates_on_exact_boundary() {
        let text = "a".repeat(3001);
        assert_eq!(excerpt(&text, 3000).len(), 3000);
    }

    #[test]
    fn test_excerpt_leaves_short_text_untouched() {
        assert_eq!(excerpt("short", 3000), "short");
    }

    #[test]
    fn test_excerpt_respects_multibyte_boundaries() {
        let text = "é".repeat(10);
        let cut = excerpt(&text, 4);
        assert_eq!(cut.chars().count(), 4);
        assert_eq!(cut, "éééé");
    }

    #[test]
    fn test_assessment_prompt_embeds_rubric_and_counts() {
        let documents = crate::intake::ClassifiedDocuments {
            cv: Some(doc("cv.pdf", "Ten years in Rust.", DocumentKind::Cv)),
            letters: vec![doc(
                "letter.pdf",
                "I recommend Jane.",
                DocumentKind::RecommendationLetter,
            )],
            portfolio: vec![],
        };
        let prompt = build_assessment_prompt(
            Field::DigitalTechnology,
            &documents,
            &responses(&[("years_experience", serde_json::json!(10))]),
            &EnrichmentBundle::default(),
        );

        assert!(prompt.contains("Digital Technology"));
        assert!(prompt.contains("Ten years in Rust."));
        assert!(prompt.contains("1 provided, 3 required"));
        assert!(prompt.contains("0 items provided, up to 10 allowed"));
        assert!(prompt.contains("years_experience"));
        assert!(prompt.contains("assessment_focus"));
        // No enrichment data: the external sections must be absent entirely.
        assert!(!prompt.contains("GitHub Profile Data"));
        assert!(!prompt.contains("Portfolio Website"));
    }

    #[test]
    fn test_missing_cv_renders_not_provided() {
        let prompt = build_assessment_prompt(
            Field::ArtsCulture,
            &crate::intake::ClassifiedDocuments::default(),
            &responses(&[("countries_worked", serde_json::json!(3))]),
            &EnrichmentBundle::default(),
        );
        assert!(prompt.contains("1. CV/Resume:\nNOT PROVIDED"));
    }

    #[test]
    fn test_inaccessible_portfolio_renders_error_note() {
        let external = EnrichmentBundle {
            portfolio: Some(crate::enrichment::PortfolioSummary::inaccessible(
                "https://janedoe.dev",
                "timed out",
            )),
            ..Default::default()
        };
        let prompt = build_assessment_prompt(
            Field::DigitalTechnology,
            &crate::intake::ClassifiedDocuments::default(),
            &responses(&[("publications", serde_json::json!(2))]),
            &external,
        );
        assert!(prompt.contains("Portfolio could not be accessed - timed out"));
    }

    #[test]
    fn test_roadmap_prompt_embeds_assessment_findings() {
        let mut assessment = crate::analysis::models::Assessment::degraded("x");
        assessment.likelihood = 0.4;
        assessment.gaps[0].gap_type = "recognition".to_string();
        assessment.strengths = vec!["Open-source maintainer".to_string()];
        assessment.next_steps = vec!["Speak at a conference".to_string()];

        let prompt = build_roadmap_prompt(Field::DigitalTechnology, &assessment, 40);
        assert!(prompt.contains("AVAILABLE TIME: 40 weeks"));
        assert!(prompt.contains("Open-source maintainer"));
        assert!(prompt.contains("recognition"));
        assert!(prompt.contains("Speak at a conference"));
    }
}
