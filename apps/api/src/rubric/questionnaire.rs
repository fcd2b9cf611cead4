//! Field-specific evidence questionnaires served to the frontend.
//!
//! Answers come back as a flat `question id -> value` map; the pipeline only
//! checks presence (plus the `portfolio_url` lookup), so questions carry
//! display metadata rather than validation rules.

use serde::Serialize;

use crate::rubric::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    Number,
    YesNo,
    FileUpload,
    FileUploadMultiple,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub question: &'static str,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_types: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_files: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_files: Option<u32>,
}

impl Question {
    const fn new(id: &'static str, question: &'static str, kind: QuestionKind, required: bool) -> Self {
        Question {
            id,
            question,
            kind,
            required,
            help_text: None,
            file_types: None,
            min_files: None,
            max_files: None,
        }
    }

    const fn with_help(mut self, help_text: &'static str) -> Self {
        self.help_text = Some(help_text);
        self
    }
}

const DOCUMENT_TYPES: &[&str] = &["pdf", "docx"];

const COMMON: &[Question] = &[
    Question::new(
        "years_experience",
        "How many years of professional experience do you have in your field?",
        QuestionKind::Number,
        true,
    ),
    Question {
        id: "cv_uploaded",
        question: "Upload your CV/Resume (PDF or DOCX format)",
        kind: QuestionKind::FileUpload,
        required: true,
        help_text: None,
        file_types: Some(DOCUMENT_TYPES),
        min_files: None,
        max_files: None,
    },
    Question {
        id: "recommendation_letters",
        question: "Upload up to 3 recommendation letters (PDF or DOCX format)",
        kind: QuestionKind::FileUploadMultiple,
        required: true,
        help_text: None,
        file_types: Some(DOCUMENT_TYPES),
        min_files: Some(3),
        max_files: Some(3),
    },
];

const DIGITAL_TECHNOLOGY: &[Question] = &[
    Question::new(
        "github_url",
        "GitHub profile URL (if applicable)",
        QuestionKind::Text,
        false,
    ),
    Question::new(
        "portfolio_url",
        "Portfolio or personal website URL",
        QuestionKind::Text,
        true,
    )
    .with_help("Your portfolio website showcasing your projects, work, and achievements"),
    Question::new(
        "has_founded_company",
        "Have you founded or held a senior role in a product-led digital technology company?",
        QuestionKind::YesNo,
        true,
    ),
    Question::new(
        "publications",
        "Number of technical publications, research papers, or significant blog posts",
        QuestionKind::Number,
        true,
    ),
    Question::new(
        "speaking_engagements",
        "Have you spoken at prominent tech conferences or events?",
        QuestionKind::YesNo,
        true,
    ),
    Question::new(
        "awards",
        "List any industry awards or recognition you have received",
        QuestionKind::Text,
        false,
    ),
    Question::new(
        "open_source",
        "Do you have significant open-source contributions? (provide GitHub stars/forks if applicable)",
        QuestionKind::Text,
        false,
    ),
];

const ARTS_CULTURE: &[Question] = &[
    Question::new(
        "portfolio_url",
        "Portfolio, exhibition website, or online gallery URL",
        QuestionKind::Text,
        true,
    )
    .with_help("Website showcasing your artistic work, exhibitions, or performances"),
    Question::new(
        "countries_worked",
        "How many countries have you worked or exhibited in?",
        QuestionKind::Number,
        true,
    ),
    Question::new(
        "international_prizes",
        "List any international prizes or awards",
        QuestionKind::Text,
        false,
    ),
    Question::new(
        "media_coverage",
        "Have you received international media coverage?",
        QuestionKind::YesNo,
        true,
    ),
    Question::new(
        "major_venues",
        "List major venues or platforms where your work has been presented",
        QuestionKind::Text,
        false,
    ),
];

const SCIENCE_RESEARCH: &[Question] = &[
    Question::new(
        "portfolio_url",
        "Academic or research profile URL (e.g., personal website, Google Scholar, ResearchGate)",
        QuestionKind::Text,
        false,
    )
    .with_help("Link to your academic profile or personal research website"),
    Question::new(
        "peer_reviewed_pubs",
        "Number of peer-reviewed publications",
        QuestionKind::Number,
        true,
    ),
    Question::new(
        "citations",
        "Approximate number of citations of your work",
        QuestionKind::Number,
        false,
    ),
    Question::new(
        "research_grants",
        "Have you been PI or Co-I on research grants?",
        QuestionKind::YesNo,
        true,
    ),
    Question::new(
        "academic_position",
        "Do you hold an academic position at a leading institution?",
        QuestionKind::YesNo,
        true,
    ),
    Question::new(
        "fellowships",
        "List any individual fellowships or research prizes",
        QuestionKind::Text,
        false,
    ),
];

/// Returns the common questions followed by the field-specific ones.
pub fn questionnaire_for(field: Field) -> Vec<Question> {
    let specific = match field {
        Field::DigitalTechnology => DIGITAL_TECHNOLOGY,
        Field::ArtsCulture => ARTS_CULTURE,
        Field::ScienceResearch => SCIENCE_RESEARCH,
    };
    COMMON.iter().chain(specific.iter()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(field: Field) -> Vec<&'static str> {
        questionnaire_for(field).iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_common_questions_lead_every_field() {
        for field in Field::ALL {
            let ids = ids(field);
            assert_eq!(
                &ids[..3],
                &["years_experience", "cv_uploaded", "recommendation_letters"]
            );
        }
    }

    #[test]
    fn test_digital_technology_asks_for_github_and_portfolio() {
        let ids = ids(Field::DigitalTechnology);
        assert!(ids.contains(&"github_url"));
        assert!(ids.contains(&"portfolio_url"));
        assert!(ids.contains(&"has_founded_company"));
        assert!(ids.contains(&"publications"));
    }

    #[test]
    fn test_arts_culture_asks_about_countries_and_media() {
        let ids = ids(Field::ArtsCulture);
        assert!(ids.contains(&"countries_worked"));
        assert!(ids.contains(&"media_coverage"));
        assert!(!ids.contains(&"github_url"));
    }

    #[test]
    fn test_science_portfolio_url_is_optional() {
        let questions = questionnaire_for(Field::ScienceResearch);
        let portfolio = questions.iter().find(|q| q.id == "portfolio_url").unwrap();
        assert!(!portfolio.required);
        assert!(ids(Field::ScienceResearch).contains(&"peer_reviewed_pubs"));
    }

    #[test]
    fn test_recommendation_letters_require_exactly_three_files() {
        let questions = questionnaire_for(Field::DigitalTechnology);
        let letters = questions
            .iter()
            .find(|q| q.id == "recommendation_letters")
            .unwrap();
        assert_eq!(letters.min_files, Some(3));
        assert_eq!(letters.max_files, Some(3));
        assert_eq!(letters.file_types, Some(DOCUMENT_TYPES));
    }

    #[test]
    fn test_question_serialization_skips_absent_metadata() {
        let json = serde_json::to_value(&questionnaire_for(Field::ArtsCulture)[0]).unwrap();
        assert_eq!(json["type"], "number");
        assert!(json.get("help_text").is_none());
        assert!(json.get("min_files").is_none());
    }
}
