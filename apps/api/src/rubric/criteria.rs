//! Per-field endorsement criteria, based on the official UK government
//! guidance for Global Talent visa endorsement requirements.
//!
//! The rubric is static data: it is embedded verbatim (as JSON) into the
//! assessment prompt so the model judges evidence against the same text
//! an applicant would read.

use serde::Serialize;

use crate::rubric::Field;

/// One evidence category (e.g. "innovation") with its qualifying examples.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceCategory {
    pub name: &'static str,
    pub examples: &'static [&'static str],
}

/// The full rubric for one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldCriteria {
    /// (document key, requirement description)
    pub mandatory_documents: &'static [(&'static str, &'static str)],
    pub evidence_categories: &'static [EvidenceCategory],
    pub assessment_focus: &'static str,
}

const COMMON_MANDATORY: &[(&str, &str)] = &[
    (
        "cv",
        "Detailed CV showing career history (5+ years for Exceptional Talent, 3+ years for Exceptional Promise)",
    ),
    (
        "recommendation_letters",
        "3 letters from senior professionals/organizations in your field",
    ),
    (
        "evidence_portfolio",
        "Up to 10 pieces of evidence from the last 5 years",
    ),
];

const DIGITAL_TECHNOLOGY: FieldCriteria = FieldCriteria {
    mandatory_documents: COMMON_MANDATORY,
    evidence_categories: &[
        EvidenceCategory {
            name: "innovation",
            examples: &[
                "Founded or held senior role in product-led digital tech company",
                "Worked in new digital field or technology",
                "Made significant technical, commercial, or entrepreneurial contributions",
            ],
        },
        EvidenceCategory {
            name: "recognition",
            examples: &[
                "Published research or technical documentation",
                "Industry awards or recognition",
                "Media coverage in tech publications",
                "Speaking engagements at prominent tech events",
                "Published open-source code with significant adoption",
                "Significant contributions to open-source projects",
            ],
        },
    ],
    assessment_focus: "Innovation in digital technology and recognition beyond immediate role",
};

const ARTS_CULTURE: FieldCriteria = FieldCriteria {
    mandatory_documents: COMMON_MANDATORY,
    evidence_categories: &[
        EvidenceCategory {
            name: "international_recognition",
            examples: &[
                "International media coverage",
                "International prizes or awards",
                "International appearances, exhibitions, or performances",
            ],
        },
        EvidenceCategory {
            name: "track_record",
            examples: &[
                "Substantial record of work in at least 2 countries (Exceptional Talent)",
                "Developing record in at least 1 country (Exceptional Promise)",
                "Work presented at major venues or platforms",
                "Critical acclaim or reviews",
            ],
        },
    ],
    assessment_focus: "International recognition and sustained artistic contribution",
};

const SCIENCE_RESEARCH: FieldCriteria = FieldCriteria {
    mandatory_documents: COMMON_MANDATORY,
    evidence_categories: &[
        EvidenceCategory {
            name: "research_output",
            examples: &[
                "Peer-reviewed publications in reputable journals",
                "Citations of your work",
                "Research grants as PI or Co-I",
                "Patents or intellectual property",
            ],
        },
        EvidenceCategory {
            name: "recognition",
            examples: &[
                "Academic appointments at leading institutions",
                "Individual fellowships",
                "Research prizes or awards",
                "Invited presentations at major conferences",
                "Editorial roles or peer review activities",
            ],
        },
    ],
    assessment_focus: "Research excellence and contribution to advancing the field",
};

/// Returns the endorsement rubric for a field.
pub fn criteria_for(field: Field) -> &'static FieldCriteria {
    match field {
        Field::DigitalTechnology => &DIGITAL_TECHNOLOGY,
        Field::ArtsCulture => &ARTS_CULTURE,
        Field::ScienceResearch => &SCIENCE_RESEARCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_share_common_mandatory_documents() {
        for field in Field::ALL {
            let criteria = criteria_for(field);
            let keys: Vec<&str> = criteria
                .mandatory_documents
                .iter()
                .map(|(key, _)| *key)
                .collect();
            assert_eq!(keys, ["cv", "recommendation_letters", "evidence_portfolio"]);
        }
    }

    #[test]
    fn test_each_field_has_two_evidence_categories() {
        for field in Field::ALL {
            assert_eq!(criteria_for(field).evidence_categories.len(), 2);
        }
    }

    #[test]
    fn test_digital_technology_focuses_on_innovation() {
        let criteria = criteria_for(Field::DigitalTechnology);
        assert_eq!(criteria.evidence_categories[0].name, "innovation");
        assert!(criteria.assessment_focus.contains("digital technology"));
    }

    #[test]
    fn test_criteria_serialize_for_prompt_embedding() {
        let json = serde_json::to_value(criteria_for(Field::ScienceResearch)).unwrap();
        assert!(json["assessment_focus"]
            .as_str()
            .unwrap()
            .contains("Research excellence"));
        assert_eq!(json["evidence_categories"][0]["name"], "research_output");
    }
}
