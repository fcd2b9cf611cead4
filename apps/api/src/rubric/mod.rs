//! Global Talent visa fields and their endorsement rubrics.

pub mod criteria;
pub mod questionnaire;

use serde::{Deserialize, Serialize};

/// The visa field governing which rubric and questionnaire apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DigitalTechnology,
    ArtsCulture,
    ScienceResearch,
}

impl Field {
    pub const ALL: [Field; 3] = [
        Field::DigitalTechnology,
        Field::ArtsCulture,
        Field::ScienceResearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DigitalTechnology => "digital_technology",
            Field::ArtsCulture => "arts_culture",
            Field::ScienceResearch => "science_research",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Field::DigitalTechnology => "Digital Technology",
            Field::ArtsCulture => "Arts and Culture",
            Field::ScienceResearch => "Science and Research",
        }
    }

    pub fn parse(s: &str) -> Option<Field> {
        match s {
            "digital_technology" => Some(Field::DigitalTechnology),
            "arts_culture" => Some(Field::ArtsCulture),
            "science_research" => Some(Field::ScienceResearch),
            _ => None,
        }
    }
}
