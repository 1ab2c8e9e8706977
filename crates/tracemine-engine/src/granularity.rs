use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracemine_types::{Classifier, Session};

/// Which label an action contributes to sequence and transition analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// The raw tool name
    #[default]
    Tool,
    /// The classified modality
    Modality,
}

impl Granularity {
    /// Labels of a session's actions in sequence order
    pub fn labels<'s>(&self, session: &'s Session, classifier: &Classifier) -> Vec<&'s str> {
        match self {
            Granularity::Tool => session.records.iter().map(|r| r.tool.as_str()).collect(),
            Granularity::Modality => session
                .records
                .iter()
                .map(|r| r.modality(classifier).as_str())
                .collect(),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tool" => Ok(Granularity::Tool),
            "modality" | "category" => Ok(Granularity::Modality),
            _ => Err(format!("Unknown granularity: {}", s)),
        }
    }
}
