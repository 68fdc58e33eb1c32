//! Operator-selectable behaviours that have no single right answer

use serde::{Deserialize, Serialize};

/// Accepted range for the patient age entered in the intake wizard.
///
/// Zero is rejected under every policy: the backend treats a zero age as
/// a missing field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgePolicy {
    #[default]
    #[serde(rename = "zero_to_120")]
    ZeroTo120,
    #[serde(rename = "one_to_100")]
    OneTo100,
}

impl AgePolicy {
    /// Inclusive bounds before the zero rule is applied
    pub fn bounds(self) -> (u32, u32) {
        match self {
            AgePolicy::ZeroTo120 => (0, 120),
            AgePolicy::OneTo100 => (1, 100),
        }
    }

    pub fn accepts(self, age: u32) -> bool {
        let (min, max) = self.bounds();
        age != 0 && (min..=max).contains(&age)
    }

    /// Message shown when an age is refused
    pub fn rejection_message(self) -> String {
        let (min, max) = self.bounds();
        format!("Idade deve estar entre {} e {} anos", min.max(1), max)
    }
}

/// What the model-status endpoint answers when the backend probe itself fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailurePolicy {
    /// Report the model as untrained, which blocks the intake wizard
    #[default]
    AssumeUntrained,
    /// Report the model as trained and let the prediction call surface errors
    AssumeTrained,
}

/// Backing store for the model status record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusStoreKind {
    /// JSON file that survives restarts
    #[default]
    File,
    /// Process memory only
    Memory,
}
