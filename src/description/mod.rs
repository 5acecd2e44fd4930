use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::PlannerError;

pub const MIN_DESCRIPTION_CHARS: usize = 50;

const TOO_SHORT: &str = "Please provide a more detailed description (at least 50 characters).";

/// Optional extras the user can tick on the submission screen.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Stadium,
    Airport,
    University,
    #[value(name = "advanced_transit", alias = "advanced-transit")]
    AdvancedTransit,
    #[value(name = "green_roofs", alias = "green-roofs")]
    GreenRoofs,
    #[value(name = "smart_grid", alias = "smart-grid")]
    SmartGrid,
}

impl Feature {
    pub fn label(self) -> &'static str {
        match self {
            Feature::Stadium => "Stadium",
            Feature::Airport => "Airport",
            Feature::University => "University",
            Feature::AdvancedTransit => "Advanced Transit System",
            Feature::GreenRoofs => "Green Roofs on Buildings",
            Feature::SmartGrid => "Smart Grid",
        }
    }
}

/// A submitted city description. Immutable once built; the only way to get
/// one is through the length check in [`CityDescription::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CityDescription(String);

impl CityDescription {
    pub fn new(text: impl Into<String>) -> Result<Self, PlannerError> {
        let text = text.into();
        if text.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(PlannerError::Validation(TOO_SHORT.to_string()));
        }
        Ok(Self(text))
    }

    /// Append the selected special features as one extra sentence.
    pub fn with_features(mut self, features: &[Feature]) -> Self {
        let mut labels: Vec<&str> = Vec::new();
        for f in features {
            if !labels.contains(&f.label()) {
                labels.push(f.label());
            }
        }
        if !labels.is_empty() {
            self.0.push_str(&format!(
                "\n\nAdditionally, the city should include the following special features: {}.",
                labels.join(", ")
            ));
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CityDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
