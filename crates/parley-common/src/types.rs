use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two selectable model tiers, traded off on latency versus quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Low-latency model.
    #[default]
    Flash,
    /// Higher-quality, slower model.
    Pro,
}

impl ModelVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::Flash => "flash",
            ModelVariant::Pro => "pro",
        }
    }

    /// The other variant.
    pub fn toggle(self) -> Self {
        match self {
            ModelVariant::Flash => ModelVariant::Pro,
            ModelVariant::Pro => ModelVariant::Flash,
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flash" | "fast" => Ok(ModelVariant::Flash),
            "pro" | "quality" => Ok(ModelVariant::Pro),
            other => Err(format!("unknown model variant '{other}' (expected flash or pro)")),
        }
    }
}
