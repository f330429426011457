use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Naming and unit convention the SimaPro output links to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetDatabase {
    /// ecoinvent cut-off names: `Product {LOC}| activity | Cut-off, U`.
    #[default]
    Ecoinvent,
    /// Swiss UVEK LCI database names: `name/LOC U`.
    Uvek,
}

impl TargetDatabase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ecoinvent => "ecoinvent",
            Self::Uvek => "uvek",
        }
    }
}

impl fmt::Display for TargetDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetDatabase {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ecoinvent" => Ok(Self::Ecoinvent),
            "uvek" => Ok(Self::Uvek),
            other => Err(ModelError::UnknownTarget(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_targets() {
        assert_eq!(
            "ecoinvent".parse::<TargetDatabase>().unwrap(),
            TargetDatabase::Ecoinvent
        );
        assert_eq!(" UVEK ".parse::<TargetDatabase>().unwrap(), TargetDatabase::Uvek);
        assert!("agribalyse".parse::<TargetDatabase>().is_err());
    }
}
