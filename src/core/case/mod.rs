//! Identifier case engine. Classifies and converts component names between
//! PascalCase ("UserCard") and kebab-case ("user-card").
//!
//! Both directions consult the same [`AcronymSet`], so a name built from
//! recognized acronyms and ordinary words survives a round trip unchanged.

mod acronyms;
mod classify;
mod convert;

pub use acronyms::AcronymSet;
pub use classify::{classify, is_kebab_case, is_pascal_case};
pub use convert::{to_kebab_case, to_pascal_case};

use crate::error::{Error, Result};
use serde::Serialize;

/// The naming convention an identifier is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// Capitalized, acronym-aware: `UserAPIService`, `Header`, `FAQ`.
    Pascal,
    /// Lowercase alphanumeric tokens joined by single hyphens: `user-api-service`.
    Kebab,
}

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::Pascal => "pascal",
            Convention::Kebab => "kebab",
        }
    }
}

/// Which way a conversion pass renames entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    PascalToKebab,
    KebabToPascal,
}

impl Direction {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "pascal-to-kebab" | "camel-to-kebab" | "kebab" => Ok(Direction::PascalToKebab),
            "kebab-to-pascal" | "kebab-to-camel" | "pascal" => Ok(Direction::KebabToPascal),
            _ => Err(Error::validation_invalid_argument(
                "direction",
                format!(
                    "Unknown direction '{}'. Use: pascal-to-kebab, kebab-to-pascal",
                    s
                ),
                None,
                None,
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::PascalToKebab => "pascal-to-kebab",
            Direction::KebabToPascal => "kebab-to-pascal",
        }
    }

    /// Convention an entity must already be in to be renamed by this pass.
    pub fn source(&self) -> Convention {
        match self {
            Direction::PascalToKebab => Convention::Pascal,
            Direction::KebabToPascal => Convention::Kebab,
        }
    }

    pub fn target(&self) -> Convention {
        match self {
            Direction::PascalToKebab => Convention::Kebab,
            Direction::KebabToPascal => Convention::Pascal,
        }
    }

    /// Convert `name` when it is in this direction's source convention.
    ///
    /// Returns `None` for names in the other convention or in neither.
    pub fn convert(&self, name: &str, acronyms: &AcronymSet) -> Option<String> {
        if classify(name) != Some(self.source()) {
            return None;
        }
        Some(match self {
            Direction::PascalToKebab => to_kebab_case(name, acronyms),
            Direction::KebabToPascal => to_pascal_case(name, acronyms),
        })
    }
}
