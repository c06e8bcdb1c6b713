use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Represents the error raised when a conflict policy cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported conflict policy '{0}'")]
pub struct ParseOnConflictError(String);

impl ParseOnConflictError {
    /// Gets the text that could not be parsed.
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Defines the behavior when an inserted row collides with an existing primary key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OnConflict {
    /// Indicates the conflicting row is skipped.
    #[default]
    Nothing,

    /// Indicates every non-key column of the conflicting row is overwritten.
    Update,
}

impl OnConflict {
    /// Gets the policy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Update => "update",
        }
    }
}

impl Display for OnConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnConflict {
    type Err = ParseOnConflictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("nothing") {
            Ok(Self::Nothing)
        } else if s.eq_ignore_ascii_case("update") {
            Ok(Self::Update)
        } else {
            Err(ParseOnConflictError(s.to_owned()))
        }
    }
}
