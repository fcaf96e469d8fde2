//! Status enums for combos.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a status from operator input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid combo status: {0}")]
pub struct StatusParseError(pub String);

/// Whether a persisted combo is offered to shoppers.
///
/// Combos are paused rather than deleted when they should stop selling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComboStatus {
    #[default]
    Active,
    #[serde(alias = "inactive")]
    Paused,
}

impl ComboStatus {
    /// The other status.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Active,
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for ComboStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComboStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" | "inactive" => Ok(Self::Paused),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}

/// Status selector of the combo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ComboStatus),
}

impl StatusFilter {
    /// Whether a combo with `status` passes the filter.
    #[must_use]
    pub fn accepts(self, status: ComboStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
