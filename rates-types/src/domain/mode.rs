//! Consistency modes for rate resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// How strictly a resolution must honor freshness and source trust.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ConsistencyMode {
    /// Used for money movement. Fails closed rather than returning an
    /// untrusted, stale or absent rate.
    Strict,
    /// Used for reporting and estimates. Always produces a number.
    #[default]
    NonStrict,
}

impl ConsistencyMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, ConsistencyMode::Strict)
    }
}

impl fmt::Display for ConsistencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyMode::Strict => f.write_str("strict"),
            ConsistencyMode::NonStrict => f.write_str("non-strict"),
        }
    }
}

impl FromStr for ConsistencyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ConsistencyMode::Strict),
            "non-strict" | "non_strict" | "nonstrict" => Ok(ConsistencyMode::NonStrict),
            _ => Err(format!("Unknown consistency mode: {}", s)),
        }
    }
}
