//! Voting Policy
//!
//! Hard voting takes the majority label; soft voting averages per-class
//! probability estimates. The typed enum only admits the two policies;
//! unknown tokens are rejected at the string-parsing boundary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingPolicy {
    Hard,
    Soft,
}

impl VotingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VotingPolicy::Hard => "hard",
            VotingPolicy::Soft => "soft",
        }
    }
}

impl FromStr for VotingPolicy {
    type Err = DetectionError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "hard" => Ok(VotingPolicy::Hard),
            "soft" => Ok(VotingPolicy::Soft),
            other => Err(DetectionError::UnsupportedVotingPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for VotingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
