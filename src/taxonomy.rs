//! Attack Taxonomy
//!
//! The fixed 5-way classification every model votes over. Class indices are
//! part of the wire contract between models and the aggregator: 0 = normal,
//! 1 = DoS, 2 = Probe, 3 = R2L, 4 = U2R. An index outside this range is an
//! error condition, never silently coerced.

use serde::{Deserialize, Serialize};

/// Number of classes in the taxonomy
pub const NUM_CLASSES: usize = 5;

// ============================================================================
// ATTACK CATEGORY
// ============================================================================

/// Broad attack category assigned to a traffic record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackCategory {
    /// Legitimate traffic
    #[serde(rename = "normal")]
    Normal,
    /// Denial of Service
    #[serde(rename = "DoS")]
    Dos,
    /// Surveillance and scanning
    #[serde(rename = "Probe")]
    Probe,
    /// Remote to Local (unauthorized access from a remote machine)
    #[serde(rename = "R2L")]
    R2l,
    /// User to Root (privilege escalation)
    #[serde(rename = "U2R")]
    U2r,
}

impl AttackCategory {
    /// All categories in class-index order
    pub const ALL: [AttackCategory; NUM_CLASSES] = [
        AttackCategory::Normal,
        AttackCategory::Dos,
        AttackCategory::Probe,
        AttackCategory::R2l,
        AttackCategory::U2r,
    ];

    /// Map a class index to a category. `None` for out-of-range indices.
    pub fn from_index(index: usize) -> Option<AttackCategory> {
        Self::ALL.get(index).copied()
    }

    /// The class index of this category
    pub fn class_index(&self) -> usize {
        match self {
            AttackCategory::Normal => 0,
            AttackCategory::Dos => 1,
            AttackCategory::Probe => 2,
            AttackCategory::R2l => 3,
            AttackCategory::U2r => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttackCategory::Normal => "normal",
            AttackCategory::Dos => "DoS",
            AttackCategory::Probe => "Probe",
            AttackCategory::R2l => "R2L",
            AttackCategory::U2r => "U2R",
        }
    }

    /// Severity for triage ordering. 0 = benign.
    pub fn severity_level(&self) -> u8 {
        match self {
            AttackCategory::Normal => 0,
            AttackCategory::Probe => 1,
            AttackCategory::Dos => 2,
            AttackCategory::R2l => 3,
            AttackCategory::U2r => 4,
        }
    }

    pub fn is_attack(&self) -> bool {
        !matches!(self, AttackCategory::Normal)
    }

    /// Map a concrete attack name (as labeled in the KDD-99 corpus) to its
    /// broad category. Unknown names return `None`.
    pub fn from_attack_name(name: &str) -> Option<AttackCategory> {
        let category = match name {
            "normal" => AttackCategory::Normal,
            "neptune" | "back" | "land" | "pod" | "smurf" | "teardrop" | "mailbomb"
            | "apache2" | "processtable" | "udpstorm" => AttackCategory::Dos,
            "satan" | "ipsweep" | "portsweep" | "nmap" | "mscan" | "saint" => {
                AttackCategory::Probe
            }
            "ftp_write" | "guess_passwd" | "imap" | "multihop" | "phf" | "spy"
            | "warezclient" | "warezmaster" | "snmpguess" | "worm" | "snmpgetattack" => {
                AttackCategory::R2l
            }
            "buffer_overflow" | "loadmodule" | "perl" | "rootkit" | "xterm" | "ps"
            | "sqlattack" | "httptunnel" => AttackCategory::U2r,
            _ => return None,
        };
        Some(category)
    }
}

impl std::fmt::Display for AttackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
