//! Feature Schema - Centralized Field Definition
//!
//! **CRITICAL: this file controls the feature layout**
//!
//! ## Rules (NEVER break these):
//! 1. Add a field → increment `SPEC_VERSION`
//! 2. Change field order → increment `SPEC_VERSION`
//! 3. Change a categorical value list → increment `SPEC_VERSION`
//!
//! Column layout is order-sensitive: a model trained against one layout
//! produces garbage against another. The layout hash lets consumers detect
//! a mismatch at runtime instead.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Current feature layout version
pub const SPEC_VERSION: u8 = 1;

// ============================================================================
// FIELD TABLES (authoritative source)
// ============================================================================

/// Traffic record fields in the exact order they appear in the raw matrix.
/// This is the SINGLE SOURCE OF TRUTH for field ordering.
pub const NETWORK_FIELDS: &[&str] = &[
    "duration",
    "protocol_type",
    "service",
    "flag",
    "src_bytes",
    "dst_bytes",
    "land",
    "wrong_fragment",
    "urgent",
    "hot",
    "num_failed_logins",
    "logged_in",
    "num_compromised",
    "root_shell",
    "su_attempted",
    "num_root",
    "num_file_creations",
    "num_shells",
    "num_access_files",
    "num_outbound_cmds",
    "is_host_login",
    "is_guest_login",
    "count",
    "srv_count",
    "serror_rate",
    "srv_serror_rate",
    "rerror_rate",
    "srv_rerror_rate",
    "same_srv_rate",
    "diff_srv_rate",
    "srv_diff_host_rate",
    "dst_host_count",
    "dst_host_srv_count",
    "dst_host_same_srv_rate",
    "dst_host_diff_srv_rate",
    "dst_host_same_src_port_rate",
    "dst_host_srv_diff_host_rate",
    "dst_host_serror_rate",
    "dst_host_srv_serror_rate",
    "dst_host_rerror_rate",
    "dst_host_srv_rerror_rate",
];

/// Allowed `protocol_type` values, in one-hot block order
pub const PROTOCOL_TYPES: &[&str] = &["tcp", "udp", "icmp"];

/// Allowed `service` values. The final `other` entry is the sentinel bucket
/// for absent or unrecognized services.
pub const SERVICES: &[&str] = &[
    "http", "ftp", "smtp", "ssh", "telnet", "dns", "pop3", "imap", "ntp", "irc", "ssl",
    "radius", "snmp", "domain_u", "other",
];

/// Allowed TCP `flag` values. `OTH` is the sentinel bucket.
pub const TCP_FLAGS: &[&str] = &[
    "SF", "S0", "REJ", "RSTO", "RSTR", "SH", "S1", "S2", "S3", "OTH",
];

// ============================================================================
// FIELD SPEC
// ============================================================================

/// Kind of a single traffic field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Continuous value, normalized to [0,1]
    Numeric,
    /// String value, one-hot encoded against an ordered allowed set
    Categorical { values: Vec<String> },
}

/// One named field of the traffic schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
        }
    }

    pub fn categorical(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FieldKind::Categorical { .. })
    }

    /// Sentinel bucket for a categorical field (its last allowed value)
    pub fn sentinel(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Numeric => None,
            FieldKind::Categorical { values } => values.last().map(|s| s.as_str()),
        }
    }
}

// ============================================================================
// FEATURE SPEC
// ============================================================================

/// Ordered field list shared by every record and every preprocessed matrix.
/// Field order is fixed at construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    version: u8,
    fields: Vec<FieldSpec>,
}

impl FeatureSpec {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            version: SPEC_VERSION,
            fields,
        }
    }

    /// The standard 41-field network traffic schema
    pub fn standard() -> &'static FeatureSpec {
        static STANDARD: Lazy<FeatureSpec> = Lazy::new(build_standard_spec);
        &STANDARD
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw-matrix column indices of numeric fields, in field order
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_categorical())
            .map(|(i, _)| i)
            .collect()
    }

    /// Raw-matrix column index → allowed values, in field order
    pub fn categorical_columns(&self) -> Vec<(usize, Vec<String>)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, f)| match &f.kind {
                FieldKind::Numeric => None,
                FieldKind::Categorical { values } => Some((i, values.clone())),
            })
            .collect()
    }

    /// Width of the encoded feature matrix: surviving numeric columns plus
    /// one column per allowed categorical value
    pub fn encoded_width(&self) -> usize {
        self.fields
            .iter()
            .map(|f| match &f.kind {
                FieldKind::Numeric => 1,
                FieldKind::Categorical { values } => values.len(),
            })
            .sum()
    }

    /// CRC32 hash of the layout: version, field names, kinds, and allowed
    /// values in order. Used to detect layout mismatches at runtime.
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[self.version]);
        for field in &self.fields {
            hasher.update(field.name.as_bytes());
            match &field.kind {
                FieldKind::Numeric => hasher.update(&[0]),
                FieldKind::Categorical { values } => {
                    hasher.update(&[1]);
                    for value in values {
                        hasher.update(value.as_bytes());
                        hasher.update(&[0]);
                    }
                }
            }
        }
        hasher.finalize()
    }
}

fn build_standard_spec() -> FeatureSpec {
    let fields = NETWORK_FIELDS
        .iter()
        .map(|&name| match name {
            "protocol_type" => FieldSpec::categorical(name, PROTOCOL_TYPES),
            "service" => FieldSpec::categorical(name, SERVICES),
            "flag" => FieldSpec::categorical(name, TCP_FLAGS),
            _ => FieldSpec::numeric(name),
        })
        .collect();
    FeatureSpec::new(fields)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_field_count() {
        let spec = FeatureSpec::standard();
        assert_eq!(spec.len(), 41);
        assert_eq!(spec.numeric_columns().len(), 38);
        assert_eq!(spec.categorical_columns().len(), 3);
    }

    #[test]
    fn test_standard_encoded_width() {
        // 38 numeric + 3 + 15 + 10 one-hot columns
        assert_eq!(FeatureSpec::standard().encoded_width(), 66);
    }

    #[test]
    fn test_categorical_column_order() {
        let spec = FeatureSpec::standard();
        let cats = spec.categorical_columns();
        assert_eq!(cats[0].0, 1); // protocol_type
        assert_eq!(cats[1].0, 2); // service
        assert_eq!(cats[2].0, 3); // flag
        assert_eq!(cats[0].1.len(), 3);
        assert_eq!(cats[1].1.len(), 15);
        assert_eq!(cats[2].1.len(), 10);
    }

    #[test]
    fn test_sentinel_is_last_value() {
        let spec = FeatureSpec::standard();
        let service = &spec.fields()[2];
        assert_eq!(service.sentinel(), Some("other"));
        let flag = &spec.fields()[3];
        assert_eq!(flag.sentinel(), Some("OTH"));
        let duration = &spec.fields()[0];
        assert_eq!(duration.sentinel(), None);
    }

    #[test]
    fn test_layout_hash_stable() {
        let a = FeatureSpec::standard().layout_hash();
        let b = FeatureSpec::standard().layout_hash();
        assert_eq!(a, b);
        assert_ne!(a, 0);
    }

    #[test]
    fn test_layout_hash_sensitive_to_order() {
        let ab = FeatureSpec::new(vec![
            FieldSpec::numeric("a"),
            FieldSpec::numeric("b"),
        ]);
        let ba = FeatureSpec::new(vec![
            FieldSpec::numeric("b"),
            FieldSpec::numeric("a"),
        ]);
        assert_ne!(ab.layout_hash(), ba.layout_hash());
    }

    #[test]
    fn test_layout_hash_sensitive_to_values() {
        let tcp = FeatureSpec::new(vec![FieldSpec::categorical("p", &["tcp", "udp"])]);
        let udp = FeatureSpec::new(vec![FieldSpec::categorical("p", &["udp", "tcp"])]);
        assert_ne!(tcp.layout_hash(), udp.layout_hash());
    }
}
