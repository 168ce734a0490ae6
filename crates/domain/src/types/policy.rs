//! Policy document shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ELEVATED_ROLES, DEFAULT_PRIVILEGED_ROLE};
use crate::types::masking::{MaskLevel, RiskLevel};

/// Serialized masking policy.
///
/// ```json
/// {
///   "roles": ["Administrator", "Teller"],
///   "policy": { "Teller": { "SSN": "NONE" } },
///   "riskByType": { "SSN": "HIGH" }
/// }
/// ```
///
/// `policy` and `riskByType` are required; a document missing either is
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    #[serde(default)]
    pub roles: Vec<String>,

    /// Role -> data type -> mask level.
    pub policy: BTreeMap<String, BTreeMap<String, MaskLevel>>,

    /// Data type -> risk level.
    pub risk_by_type: BTreeMap<String, RiskLevel>,

    /// Role allowed to unmask high-risk data.
    #[serde(default = "default_privileged_role")]
    pub privileged_role: String,

    /// Roles allowed to unmask medium-risk data.
    #[serde(default = "default_elevated_roles")]
    pub elevated_roles: Vec<String>,
}

fn default_privileged_role() -> String {
    DEFAULT_PRIVILEGED_ROLE.to_string()
}

fn default_elevated_roles() -> Vec<String> {
    DEFAULT_ELEVATED_ROLES.iter().map(ToString::to_string).collect()
}

impl PolicyDocument {
    /// An empty policy with default role assignments.
    pub fn empty() -> Self {
        Self {
            roles: Vec::new(),
            policy: BTreeMap::new(),
            risk_by_type: BTreeMap::new(),
            privileged_role: default_privileged_role(),
            elevated_roles: default_elevated_roles(),
        }
    }
}
