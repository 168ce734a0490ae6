//! Policy document loading
//!
//! Reads the role/data-type matrix from a JSON or TOML file. Any failure is
//! a `MaskError::Config`, which callers treat as fatal at startup.

use std::path::Path;

use complimask_core::PolicyStore;
use complimask_domain::{MaskError, PolicyDocument, Result};

/// Load and validate a policy document.
///
/// Roles that appear in the matrix but not in `roles` are accepted and
/// logged, since the matrix alone drives decisions.
///
/// # Errors
/// Returns `MaskError::Config` if the file is missing, unreadable, has an
/// unsupported extension or does not match the policy document shape.
pub fn load_policy(path: &Path) -> Result<PolicyStore> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MaskError::Config(format!("Failed to read policy file {}: {e}", path.display()))
    })?;

    let document = parse_policy(&contents, path)?;

    for role in document.policy.keys().filter(|role| !document.roles.contains(role)) {
        tracing::warn!(role = %role, "Policy matrix names a role missing from the role list");
    }

    tracing::info!(
        path = %path.display(),
        roles = document.roles.len(),
        data_types = document.risk_by_type.len(),
        "Policy loaded"
    );

    Ok(PolicyStore::new(document))
}

fn parse_policy(contents: &str, path: &Path) -> Result<PolicyDocument> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MaskError::Config(format!("invalid policy document: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MaskError::Config(format!("invalid policy document: {e}"))),
        _ => Err(MaskError::Config(format!("Unsupported policy format: {extension}"))),
    }
}
