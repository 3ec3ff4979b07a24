//! Fee policy resolution
//!
//! The fee policy document is optional and operator-managed. It carries a
//! single default percentage and payout address plus per-pool address
//! overrides. Resolution never aborts a render: an absent document means
//! no fees, and a malformed one degrades to the same state with a warning.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::summary::sha256_hex;

/// Addresses starting with this prefix are operator placeholders, not
/// real payout targets; fee injection is skipped for them.
pub const PLACEHOLDER_PREFIX: &str = "CHANGE_ME";

/// A fee entry ready to be appended to a pool's reward recipients
#[derive(Debug, Clone, PartialEq)]
pub struct FeeEntry {
    pub address: String,
    pub percentage: f64,
}

/// Parsed fee policy: one default percentage/address plus per-pool
/// address overrides.
#[derive(Debug, Clone, Default)]
pub struct FeePolicy {
    default_percentage: f64,
    default_address: Option<String>,
    address_overrides: HashMap<String, String>,
}

/// Outcome of loading the fee policy document
#[derive(Debug, Default)]
pub struct PolicyLoad {
    pub policy: FeePolicy,

    /// SHA-256 of the document, when one was present and readable
    pub digest: Option<String>,

    /// Whether loading degraded to "no fee policy" with a warning
    pub warned: bool,
}

/// Load the fee policy at `path`.
///
/// Absence is the normal "no fees configured" state and is silent.
pub fn load(path: &Path) -> PolicyLoad {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return PolicyLoad::default(),
        Err(e) => {
            log::warn!("failed to read fee policy {}: {}", path.display(), e);
            return PolicyLoad {
                warned: true,
                ..Default::default()
            };
        }
    };
    let digest = Some(sha256_hex(&bytes));

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(document) => match FeePolicy::from_document(&document) {
            Some(policy) => PolicyLoad {
                policy,
                digest,
                warned: false,
            },
            None => {
                log::warn!("fee policy {} is not a JSON object; ignoring", path.display());
                PolicyLoad {
                    digest,
                    warned: true,
                    ..Default::default()
                }
            }
        },
        Err(e) => {
            log::warn!("failed to parse fee policy {}: {}", path.display(), e);
            PolicyLoad {
                digest,
                warned: true,
                ..Default::default()
            }
        }
    }
}

impl FeePolicy {
    /// Extract a policy from a parsed document.
    ///
    /// Returns `None` unless the document is a JSON object. Within it,
    /// unusable fields fall back to their "no fee" defaults instead of
    /// failing the load: a wrong-typed `default` or `addresses` entry
    /// costs at most that entry.
    pub fn from_document(document: &Value) -> Option<Self> {
        let object = document.as_object()?;

        let default = object.get("default").and_then(Value::as_object);
        let default_percentage = default
            .and_then(|d| d.get("percentage"))
            .map(coerce_percentage)
            .unwrap_or(0.0);
        let default_address = default
            .and_then(|d| d.get("address"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut address_overrides = HashMap::new();
        if let Some(addresses) = object.get("addresses").and_then(Value::as_object) {
            for (pool_id, address) in addresses {
                if let Some(address) = address.as_str().filter(|s| !s.is_empty()) {
                    address_overrides.insert(pool_id.clone(), address.to_string());
                }
            }
        }

        Some(FeePolicy {
            default_percentage,
            default_address,
            address_overrides,
        })
    }

    /// Resolve the fee for `pool_id`.
    ///
    /// `None` means "no fee applies" and is a normal outcome: the
    /// percentage is not positive, no address is configured, or the
    /// configured address is still an operator placeholder.
    pub fn resolve(&self, pool_id: &str) -> Option<FeeEntry> {
        if self.default_percentage <= 0.0 {
            return None;
        }

        let address = self
            .address_overrides
            .get(pool_id)
            .or(self.default_address.as_ref())?;
        if address.starts_with(PLACEHOLDER_PREFIX) {
            return None;
        }

        Some(FeeEntry {
            address: address.clone(),
            percentage: self.default_percentage,
        })
    }
}

/// Coerce a percentage from a JSON number or numeric string; anything
/// else counts as 0 (no fee) rather than aborting.
fn coerce_percentage(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn policy(document: Value) -> FeePolicy {
        FeePolicy::from_document(&document).unwrap()
    }

    #[test]
    fn test_default_fee_applies_to_every_pool() {
        let policy = policy(json!({"default": {"percentage": 1.0, "address": "addrX"}}));

        let fee = policy.resolve("p1").unwrap();
        assert_eq!(fee.address, "addrX");
        assert_eq!(fee.percentage, 1.0);
        assert_eq!(policy.resolve("p2").unwrap().address, "addrX");
    }

    #[test]
    fn test_override_address_beats_default() {
        let policy = policy(json!({
            "default": {"percentage": 0.5, "address": "addrX"},
            "addresses": {"p1": "addrP1"}
        }));

        assert_eq!(policy.resolve("p1").unwrap().address, "addrP1");
        assert_eq!(policy.resolve("p2").unwrap().address, "addrX");
    }

    #[test]
    fn test_empty_override_falls_back_to_default() {
        let policy = policy(json!({
            "default": {"percentage": 0.5, "address": "addrX"},
            "addresses": {"p1": ""}
        }));

        assert_eq!(policy.resolve("p1").unwrap().address, "addrX");
    }

    #[test]
    fn test_zero_or_negative_percentage_means_no_fee() {
        let zero = policy(json!({"default": {"percentage": 0, "address": "addrX"}}));
        assert_eq!(zero.resolve("p1"), None);

        let negative = policy(json!({"default": {"percentage": -1.5, "address": "addrX"}}));
        assert_eq!(negative.resolve("p1"), None);
    }

    #[test]
    fn test_no_address_means_no_fee() {
        let policy = policy(json!({"default": {"percentage": 1.0}}));
        assert_eq!(policy.resolve("p1"), None);
    }

    #[test]
    fn test_placeholder_address_means_no_fee() {
        let policy = policy(json!({
            "default": {"percentage": 1.0, "address": "CHANGE_ME_TO_YOUR_WALLET"}
        }));
        assert_eq!(policy.resolve("p1"), None);
    }

    #[test]
    fn test_placeholder_default_with_real_override() {
        let policy = policy(json!({
            "default": {"percentage": 1.0, "address": "CHANGE_ME"},
            "addresses": {"p1": "realAddr"}
        }));

        assert_eq!(policy.resolve("p1").unwrap().address, "realAddr");
        assert_eq!(policy.resolve("p2"), None);
    }

    #[test]
    fn test_percentage_coercion() {
        assert_eq!(coerce_percentage(&json!(1.5)), 1.5);
        assert_eq!(coerce_percentage(&json!(2)), 2.0);
        assert_eq!(coerce_percentage(&json!("0.75")), 0.75);
        assert_eq!(coerce_percentage(&json!(" 3 ")), 3.0);
        assert_eq!(coerce_percentage(&json!("oops")), 0.0);
        assert_eq!(coerce_percentage(&json!(null)), 0.0);
        assert_eq!(coerce_percentage(&json!({"nested": true})), 0.0);
    }

    #[test]
    fn test_wrong_typed_fields_degrade() {
        // Non-object default: no fee, but the document still parses
        let policy = policy(json!({"default": 5, "addresses": {"p1": 42}}));
        assert_eq!(policy.resolve("p1"), None);
    }

    #[test]
    fn test_non_object_document_rejected() {
        assert!(FeePolicy::from_document(&json!([1, 2, 3])).is_none());
        assert!(FeePolicy::from_document(&json!("fees")).is_none());
    }

    #[test]
    fn test_load_missing_file_is_silent_no_fee() {
        let dir = TempDir::new().unwrap();
        let load = load(&dir.path().join("fees.json"));

        assert!(!load.warned);
        assert!(load.digest.is_none());
        assert_eq!(load.policy.resolve("p1"), None);
    }

    #[test]
    fn test_load_malformed_file_warns_and_degrades() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fees.json");
        fs::write(&path, "{ nope").unwrap();

        let load = load(&path);
        assert!(load.warned);
        assert!(load.digest.is_some());
        assert_eq!(load.policy.resolve("p1"), None);
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fees.json");
        fs::write(&path, r#"{"default":{"percentage":1.0,"address":"addrX"}}"#).unwrap();

        let load = load(&path);
        assert!(!load.warned);
        assert_eq!(load.digest.as_deref().map(str::len), Some(64));
        assert_eq!(load.policy.resolve("p1").unwrap().address, "addrX");
    }
}
