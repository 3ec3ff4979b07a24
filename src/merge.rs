//! Merge engine
//!
//! Combines the base template, validated pool fragments, and resolved fee
//! entries into the final document. The critical invariant is idempotence:
//! re-running the merge over an already-annotated fragment must not append
//! a second reward entry for the same address. Duplicate suppression keys
//! on the address alone, so a changed default percentage does not rewrite
//! an existing entry.

use serde_json::{json, Map, Value};

use crate::fees::{FeeEntry, FeePolicy};
use crate::fragment::PoolFragment;

/// Key in the base config that receives the rendered pool list
pub const POOLS_KEY: &str = "pools";

/// Per-pool payout list the fee entry is appended to
pub const REWARD_RECIPIENTS_KEY: &str = "rewardRecipients";

/// Result of a merge
#[derive(Debug)]
pub struct MergedConfig {
    /// The final document, ready for serialization
    pub document: Value,

    /// Pools in the rendered list
    pub pool_count: usize,

    /// Fee entries appended during this merge
    pub fee_entries_added: usize,

    /// Pools whose fee injection was skipped because `rewardRecipients`
    /// is present but not an array
    pub fee_skips: usize,
}

/// Merge `fragments` into `base`, injecting resolved fees.
///
/// Fragments are processed independently: a malformed payout list in one
/// pool suppresses that pool's fee entry only and leaves its other fields
/// untouched. Every base key other than `pools` passes through unchanged,
/// in its declared order.
pub fn merge_pools(
    mut base: Map<String, Value>,
    fragments: Vec<PoolFragment>,
    policy: &FeePolicy,
) -> MergedConfig {
    let mut fee_entries_added = 0;
    let mut fee_skips = 0;

    let mut pools = Vec::with_capacity(fragments.len());
    for mut fragment in fragments {
        if let Some(fee) = policy.resolve(&fragment.id) {
            match inject_fee(&mut fragment.document, &fee) {
                Injection::Added => fee_entries_added += 1,
                Injection::AlreadyPresent => {}
                Injection::Skipped => {
                    log::warn!(
                        "pool {}: {} is not an array; skipping fee entry",
                        fragment.id,
                        REWARD_RECIPIENTS_KEY
                    );
                    fee_skips += 1;
                }
            }
        }
        pools.push(fragment.document);
    }

    let pool_count = pools.len();
    base.insert(POOLS_KEY.to_string(), Value::Array(pools));

    MergedConfig {
        document: Value::Object(base),
        pool_count,
        fee_entries_added,
        fee_skips,
    }
}

enum Injection {
    Added,
    AlreadyPresent,
    Skipped,
}

fn inject_fee(document: &mut Value, fee: &FeeEntry) -> Injection {
    // The loader guarantees fragments are objects.
    let Some(object) = document.as_object_mut() else {
        return Injection::Skipped;
    };

    let recipients = object
        .entry(REWARD_RECIPIENTS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));
    let Some(recipients) = recipients.as_array_mut() else {
        return Injection::Skipped;
    };

    let duplicate = recipients
        .iter()
        .any(|entry| entry.get("address").and_then(Value::as_str) == Some(fee.address.as_str()));
    if duplicate {
        return Injection::AlreadyPresent;
    }

    recipients.push(json!({
        "address": fee.address,
        "percentage": fee.percentage,
    }));
    Injection::Added
}
