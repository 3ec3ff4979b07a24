//! Pool fragment discovery and validation
//!
//! Fragments are independent JSON documents dropped into the pools
//! directory by the wallet tooling or by operators, so their content is
//! untrusted. Each file is parsed and validated in isolation: a malformed
//! fragment is skipped with a warning and must never abort a render.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::summary::sha256_hex;

/// File extension a fragment must carry to be picked up
pub const FRAGMENT_EXTENSION: &str = "json";

/// A validated per-pool configuration fragment
#[derive(Debug, Clone)]
pub struct PoolFragment {
    /// Unique pool identifier (required `id` field)
    pub id: String,

    /// Coin symbol (required `coin` field)
    pub coin: String,

    /// The full fragment document, including `id` and `coin`
    pub document: Value,

    /// File the fragment was loaded from
    pub source: PathBuf,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// Result of scanning the fragments directory
#[derive(Debug, Default)]
pub struct FragmentScan {
    /// Valid fragments in lexicographic filename order
    pub fragments: Vec<PoolFragment>,

    /// Files skipped due to read, parse, or validation failures
    pub skipped: usize,
}

/// Scan `dir` for pool fragments.
///
/// A missing directory is treated as empty: the orchestrator creates it,
/// and external writers may not have produced any fragments yet. Files are
/// processed in lexicographic filename order so the rendered pool order is
/// stable regardless of filesystem enumeration order.
pub fn load_fragments(dir: &Path) -> FragmentScan {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return FragmentScan::default(),
        Err(e) => {
            log::warn!("failed to read fragments directory {}: {}", dir.display(), e);
            return FragmentScan::default();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(FRAGMENT_EXTENSION))
        .collect();
    paths.sort();

    let mut scan = FragmentScan::default();
    for path in paths {
        match load_fragment(&path) {
            Some(fragment) => scan.fragments.push(fragment),
            None => scan.skipped += 1,
        }
    }
    scan
}

fn load_fragment(path: &Path) -> Option<PoolFragment> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("failed to read pool fragment {}: {}", path.display(), e);
            return None;
        }
    };

    let document: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("failed to parse pool fragment {}: {}", path.display(), e);
            return None;
        }
    };

    let (id, coin) = {
        let Some(object) = document.as_object() else {
            log::warn!("pool fragment {} is not a JSON object; skipping", path.display());
            return None;
        };
        match (required_str(object, "id"), required_str(object, "coin")) {
            (Some(id), Some(coin)) => (id.to_string(), coin.to_string()),
            _ => {
                log::warn!(
                    "pool fragment {} lacks a non-empty id/coin; skipping",
                    path.display()
                );
                return None;
            }
        }
    };

    Some(PoolFragment {
        id,
        coin,
        digest: sha256_hex(&bytes),
        source: path.to_path_buf(),
        document,
    })
}

/// A required field must be present, a string, and non-empty.
fn required_str<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}
