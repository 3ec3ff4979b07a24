//! Render summary artifact
//!
//! A serializable record of a completed render: counts, output path, and
//! the provenance (path plus content digest) of every contributing input
//! document. The CLI derives its success diagnostic from it and can
//! persist it as a JSON artifact via `--summary`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Schema version for the render summary
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "miningcore-render/render_summary@1";

/// Which input a digest belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    BaseConfig,
    Fragment,
    FeePolicy,
}

/// A contributing input document with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDigest {
    /// Input role
    pub kind: SourceKind,

    /// File path
    pub path: String,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// Summary of one render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the render completed
    pub created_at: DateTime<Utc>,

    /// Path the rendered configuration was (or, in check mode, would have
    /// been) written to
    pub out_path: String,

    /// Whether this was a check run (nothing written)
    pub check: bool,

    /// Pools in the rendered configuration
    pub pool_count: usize,

    /// Fragment files skipped as malformed
    pub fragments_skipped: usize,

    /// Fee entries appended during this render
    pub fee_entries_added: usize,

    /// Total non-fatal warnings emitted
    pub warnings: usize,

    /// Contributing inputs in processing order
    pub sources: Vec<SourceDigest>,

    /// Human-readable summary
    pub human_summary: String,
}

impl RenderSummary {
    /// Assemble a summary from the orchestrator's counters.
    pub fn new(
        out_path: &Path,
        check: bool,
        pool_count: usize,
        fragments_skipped: usize,
        fee_entries_added: usize,
        warnings: usize,
        sources: Vec<SourceDigest>,
    ) -> Self {
        let out_path = out_path.display().to_string();
        let human_summary = Self::generate_human_summary(check, pool_count, warnings, &out_path);

        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            out_path,
            check,
            pool_count,
            fragments_skipped,
            fee_entries_added,
            warnings,
            sources,
            human_summary,
        }
    }

    fn generate_human_summary(
        check: bool,
        pool_count: usize,
        warnings: usize,
        out_path: &str,
    ) -> String {
        let verb = if check { "validated" } else { "wrote" };
        if warnings > 0 {
            format!("{verb} {pool_count} pool(s) to {out_path} ({warnings} warning(s))")
        } else {
            format!("{verb} {pool_count} pool(s) to {out_path}")
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Hex-encoded SHA-256 of raw input bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
