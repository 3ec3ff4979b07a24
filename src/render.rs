//! Render orchestration
//!
//! Sequences fragment loading, fee resolution, merging, and the durable
//! write, and maps failures onto the process exit contract. Only a missing
//! or unusable base template, a fragments-directory creation failure, or a
//! failed write abort the render; everything else degrades to warnings so
//! one bad pool file cannot take down the whole run.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::fees;
use crate::fragment;
use crate::merge;
use crate::settings::Settings;
use crate::summary::{sha256_hex, RenderSummary, SourceDigest, SourceKind};
use crate::writer::{self, WriteError};

/// Fatal render failures. Recoverable conditions are logged and counted
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The base template is required. Reported with a distinct exit code
    /// so hooks can tell "not installed yet" from real failures.
    #[error("base config missing: {}", .0.display())]
    BaseConfigMissing(PathBuf),

    #[error("failed to read base config {}: {source}", .path.display())]
    BaseConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse base config {}: {source}", .path.display())]
    BaseConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("base config {} is not a JSON object", .0.display())]
    BaseConfigNotObject(PathBuf),

    #[error("failed to create fragments directory {}: {source}", .path.display())]
    FragmentsDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

impl RenderError {
    /// Stable process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            RenderError::BaseConfigMissing(_) => 2,
            _ => 1,
        }
    }
}

/// Render options beyond the resolved paths
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Run the full pipeline but skip the final write
    pub check: bool,
}

/// Run one render over `settings`.
///
/// On success the previous output has been fully replaced (or, in check
/// mode, left alone) and the returned summary carries the pool count,
/// warning counters, and input provenance.
pub fn render(settings: &Settings, options: &RenderOptions) -> Result<RenderSummary, RenderError> {
    if !settings.base_config.exists() {
        return Err(RenderError::BaseConfigMissing(settings.base_config.clone()));
    }

    fs::create_dir_all(&settings.pools_dir).map_err(|e| RenderError::FragmentsDir {
        path: settings.pools_dir.clone(),
        source: e,
    })?;

    let base = load_base_config(settings)?;
    let scan = fragment::load_fragments(&settings.pools_dir);
    let policy_load = fees::load(&settings.fee_policy);

    let mut sources = vec![SourceDigest {
        kind: SourceKind::BaseConfig,
        path: settings.base_config.display().to_string(),
        digest: base.digest,
    }];
    for fragment in &scan.fragments {
        sources.push(SourceDigest {
            kind: SourceKind::Fragment,
            path: fragment.source.display().to_string(),
            digest: fragment.digest.clone(),
        });
    }
    if let Some(digest) = policy_load.digest.clone() {
        sources.push(SourceDigest {
            kind: SourceKind::FeePolicy,
            path: settings.fee_policy.display().to_string(),
            digest,
        });
    }

    let merged = merge::merge_pools(base.document, scan.fragments, &policy_load.policy);
    let warnings = scan.skipped + usize::from(policy_load.warned) + merged.fee_skips;

    if !options.check {
        writer::write_json_atomic(&settings.out_config, &merged.document).map_err(|e| {
            RenderError::Write {
                path: settings.out_config.clone(),
                source: e,
            }
        })?;
    }

    Ok(RenderSummary::new(
        &settings.out_config,
        options.check,
        merged.pool_count,
        scan.skipped,
        merged.fee_entries_added,
        warnings,
        sources,
    ))
}

struct BaseConfig {
    document: Map<String, Value>,
    digest: String,
}

fn load_base_config(settings: &Settings) -> Result<BaseConfig, RenderError> {
    let path = &settings.base_config;
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        // Raced away since the existence check; same contract either way
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(RenderError::BaseConfigMissing(path.clone()))
        }
        Err(e) => {
            return Err(RenderError::BaseConfigRead {
                path: path.clone(),
                source: e,
            })
        }
    };

    let document: Value =
        serde_json::from_slice(&bytes).map_err(|e| RenderError::BaseConfigParse {
            path: path.clone(),
            source: e,
        })?;
    let Value::Object(document) = document else {
        return Err(RenderError::BaseConfigNotObject(path.clone()));
    };

    Ok(BaseConfig {
        digest: sha256_hex(&bytes),
        document,
    })
}
