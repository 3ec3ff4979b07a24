//! Durable configuration writer
//!
//! The rendered document is written to a temporary file in the target's
//! directory and renamed into place. The rename is atomic within a single
//! directory, so a concurrent reader (the service supervisor restarting
//! Miningcore, for instance) always observes either the previous or the
//! new complete document, never a truncated one.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Writer failures. The target path is only ever changed by the final
/// rename, so any failure leaves the existing target untouched.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Serialize `document` the way every render artifact is serialized:
/// two-space indentation, declared key order, trailing newline.
pub fn render_document(document: &Value) -> Result<String, serde_json::Error> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Atomically replace `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

/// Serialize and atomically persist a JSON document.
pub fn write_json_atomic(path: &Path, document: &Value) -> Result<(), WriteError> {
    let rendered = render_document(document)?;
    write_atomic(path, rendered.as_bytes())?;
    Ok(())
}

/// The temporary path is the target with `.tmp` appended, keeping it in
/// the same directory (and filesystem) so the rename stays atomic.
fn temp_path(path: &Path) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
