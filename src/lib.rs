//! miningcore-render - deterministic Miningcore configuration rendering
//!
//! Merges a base configuration template with per-pool JSON fragments and
//! an optional fee policy into the single deployable `config.json`. The
//! merge is idempotent, pool ordering is deterministic, and the output is
//! replaced atomically so a concurrent reader never sees a partial file.
//! The wallet tooling that produces the fragments is a separate concern;
//! this crate only reads what it writes.

pub mod fees;
pub mod fragment;
pub mod logging;
pub mod merge;
pub mod render;
pub mod settings;
pub mod summary;
pub mod writer;

pub use fees::{FeeEntry, FeePolicy};
pub use fragment::PoolFragment;
pub use render::{render, RenderError, RenderOptions};
pub use settings::{PathOverrides, Settings};
pub use summary::RenderSummary;
