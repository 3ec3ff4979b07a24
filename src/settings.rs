//! Render path settings
//!
//! Every externally-controlled path is captured once at startup into an
//! explicit `Settings` value that is passed to each component; nothing
//! reads the environment after resolution. Precedence per path:
//! built-in default, then environment variable, then CLI flag.

use std::env;
use std::path::{Path, PathBuf};

/// Default base directory for all configuration inputs and the output
pub const DEFAULT_HOME: &str = "/home/umbrel/.miningcore";

/// Environment variable overriding the base directory
pub const ENV_HOME: &str = "MININGCORE_HOME";

/// Environment variable overriding the base config template path
pub const ENV_BASE_CONFIG: &str = "MININGCORE_BASE_CONFIG";

/// Environment variable overriding the pool fragments directory
pub const ENV_POOLS_DIR: &str = "MININGCORE_POOLS_DIR";

/// Environment variable overriding the fee policy path
pub const ENV_FEES: &str = "MININGCORE_FEES";

/// Environment variable overriding the rendered output path
pub const ENV_OUT_CONFIG: &str = "MININGCORE_OUT_CONFIG";

const BASE_CONFIG_FILE: &str = "config.base.json";
const POOLS_DIR_NAME: &str = "pools.d";
const FEES_FILE: &str = "fees.json";
const OUT_CONFIG_FILE: &str = "config.json";

/// Path overrides supplied on the command line (highest precedence)
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub home: Option<PathBuf>,
    pub base_config: Option<PathBuf>,
    pub pools_dir: Option<PathBuf>,
    pub fees: Option<PathBuf>,
    pub out_config: Option<PathBuf>,
}

/// Resolved input/output paths for one render invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base configuration template (required input)
    pub base_config: PathBuf,

    /// Directory holding per-pool fragments
    pub pools_dir: PathBuf,

    /// Fee policy document (optional input)
    pub fee_policy: PathBuf,

    /// Rendered configuration (output)
    pub out_config: PathBuf,
}

impl Settings {
    /// Resolve settings from the process environment plus CLI overrides.
    pub fn resolve(overrides: &PathOverrides) -> Self {
        Self::resolve_with(|key| env::var(key).ok(), overrides)
    }

    /// Default file layout rooted at `dir`.
    pub fn rooted_at(dir: &Path) -> Self {
        Settings {
            base_config: dir.join(BASE_CONFIG_FILE),
            pools_dir: dir.join(POOLS_DIR_NAME),
            fee_policy: dir.join(FEES_FILE),
            out_config: dir.join(OUT_CONFIG_FILE),
        }
    }

    fn resolve_with(env: impl Fn(&str) -> Option<String>, overrides: &PathOverrides) -> Self {
        let home = overrides
            .home
            .clone()
            .or_else(|| env(ENV_HOME).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));

        let defaults = Self::rooted_at(&home);

        let pick = |cli: &Option<PathBuf>, var: &str, default: PathBuf| {
            cli.clone()
                .or_else(|| env(var).map(PathBuf::from))
                .unwrap_or(default)
        };

        Settings {
            base_config: pick(&overrides.base_config, ENV_BASE_CONFIG, defaults.base_config),
            pools_dir: pick(&overrides.pools_dir, ENV_POOLS_DIR, defaults.pools_dir),
            fee_policy: pick(&overrides.fees, ENV_FEES, defaults.fee_policy),
            out_config: pick(&overrides.out_config, ENV_OUT_CONFIG, defaults.out_config),
        }
    }
}
