use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_opt(key) {
        Some(v) => matches!(v.as_str(), "true" | "1"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tables: TableConfig,
    pub normalize: NormalizeConfig,
    pub snapshot: SnapshotConfig,
    pub gateway: GatewayConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            tables: TableConfig::from_env(),
            normalize: NormalizeConfig::from_env(),
            snapshot: SnapshotConfig::from_env(),
            gateway: GatewayConfig::from_env(),
        }
    }

    /// True when both destination tables are named. Without them the
    /// converter can still normalize and snapshot, but never write.
    pub fn is_configured(&self) -> bool {
        self.tables.model_table.is_some() && self.tables.asset_table.is_some()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  tables:     model={}, asset={}",
            self.tables.model_table.as_deref().unwrap_or("(none)"),
            self.tables.asset_table.as_deref().unwrap_or("(none)"),
        );
        tracing::info!(
            "  normalize:  max_depth={}, alias_prefix={}",
            self.normalize.hierarchy_max_depth,
            self.normalize.tag_alias_prefix,
        );
        tracing::info!(
            "  snapshot:   enabled={}, dir={}",
            self.snapshot.enabled,
            self.snapshot.dir.display(),
        );
        tracing::info!(
            "  gateway:    region={}, write_pace_ms={}",
            self.gateway.region,
            self.gateway.write_pace_ms,
        );
    }
}

// ── Destination tables ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub model_table: Option<String>,
    pub asset_table: Option<String>,
}

impl TableConfig {
    fn from_env() -> Self {
        Self {
            model_table: env_opt("SPARKWISE_MODEL_TABLE"),
            asset_table: env_opt("SPARKWISE_ASSET_TABLE"),
        }
    }
}

// ── Normalization ─────────────────────────────────────────────

/// Default alias-provider prefix. Future deployments may point this at a
/// different provider to distinguish data from multiple gateways.
pub const DEFAULT_TAG_ALIAS_PREFIX: &str = "/Tag Providers/default";

/// Default placeholder depth, matching the deepest hierarchy the
/// destination modeling store accepts.
pub const DEFAULT_HIERARCHY_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Placeholder models are minted for depths `0..hierarchy_max_depth`.
    pub hierarchy_max_depth: usize,
    /// Prefix substituted for the bracketed source in resolved tag paths.
    pub tag_alias_prefix: String,
}

impl NormalizeConfig {
    fn from_env() -> Self {
        Self {
            hierarchy_max_depth: env_usize("SPARKWISE_MAX_DEPTH", DEFAULT_HIERARCHY_MAX_DEPTH),
            tag_alias_prefix: env_or("SPARKWISE_TAG_ALIAS_PREFIX", DEFAULT_TAG_ALIAS_PREFIX),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            hierarchy_max_depth: DEFAULT_HIERARCHY_MAX_DEPTH,
            tag_alias_prefix: DEFAULT_TAG_ALIAS_PREFIX.to_string(),
        }
    }
}

// ── Debug snapshots ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl SnapshotConfig {
    fn from_env() -> Self {
        Self {
            enabled: env_bool("SPARKWISE_SNAPSHOT", false),
            dir: PathBuf::from(env_or("SPARKWISE_SNAPSHOT_DIR", "snapshots")),
        }
    }
}

// ── Gateway ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub region: String,
    /// Delay between successive destination writes, to respect downstream
    /// rate limits.
    pub write_pace_ms: u64,
}

impl GatewayConfig {
    fn from_env() -> Self {
        Self {
            region: env_or("AWS_REGION", "us-east-1"),
            write_pace_ms: env_u64("SPARKWISE_WRITE_PACE_MS", 100),
        }
    }
}
