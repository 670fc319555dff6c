use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TTL_SECS: u64 = 3600;
const SLOTS_TTL_SECS: u64 = 300;

/// TTL policy for cached entries.
///
/// TTL class is a function of entity kind only: slot lists are
/// time-sensitive and expire fast, everything else gets the default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub default_ttl_secs: u64,
    pub slots_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_TTL_SECS,
            slots_ttl_secs: SLOTS_TTL_SECS,
        }
    }
}

impl CacheSettings {
    /// Read `DEFAULT_TTL` / `SLOTS_TTL` from the environment, keeping the
    /// defaults for absent or unparseable values.
    pub fn from_env() -> Self {
        Self {
            default_ttl_secs: env_secs("DEFAULT_TTL", DEFAULT_TTL_SECS),
            slots_ttl_secs: env_secs("SLOTS_TTL", SLOTS_TTL_SECS),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn slots_ttl(&self) -> Duration {
        Duration::from_secs(self.slots_ttl_secs)
    }
}

fn env_secs(name: &str, fallback: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}
