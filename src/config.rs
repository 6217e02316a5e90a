use crate::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Engine tunables. Defaults come from [`crate::limits`]; embedders may
/// override via `INNKEEP_*` environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_usize("INNKEEP_DEFAULT_PAGE_SIZE") {
            cfg.default_page_size = v;
        }
        if let Some(v) = env_usize("INNKEEP_MAX_PAGE_SIZE") {
            cfg.max_page_size = v;
        }
        cfg
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
