//! Engine context
//!
//! Everything the engine remembers between polls lives here: configuration,
//! the per-type probe cache, and the mirror location. One context is built at
//! startup and passed explicitly to the poller and resolvers.

use crate::config::EngineConfig;
use crate::mirror::MirrorResolver;
use crate::probe::ProbeCache;

#[derive(Debug)]
pub struct EngineContext {
    pub config: EngineConfig,
    pub probes: ProbeCache,
    pub mirror: MirrorResolver,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        let mirror = MirrorResolver::new(config.mirror.clone());
        Self {
            config,
            probes: ProbeCache::new(),
            mirror,
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
