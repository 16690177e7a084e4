//! Engine configuration loading from file and environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{KgError, KgResult};

/// Tunables shared by the query and write engines.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Raw candidates collected by a temporal walk before kind filtering.
    #[serde(default = "default_temporal_candidate_cap")]
    pub temporal_candidate_cap: usize,
    /// Confidence below this marks a node as a candidate fact.
    #[serde(default = "default_candidate_threshold")]
    pub candidate_threshold: f32,
    /// Multiplicative penalty per contradiction in effective confidence.
    #[serde(default = "default_conflict_penalty")]
    pub conflict_penalty: f32,
    /// Explore depth when the caller gives none.
    #[serde(default = "default_max_depth")]
    pub default_max_depth: u32,
    /// Explore result size when the caller gives none.
    #[serde(default = "default_max_nodes")]
    pub default_max_nodes: usize,
    /// Explore weight threshold when the caller gives none.
    #[serde(default)]
    pub default_min_weight: f32,
    /// Temporal sequence length when the caller gives none.
    #[serde(default = "default_max_events")]
    pub default_max_events: usize,
    /// Shortest-path hop bound when the caller gives none.
    #[serde(default = "default_max_hops")]
    pub default_max_hops: u32,
    /// Relevance search result size when the caller gives none.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Similar nodes considered by the temporal fallback.
    #[serde(default = "default_fallback_similarity_limit")]
    pub fallback_similarity_limit: usize,
}

fn default_temporal_candidate_cap() -> usize {
    27
}

fn default_candidate_threshold() -> f32 {
    0.5
}

fn default_conflict_penalty() -> f32 {
    0.2
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_nodes() -> usize {
    50
}

fn default_max_events() -> usize {
    20
}

fn default_max_hops() -> u32 {
    6
}

fn default_search_limit() -> usize {
    10
}

fn default_fallback_similarity_limit() -> usize {
    27
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            temporal_candidate_cap: default_temporal_candidate_cap(),
            candidate_threshold: default_candidate_threshold(),
            conflict_penalty: default_conflict_penalty(),
            default_max_depth: default_max_depth(),
            default_max_nodes: default_max_nodes(),
            default_min_weight: 0.0,
            default_max_events: default_max_events(),
            default_max_hops: default_max_hops(),
            search_limit: default_search_limit(),
            fallback_similarity_limit: default_fallback_similarity_limit(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file, apply `AKG_*` overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> KgResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KgError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| KgError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus `AKG_*` overrides, validated.
    pub fn from_env() -> KgResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `AKG_<FIELD>` environment variables
    /// (e.g. `AKG_CONFLICT_PENALTY=0.3`).
    pub fn apply_env(&mut self) -> KgResult<()> {
        override_from_env("AKG_TEMPORAL_CANDIDATE_CAP", &mut self.temporal_candidate_cap)?;
        override_from_env("AKG_CANDIDATE_THRESHOLD", &mut self.candidate_threshold)?;
        override_from_env("AKG_CONFLICT_PENALTY", &mut self.conflict_penalty)?;
        override_from_env("AKG_DEFAULT_MAX_DEPTH", &mut self.default_max_depth)?;
        override_from_env("AKG_DEFAULT_MAX_NODES", &mut self.default_max_nodes)?;
        override_from_env("AKG_DEFAULT_MIN_WEIGHT", &mut self.default_min_weight)?;
        override_from_env("AKG_DEFAULT_MAX_EVENTS", &mut self.default_max_events)?;
        override_from_env("AKG_DEFAULT_MAX_HOPS", &mut self.default_max_hops)?;
        override_from_env("AKG_SEARCH_LIMIT", &mut self.search_limit)?;
        override_from_env(
            "AKG_FALLBACK_SIMILARITY_LIMIT",
            &mut self.fallback_similarity_limit,
        )?;
        Ok(())
    }

    /// Check that ratios lie in [0, 1] and limits are non-zero.
    pub fn validate(&self) -> KgResult<()> {
        for (key, value) in [
            ("candidate_threshold", self.candidate_threshold),
            ("conflict_penalty", self.conflict_penalty),
            ("default_min_weight", self.default_min_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(KgError::Config(format!(
                    "{key} must be within [0, 1], got {value}"
                )));
            }
        }
        for (key, value) in [
            ("temporal_candidate_cap", self.temporal_candidate_cap),
            ("default_max_nodes", self.default_max_nodes),
            ("default_max_events", self.default_max_events),
            ("search_limit", self.search_limit),
        ] {
            if value == 0 {
                return Err(KgError::Config(format!("{key} must be at least 1")));
            }
        }
        Ok(())
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) -> KgResult<()> {
    if let Ok(raw) = std::env::var(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| KgError::Config(format!("{key}: cannot parse {raw:?}")))?;
    }
    Ok(())
}

/// Resolve the graph file path using priority order:
/// 1. Explicit path (CLI arg)
/// 2. AKG_GRAPH environment variable
/// 3. .akg/graph.akg in the current directory
pub fn resolve_graph_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(env_path) = std::env::var("AKG_GRAPH") {
        return PathBuf::from(env_path);
    }
    PathBuf::from(".akg/graph.akg")
}

/// Resolve the engine configuration: explicit file, then `AKG_CONFIG`, else
/// defaults. Environment overrides apply in every case.
pub fn resolve_config(explicit: Option<&Path>) -> KgResult<EngineConfig> {
    if let Some(path) = explicit {
        return EngineConfig::load(path);
    }
    if let Ok(env_path) = std::env::var("AKG_CONFIG") {
        return EngineConfig::load(env_path);
    }
    EngineConfig::from_env()
}
