//! Engine configuration.
//!
//! Limits applied while ingesting and rendering agent-supplied surfaces.
//! Values can come from JSON (all fields optional) or the environment:
//!
//! - `A2UI_MAX_DEPTH` - maximum component nesting per render pass
//! - `A2UI_MAX_NODES` - maximum components rendered per surface per pass
//! - `A2UI_MAX_SURFACES` - surfaces kept before the oldest is evicted

use std::env;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_MAX_NODES: usize = 10_000;

const MAX_DEPTH_VAR: &str = "A2UI_MAX_DEPTH";
const MAX_NODES_VAR: &str = "A2UI_MAX_NODES";
const MAX_SURFACES_VAR: &str = "A2UI_MAX_SURFACES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct A2uiConfig {
    /// Nesting limit for one render pass; deeper components render as errors
    pub max_depth: usize,

    /// Components rendered per surface per pass; the rest render as errors
    pub max_nodes: usize,

    /// Cap on live surfaces per session; `None` keeps every surface
    pub max_surfaces: Option<usize>,
}

impl Default for A2uiConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            max_surfaces: None,
        }
    }
}

impl A2uiConfig {
    /// Parse a JSON config; `"maxSurfaces": 0` means unbounded, as in the environment.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.max_surfaces = config.max_surfaces.filter(|cap| *cap > 0);
        Ok(config)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Overlay values found through `lookup` on top of `self`.
    ///
    /// Unset or blank variables leave the current value; unparsable ones are
    /// logged and ignored.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        match parse_var(&lookup, MAX_DEPTH_VAR) {
            Ok(Some(depth)) => self.max_depth = depth,
            Ok(None) => {}
            Err(e) => log::warn!("[A2UI] {}", e),
        }
        match parse_var(&lookup, MAX_NODES_VAR) {
            Ok(Some(nodes)) => self.max_nodes = nodes,
            Ok(None) => {}
            Err(e) => log::warn!("[A2UI] {}", e),
        }
        match parse_var(&lookup, MAX_SURFACES_VAR) {
            Ok(Some(0)) => self.max_surfaces = None,
            Ok(Some(cap)) => self.max_surfaces = Some(cap),
            Ok(None) => {}
            Err(e) => log::warn!("[A2UI] {}", e),
        }
        self
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = lookup(key).filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = A2uiConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_nodes, DEFAULT_MAX_NODES);
        assert_eq!(config.max_surfaces, None);
    }

    #[test]
    fn test_overlay_reads_vars() {
        let config = A2uiConfig::default().overlay(lookup(&[
            ("A2UI_MAX_DEPTH", " 12 "),
            ("A2UI_MAX_NODES", "500"),
            ("A2UI_MAX_SURFACES", "3"),
        ]));
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.max_nodes, 500);
        assert_eq!(config.max_surfaces, Some(3));
    }

    #[test]
    fn test_overlay_ignores_blank_and_invalid() {
        let config = A2uiConfig::default().overlay(lookup(&[
            ("A2UI_MAX_DEPTH", "deep"),
            ("A2UI_MAX_NODES", "-1"),
            ("A2UI_MAX_SURFACES", "  "),
        ]));
        assert_eq!(config, A2uiConfig::default());
    }

    #[test]
    fn test_zero_surfaces_means_unbounded() {
        let base = A2uiConfig {
            max_surfaces: Some(5),
            ..Default::default()
        };
        let config = base.overlay(lookup(&[("A2UI_MAX_SURFACES", "0")]));
        assert_eq!(config.max_surfaces, None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = A2uiConfig::from_json(r#"{"maxSurfaces": 2}"#).unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_surfaces, Some(2));

        assert!(matches!(
            A2uiConfig::from_json("{nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_zero_surfaces_means_unbounded() {
        let config = A2uiConfig::from_json(r#"{"maxSurfaces": 0, "maxNodes": 50}"#).unwrap();
        assert_eq!(config.max_surfaces, None);
        assert_eq!(config.max_nodes, 50);
    }
}
