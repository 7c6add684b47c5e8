//! Filter configuration loaded from TOML.
//!
//! ```toml
//! [limits]
//! max_depth = 64
//! max_length = 4096
//!
//! [entities.users]
//! extra_fields = ["metadata.stateId"]
//! array_fields = ["resourceSourcedIds"]
//! disabled_fields = ["phone", "sms"]
//! ```
//!
//! Every section and key is optional; omitted values use the defaults.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filters::compiler::DEFAULT_MAX_LENGTH;
use crate::filters::parser::DEFAULT_MAX_DEPTH;
use crate::schema::EntityType;
use crate::utils::{get_config_path, read_to_string_limited};

/// Largest nesting depth a config may request
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Largest filter length a config may request, in bytes
pub const MAX_LENGTH_CEILING: usize = 64 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub limits: LimitsConfig,
    /// Per-collection overrides keyed by collection name
    pub entities: BTreeMap<String, EntityOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum logical splits plus parenthesis unwraps in one filter
    pub max_depth: usize,
    /// Maximum filter length in bytes
    pub max_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, max_length: DEFAULT_MAX_LENGTH }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityOverride {
    pub extra_fields: Vec<String>,
    pub array_fields: Vec<String>,
    pub disabled_fields: Vec<String>,
}

impl FilterConfig {
    /// Parse and validate TOML config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FilterConfig = toml::from_str(content).context("Failed to parse filter config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = read_to_string_limited(path)?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid filter config: {}", path.display()))
    }

    /// Load config from `explicit`, the environment, or the default location
    ///
    /// A missing file at the default location yields the default config; a
    /// missing file that was named explicitly is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match get_config_path() {
            Some((path, true)) => Self::load_from_file(&path),
            Some((path, false)) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No filter config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.limits.max_depth == 0 || self.limits.max_depth > MAX_DEPTH_CEILING {
            bail!(
                "limits.max_depth must be between 1 and {} (got {})",
                MAX_DEPTH_CEILING,
                self.limits.max_depth
            );
        }
        if self.limits.max_length == 0 || self.limits.max_length > MAX_LENGTH_CEILING {
            bail!(
                "limits.max_length must be between 1 and {} (got {})",
                MAX_LENGTH_CEILING,
                self.limits.max_length
            );
        }

        let mut seen: BTreeMap<EntityType, &str> = BTreeMap::new();
        for name in self.entities.keys() {
            let entity = name
                .parse::<EntityType>()
                .with_context(|| format!("Invalid [entities.{}] section", name))?;
            if let Some(previous) = seen.insert(entity, name.as_str()) {
                bail!(
                    "[entities.{}] and [entities.{}] both configure {}",
                    previous,
                    name,
                    entity
                );
            }
        }

        Ok(())
    }

    /// Overrides for one collection, matching section names loosely
    pub fn entity(&self, entity: EntityType) -> Option<&EntityOverride> {
        self.entities
            .iter()
            .find(|(name, _)| name.parse::<EntityType>().ok() == Some(entity))
            .map(|(_, overrides)| overrides)
    }
}
