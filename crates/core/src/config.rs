use serde::{Deserialize, Serialize};

use crate::detection::EntityKind;
use crate::{CoreError, Result};

/// Hard cap on matches taken from one pattern family per scan.
pub const DEFAULT_MAX_MATCHES_PER_FAMILY: usize = 100;
/// Max characters between a "zip code" cue and a bare ZIP.
pub const DEFAULT_ZIP_CUE_WINDOW: usize = 10;
/// Characters of context taken before a country mention.
pub const DEFAULT_INTERNATIONAL_WINDOW: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub max_matches_per_family: usize,
    pub zip_cue_window: usize,
    pub international_window: usize,
    /// Entity kinds the scanner looks for.
    pub families: Vec<EntityKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_matches_per_family: DEFAULT_MAX_MATCHES_PER_FAMILY,
            zip_cue_window: DEFAULT_ZIP_CUE_WINDOW,
            international_window: DEFAULT_INTERNATIONAL_WINDOW,
            families: EntityKind::ALL.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_matches_per_family == 0 {
            return Err(CoreError::InvalidConfig(
                "maxMatchesPerFamily must be greater than zero".into(),
            ));
        }
        if self.international_window == 0 {
            return Err(CoreError::InvalidConfig(
                "internationalWindow must be greater than zero".into(),
            ));
        }
        if self.families.is_empty() {
            return Err(CoreError::InvalidConfig(
                "at least one entity family must be enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn is_enabled(&self, kind: EntityKind) -> bool {
        self.families.contains(&kind)
    }
}
