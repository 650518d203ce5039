//! Engine configuration, loaded from RON.
//!
//! ```ron
//! (
//!     seed: "sunrise",
//!     starting_wave: 1,
//!     starting_money: 1000,
//!     double_battle: false,
//! )
//! ```
//!
//! Every field is optional; missing fields take their default.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BattleConfig {
    /// Run seed. The same seed and command sequence reproduce a battle exactly.
    pub seed: String,
    pub starting_wave: u32,
    pub starting_money: u64,
    pub max_money: u64,
    /// Whether the first battle puts two combatants per side on the field.
    pub double_battle: bool,
    /// Upper bound on phases the driver starts in one `run` call.
    pub max_phase_steps: usize,
    /// Duration of weather set by an ability. Zero lasts until replaced.
    pub weather_turns: u8,
    pub terrain_turns: u8,
    /// Lets achievements unlock again even if already recorded.
    pub achievement_reunlock: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: "default-seed".to_string(),
            starting_wave: 1,
            starting_money: 1000,
            max_money: 9_999_999_999,
            double_battle: false,
            max_phase_steps: 10_000,
            weather_turns: 5,
            terrain_turns: 5,
            achievement_reunlock: false,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        let config: BattleConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.seed.is_empty() {
            return Err(ConfigError::Invalid("seed must not be empty".to_string()));
        }
        if self.starting_wave == 0 {
            return Err(ConfigError::Invalid("waves start at 1".to_string()));
        }
        if self.max_phase_steps == 0 {
            return Err(ConfigError::Invalid(
                "max_phase_steps must be positive".to_string(),
            ));
        }
        if self.starting_money > self.max_money {
            return Err(ConfigError::Invalid(format!(
                "starting_money {} exceeds max_money {}",
                self.starting_money, self.max_money
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = BattleConfig::from_ron_str("(seed: \"abc\", double_battle: true)").unwrap();
        assert_eq!(config.seed, "abc");
        assert!(config.double_battle);
        assert_eq!(config.starting_wave, 1);
        assert_eq!(config.weather_turns, 5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = BattleConfig::from_ron_str("(starting_wave: 0)");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = BattleConfig::from_ron_str("(seed: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
