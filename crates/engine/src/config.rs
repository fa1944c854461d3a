//! Engine configuration.
//!
//! Every table and key is optional; missing values take their defaults.
//!
//! ```toml
//! [index]
//! min-name-len = 2
//! duplicate-policy = "lower-id-wins"
//!
//! [fuzzy]
//! max-distance = 2
//! length-tolerance = 3
//!
//! [rescan]
//! interval-secs = 30
//! on-state-loaded = true
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use waymark_index::{FuzzyConfig, IndexConfig};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The document is not valid TOML or does not fit the schema.
	#[error("config parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value parsed but is out of range.
	#[error("invalid value for `{field}`: {reason}")]
	Invalid {
		field: &'static str,
		reason: String,
	},
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineConfig {
	pub index: IndexConfig,
	pub fuzzy: FuzzyConfig,
	pub rescan: RescanConfig,
}

/// When unresolved mappings are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RescanConfig {
	/// Periodic retry interval. `None` disables periodic rescans.
	pub interval_secs: Option<u64>,
	/// Rescan when the host reports its saved state restored.
	pub on_state_loaded: bool,
}

impl Default for RescanConfig {
	fn default() -> Self {
		Self {
			interval_secs: None,
			on_state_loaded: true,
		}
	}
}

impl RescanConfig {
	pub fn interval(&self) -> Option<Duration> {
		self.interval_secs.map(Duration::from_secs)
	}
}

impl EngineConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.index.min_name_len == 0 {
			return Err(invalid("index.min-name-len", "must be at least 1"));
		}

		let fuzzy = &self.fuzzy;
		if fuzzy.max_distance > fuzzy.length_tolerance {
			return Err(invalid(
				"fuzzy.max-distance",
				format!(
					"{} exceeds length-tolerance {}",
					fuzzy.max_distance, fuzzy.length_tolerance
				),
			));
		}
		for (field, value) in [
			("fuzzy.base-score", fuzzy.base_score),
			("fuzzy.start-bonus", fuzzy.start_bonus),
			("fuzzy.boundary-bonus", fuzzy.boundary_bonus),
		] {
			if value < 0 {
				return Err(invalid(field, format!("{value} is negative")));
			}
		}
		if fuzzy.word_max_distance > fuzzy.word_total_distance {
			return Err(invalid(
				"fuzzy.word-max-distance",
				format!(
					"{} exceeds word-total-distance {}",
					fuzzy.word_max_distance, fuzzy.word_total_distance
				),
			));
		}

		if self.rescan.interval_secs == Some(0) {
			return Err(invalid(
				"rescan.interval-secs",
				"must be positive; omit it to disable periodic rescans",
			));
		}
		Ok(())
	}
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
	ConfigError::Invalid {
		field,
		reason: reason.into(),
	}
}
