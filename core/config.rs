/*!
This module defines the `Config` struct, which sets the simulated latency of each pipeline step and the seed of the random source. A config file may be written in yaml or json.
*/

use anyhow::Context;
use bankml_util::error::Result;
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
	pub seed: Option<u64>,
	pub delays: Delays,
}

/// Artificial latency of each step, in milliseconds. These are lower bounds on how long a step takes, not targets.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Delays {
	pub preprocess_ms: u64,
	pub split_ms: u64,
	pub train_ms: u64,
	pub predict_single_ms: u64,
	pub predict_batch_ms: u64,
	pub notebook_ms: u64,
}

impl Default for Delays {
	fn default() -> Self {
		Self {
			preprocess_ms: 2000,
			split_ms: 1000,
			train_ms: 2000,
			predict_single_ms: 500,
			predict_batch_ms: 3000,
			notebook_ms: 2000,
		}
	}
}

impl Delays {
	pub fn preprocess(&self) -> Duration {
		Duration::from_millis(self.preprocess_ms)
	}
	pub fn split(&self) -> Duration {
		Duration::from_millis(self.split_ms)
	}
	pub fn train(&self) -> Duration {
		Duration::from_millis(self.train_ms)
	}
	pub fn predict_single(&self) -> Duration {
		Duration::from_millis(self.predict_single_ms)
	}
	pub fn predict_batch(&self) -> Duration {
		Duration::from_millis(self.predict_batch_ms)
	}
	pub fn notebook(&self) -> Duration {
		Duration::from_millis(self.notebook_ms)
	}
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
	if let Some(config_path) = config_path {
		let config = std::fs::read_to_string(config_path)
			.with_context(|| format!("failed to read config file {}", config_path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
		Ok(config)
	} else {
		Ok(Config::default())
	}
}

#[test]
fn test_partial_config() {
	let config: Config = serde_yaml::from_str("seed: 42\ndelays:\n  train_ms: 10\n").unwrap();
	assert_eq!(config.seed, Some(42));
	assert_eq!(config.delays.train(), Duration::from_millis(10));
	assert_eq!(config.delays.split(), Duration::from_secs(1));
}

#[test]
fn test_json_config() {
	let config: Config = serde_yaml::from_str(r#"{"delays": {"predict_batch_ms": 0}}"#).unwrap();
	assert_eq!(config.seed, None);
	assert_eq!(config.delays.predict_batch(), Duration::from_millis(0));
	assert_eq!(config.delays.predict_single(), Duration::from_millis(500));
}

#[test]
fn test_no_config_file() {
	assert_eq!(load_config(None).unwrap(), Config::default());
}
