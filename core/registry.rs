/*!
The in-memory model registry. Saved models live for as long as the process does.
*/

use crate::model::{ModelStatus, StoredModel, TrainedModelResult};
use bankml_util::{err, error::Result};
use chrono::prelude::*;
use std::sync::Mutex;

#[derive(Default)]
pub struct ModelRegistry {
	state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
	models: Vec<StoredModel>,
	last_id_millis: i64,
}

impl ModelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a model as the next version. The version and id are assigned while the registry is locked, so concurrent saves never share either.
	pub fn save(&self, model: TrainedModelResult) -> Result<StoredModel> {
		self.save_at(model, Utc::now())
	}

	fn save_at(&self, model: TrainedModelResult, now: DateTime<Utc>) -> Result<StoredModel> {
		let mut state = self
			.state
			.lock()
			.map_err(|_| err!("the model registry lock is poisoned"))?;
		// Ids are `model_<epoch millis>`. Two saves in the same millisecond take consecutive millis instead.
		let millis = now.timestamp_millis().max(state.last_id_millis + 1);
		state.last_id_millis = millis;
		let stored = StoredModel {
			model,
			id: format!("model_{}", millis),
			version: state.models.len() as u64 + 1,
			created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
			status: ModelStatus::Trained,
		};
		state.models.push(stored.clone());
		Ok(stored)
	}

	/// A snapshot of every saved model, oldest first.
	pub fn list(&self) -> Result<Vec<StoredModel>> {
		let state = self
			.state
			.lock()
			.map_err(|_| err!("the model registry lock is poisoned"))?;
		Ok(state.models.clone())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{algorithms, model::ModelMetrics, train::trained_model_result};
	use std::{collections::BTreeSet, sync::Arc};

	fn model() -> TrainedModelResult {
		let metrics = ModelMetrics {
			accuracy: 0.9,
			precision: 0.88,
			recall: 0.86,
			f1_score: 0.87,
			roc_auc: 0.93,
			pr_auc: 0.84,
			training_time: 12.5,
			model_size: 24.0,
		};
		trained_model_result(algorithms::find("RF").unwrap(), metrics, Utc::now())
	}

	#[test]
	fn test_sequential_saves() {
		let registry = ModelRegistry::new();
		assert!(registry.list().unwrap().is_empty());
		let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
		let first = registry.save_at(model(), now).unwrap();
		let second = registry.save_at(model(), now).unwrap();
		let third = registry.save(model()).unwrap();
		assert_eq!(first.id, "model_1700000000000");
		assert_eq!(second.id, "model_1700000000001");
		assert_eq!(first.status, ModelStatus::Trained);
		let versions: Vec<u64> = registry
			.list()
			.unwrap()
			.iter()
			.map(|model| model.version)
			.collect();
		assert_eq!(versions, vec![1, 2, 3]);
		assert_ne!(third.id, second.id);
		assert_eq!(registry.list().unwrap().len(), 3);
	}

	#[test]
	fn test_concurrent_saves() {
		let registry = Arc::new(ModelRegistry::new());
		let threads: Vec<_> = (0..8)
			.map(|_| {
				let registry = registry.clone();
				std::thread::spawn(move || {
					(0..50)
						.map(|_| registry.save(model()).unwrap())
						.collect::<Vec<_>>()
				})
			})
			.collect();
		let saved: Vec<StoredModel> = threads
			.into_iter()
			.flat_map(|thread| thread.join().unwrap())
			.collect();
		let versions: BTreeSet<u64> = saved.iter().map(|model| model.version).collect();
		let ids: BTreeSet<&str> = saved.iter().map(|model| model.id.as_str()).collect();
		assert_eq!(versions, (1..=400).collect::<BTreeSet<u64>>());
		assert_eq!(ids.len(), 400);
		let listed = registry.list().unwrap();
		for (index, model) in listed.iter().enumerate() {
			assert_eq!(model.version, index as u64 + 1);
		}
	}

	#[test]
	fn test_stored_model_json_is_flat() {
		let registry = ModelRegistry::new();
		let stored = registry.save(model()).unwrap();
		let json = serde_json::to_value(&stored).unwrap();
		assert_eq!(json["abbreviation"], "RF");
		assert_eq!(json["version"], 1);
		assert_eq!(json["status"], "trained");
		let parsed: StoredModel = serde_json::from_value(json).unwrap();
		assert_eq!(parsed.id, stored.id);
		assert_eq!(parsed.model.abbreviation, "RF");
		assert_eq!(parsed.model.confusion_matrix, stored.model.confusion_matrix);
	}
}
