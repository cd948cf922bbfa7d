use serde_json::Value;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelMetrics {
	pub accuracy: f64,
	pub precision: f64,
	pub recall: f64,
	pub f1_score: f64,
	pub roc_auc: f64,
	pub pr_auc: f64,
	/// Seconds.
	pub training_time: f64,
	/// Megabytes.
	pub model_size: f64,
}

/// Rows are the true class, columns the predicted class, `no` first.
pub type ConfusionMatrix = [[u64; 2]; 2];

pub const CONFUSION_MATRIX: ConfusionMatrix = [[7234, 456], [234, 914]];

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrainedModelResult {
	pub algorithm: String,
	pub abbreviation: String,
	pub hyperparameters: serde_json::Map<String, Value>,
	pub metrics: ModelMetrics,
	pub confusion_matrix: ConfusionMatrix,
	#[serde(default)]
	pub feature_importance: Option<IndexMap<String, f64>>,
	pub training_completed: bool,
	pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ModelStatus {
	#[serde(rename = "trained")]
	Trained,
}

/// A model saved to the registry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StoredModel {
	#[serde(flatten)]
	pub model: TrainedModelResult,
	pub id: String,
	pub version: u64,
	pub created_at: String,
	pub status: ModelStatus,
}
