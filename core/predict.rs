/*!
Simulated predictions. Probabilities are drawn from the supplied random source; the features of the request are counted but not used.
*/

use rand::Rng;
use serde_json::Value;
use std::time::Duration;

/// Probabilities above this threshold predict `yes`. A probability exactly at the threshold predicts `no`.
pub const THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
	Yes,
	No,
}

impl Label {
	pub fn from_probability_yes(probability_yes: f64) -> Self {
		if probability_yes > THRESHOLD {
			Label::Yes
		} else {
			Label::No
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Probabilities {
	pub yes: f64,
	pub no: f64,
}

impl Probabilities {
	/// Draw `yes` uniformly from `[0, 1)` and make `no` its complement.
	pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
		let yes: f64 = rng.gen();
		Self { yes, no: 1.0 - yes }
	}

	pub fn confidence(&self) -> f64 {
		self.yes.max(self.no)
	}

	pub fn label(&self) -> Label {
		Label::from_probability_yes(self.yes)
	}
}

#[derive(Debug, serde::Deserialize)]
pub struct PredictRequest {
	#[serde(default)]
	pub features: serde_json::Map<String, Value>,
	#[serde(rename = "modelId", default)]
	pub model_id: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct SinglePrediction {
	pub prediction: Label,
	pub probabilities: Probabilities,
	pub confidence: f64,
	pub model_used: Option<String>,
	pub features_used: usize,
}

pub fn predict_single<R: Rng + ?Sized>(request: PredictRequest, rng: &mut R) -> SinglePrediction {
	let probabilities = Probabilities::draw(rng);
	SinglePrediction {
		prediction: probabilities.label(),
		probabilities,
		confidence: probabilities.confidence(),
		model_used: request.model_id,
		features_used: request.features.len(),
	}
}

/// Predict, then wait out `delay`. The random source stays borrowed until the delay ends, so callers sharing one should pass a fork.
pub async fn single<R: Rng + ?Sized>(
	request: PredictRequest,
	rng: &mut R,
	delay: Duration,
) -> SinglePrediction {
	let prediction = predict_single(request, rng);
	tokio::time::sleep(delay).await;
	prediction
}

pub const MIN_BATCH_ROWS: usize = 100;
pub const MAX_BATCH_ROWS: usize = 1100;
/// Processing time reported for every batch, in seconds.
pub const BATCH_PROCESSING_TIME: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RowPrediction {
	pub row_id: usize,
	pub prediction: Label,
	pub probability_yes: f64,
	pub probability_no: f64,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct BatchSummary {
	pub total_predictions: usize,
	pub predicted_yes: usize,
	pub predicted_no: usize,
	pub avg_confidence: f64,
}

#[derive(Debug, serde::Serialize)]
pub struct BatchPrediction {
	pub predictions: Vec<RowPrediction>,
	pub summary: BatchSummary,
	pub model_used: Option<String>,
	pub processing_time: f64,
}

/// Predict a batch of synthetic rows. The row count is drawn from `[100, 1100)` and does not depend on the uploaded file. Each row uses the same complementary probabilities and threshold as a single prediction.
pub fn predict_batch<R: Rng + ?Sized>(model_id: Option<String>, rng: &mut R) -> BatchPrediction {
	let row_count = rng.gen_range(MIN_BATCH_ROWS..MAX_BATCH_ROWS);
	let predictions: Vec<RowPrediction> = (1..=row_count)
		.map(|row_id| {
			let probabilities = Probabilities::draw(rng);
			RowPrediction {
				row_id,
				prediction: probabilities.label(),
				probability_yes: probabilities.yes,
				probability_no: probabilities.no,
			}
		})
		.collect();
	let summary = summarize(&predictions);
	BatchPrediction {
		predictions,
		summary,
		model_used: model_id,
		processing_time: BATCH_PROCESSING_TIME,
	}
}

pub async fn batch<R: Rng + ?Sized>(
	model_id: Option<String>,
	rng: &mut R,
	delay: Duration,
) -> BatchPrediction {
	let prediction = predict_batch(model_id, rng);
	tokio::time::sleep(delay).await;
	prediction
}

pub fn summarize(predictions: &[RowPrediction]) -> BatchSummary {
	let predicted_yes = predictions
		.iter()
		.filter(|row| row.prediction == Label::Yes)
		.count();
	let total_confidence: f64 = predictions
		.iter()
		.map(|row| row.probability_yes.max(row.probability_no))
		.sum();
	let avg_confidence = if predictions.is_empty() {
		0.0
	} else {
		total_confidence / predictions.len() as f64
	};
	BatchSummary {
		total_predictions: predictions.len(),
		predicted_yes,
		predicted_no: predictions.len() - predicted_yes,
		avg_confidence,
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use rand::SeedableRng;
	use rand_xoshiro::Xoshiro256Plus;

	fn request(features: usize) -> PredictRequest {
		let features = (0..features)
			.map(|i| (format!("feature_{}", i), Value::from(i)))
			.collect();
		PredictRequest {
			features,
			model_id: Some("model_1".to_owned()),
		}
	}

	#[test]
	fn test_single_probabilities_are_complementary() {
		let mut rng = Xoshiro256Plus::seed_from_u64(1);
		for _ in 0..1_000 {
			let prediction = predict_single(request(3), &mut rng);
			let Probabilities { yes, no } = prediction.probabilities;
			assert!((yes + no - 1.0).abs() < 1e-12);
			assert_eq!(prediction.prediction == Label::Yes, yes > 0.5);
			assert_eq!(prediction.confidence, yes.max(no));
			assert_eq!(prediction.features_used, 3);
			assert_eq!(prediction.model_used.as_deref(), Some("model_1"));
		}
	}

	#[test]
	fn test_threshold_tie_is_no() {
		assert_eq!(Label::from_probability_yes(0.5), Label::No);
		assert_eq!(Label::from_probability_yes(0.5000001), Label::Yes);
		assert_eq!(Label::from_probability_yes(0.0), Label::No);
	}

	#[test]
	fn test_batch() {
		let mut rng = Xoshiro256Plus::seed_from_u64(2);
		for _ in 0..50 {
			let batch = predict_batch(None, &mut rng);
			let rows = batch.predictions.len();
			assert!(rows >= MIN_BATCH_ROWS && rows < MAX_BATCH_ROWS);
			assert_eq!(batch.summary.total_predictions, rows);
			assert_eq!(batch.summary.predicted_yes + batch.summary.predicted_no, rows);
			assert!(batch.summary.avg_confidence >= 0.5 && batch.summary.avg_confidence <= 1.0);
			for (index, row) in batch.predictions.iter().enumerate() {
				assert_eq!(row.row_id, index + 1);
				assert!((row.probability_yes + row.probability_no - 1.0).abs() < 1e-12);
				assert_eq!(row.prediction, Label::from_probability_yes(row.probability_yes));
			}
		}
	}

	#[test]
	fn test_summarize() {
		let rows = vec![
			RowPrediction {
				row_id: 1,
				prediction: Label::Yes,
				probability_yes: 0.75,
				probability_no: 0.25,
			},
			RowPrediction {
				row_id: 2,
				prediction: Label::No,
				probability_yes: 0.25,
				probability_no: 0.75,
			},
			RowPrediction {
				row_id: 3,
				prediction: Label::No,
				probability_yes: 0.5,
				probability_no: 0.5,
			},
		];
		let summary = summarize(&rows);
		assert_eq!(
			summary,
			BatchSummary {
				total_predictions: 3,
				predicted_yes: 1,
				predicted_no: 2,
				avg_confidence: 2.0 / 3.0,
			}
		);
		assert_eq!(summarize(&[]).avg_confidence, 0.0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_delays() {
		let mut rng = Xoshiro256Plus::seed_from_u64(3);
		let start = tokio::time::Instant::now();
		single(request(0), &mut rng, Duration::from_millis(500)).await;
		assert!(start.elapsed() >= Duration::from_millis(500));
		let start = tokio::time::Instant::now();
		batch(None, &mut rng, Duration::from_secs(3)).await;
		assert!(start.elapsed() >= Duration::from_secs(3));
	}
}
