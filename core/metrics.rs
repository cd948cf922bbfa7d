/*!
Fabricated performance metrics. Nothing is measured: a base quality is drawn and every other figure is derived from it with bounded noise, then clamped into a plausible range.
*/

use crate::model::ModelMetrics;
use rand::Rng;
use indexmap::IndexMap;
use std::ops::RangeInclusive;

pub const ACCURACY_RANGE: RangeInclusive<f64> = 0.75..=0.95;
pub const PRECISION_RECALL_RANGE: RangeInclusive<f64> = 0.70..=0.95;
pub const ROC_AUC_RANGE: RangeInclusive<f64> = 0.75..=0.95;
pub const PR_AUC_RANGE: RangeInclusive<f64> = 0.65..=0.90;

pub fn synthesize_metrics<R: Rng + ?Sized>(rng: &mut R) -> ModelMetrics {
	let base = rng.gen_range(0.85..0.95);
	let precision = base + rng.gen_range(-0.025..0.025);
	let recall = base + rng.gen_range(-0.025..0.025);
	// Derived figures use the unclamped values.
	let f1_score = 2.0 * precision * recall / (precision + recall);
	let roc_auc = base + rng.gen_range(0.0..0.05);
	let pr_auc = roc_auc - 0.1 + rng.gen_range(0.0..0.05);
	ModelMetrics {
		accuracy: clamp(base, &ACCURACY_RANGE),
		precision: clamp(precision, &PRECISION_RECALL_RANGE),
		recall: clamp(recall, &PRECISION_RECALL_RANGE),
		f1_score: clamp(f1_score, &PRECISION_RECALL_RANGE),
		roc_auc: clamp(roc_auc, &ROC_AUC_RANGE),
		pr_auc: clamp(pr_auc, &PR_AUC_RANGE),
		training_time: rng.gen_range(5.0..35.0),
		model_size: rng.gen_range(10.0..60.0),
	}
}

fn clamp(value: f64, range: &RangeInclusive<f64>) -> f64 {
	value.max(*range.start()).min(*range.end())
}

/// Feature importances reported for the random forest, largest first.
pub fn random_forest_feature_importance() -> IndexMap<String, f64> {
	[
		("duration", 0.25),
		("euribor3m", 0.18),
		("nr_employed", 0.15),
		("emp_var_rate", 0.12),
		("cons_price_idx", 0.10),
		("age", 0.08),
		("campaign", 0.07),
		("pdays", 0.05),
	]
	.iter()
	.map(|(feature, importance)| ((*feature).to_owned(), *importance))
	.collect()
}

#[cfg(test)]
mod test {
	use super::*;
	use rand::SeedableRng;
	use rand_xoshiro::Xoshiro256Plus;

	#[test]
	fn test_bounds() {
		let mut rng = Xoshiro256Plus::seed_from_u64(0);
		for _ in 0..10_000 {
			let metrics = synthesize_metrics(&mut rng);
			assert!(ACCURACY_RANGE.contains(&metrics.accuracy));
			assert!(PRECISION_RECALL_RANGE.contains(&metrics.precision));
			assert!(PRECISION_RECALL_RANGE.contains(&metrics.recall));
			assert!(PRECISION_RECALL_RANGE.contains(&metrics.f1_score));
			assert!(ROC_AUC_RANGE.contains(&metrics.roc_auc));
			assert!(PR_AUC_RANGE.contains(&metrics.pr_auc));
			assert!(metrics.training_time >= 5.0 && metrics.training_time < 35.0);
			assert!(metrics.model_size >= 10.0 && metrics.model_size < 60.0);
		}
	}

	#[test]
	fn test_f1_is_harmonic_mean() {
		let mut rng = Xoshiro256Plus::seed_from_u64(7);
		let mut checked = 0;
		for _ in 0..1_000 {
			let metrics = synthesize_metrics(&mut rng);
			let p = metrics.precision;
			let r = metrics.recall;
			// Skip samples where clamping moved precision or recall.
			if p >= 0.95 || r >= 0.95 {
				continue;
			}
			let f1 = 2.0 * p * r / (p + r);
			assert!((metrics.f1_score - f1).abs() < 1e-12);
			checked += 1;
		}
		assert!(checked > 0);
	}

	#[test]
	fn test_seeded_is_deterministic() {
		let a = synthesize_metrics(&mut Xoshiro256Plus::seed_from_u64(42));
		let b = synthesize_metrics(&mut Xoshiro256Plus::seed_from_u64(42));
		assert_eq!(a, b);
	}

	#[test]
	fn test_feature_importance() {
		let importance = random_forest_feature_importance();
		assert_eq!(importance.len(), 8);
		assert_eq!(importance["duration"], 0.25);
		let total: f64 = importance.values().sum();
		assert!((total - 1.0).abs() < 1e-9);
	}

	#[test]
	fn test_feature_importance_is_largest_first() {
		let importance = random_forest_feature_importance();
		let features: Vec<&str> = importance.keys().map(String::as_str).collect();
		assert_eq!(
			features,
			vec![
				"duration",
				"euribor3m",
				"nr_employed",
				"emp_var_rate",
				"cons_price_idx",
				"age",
				"campaign",
				"pdays",
			]
		);
		let values: Vec<f64> = importance.values().copied().collect();
		assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
		let json = serde_json::to_string(&importance).unwrap();
		assert!(json.starts_with(r#"{"duration":0.25,"euribor3m":0.18,"#));
	}
}
