use indexmap::IndexMap;
use std::time::Duration;

#[derive(Debug, serde::Serialize)]
pub struct PreprocessSummary {
	pub steps_completed: Vec<&'static str>,
	pub statistics: PreprocessStatistics,
	pub encoded_features: IndexMap<&'static str, Vec<&'static str>>,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct PreprocessStatistics {
	pub missing_values_handled: u64,
	pub categorical_encoded: u64,
	pub numerical_scaled: u64,
	pub outliers_detected: u64,
}

/// Wait out the preprocessing delay and report the fixed cleaning pipeline. The request body has no influence on the result.
pub async fn run(delay: Duration) -> PreprocessSummary {
	tokio::time::sleep(delay).await;
	summary()
}

pub fn summary() -> PreprocessSummary {
	let mut encoded_features = IndexMap::new();
	encoded_features.insert(
		"job",
		vec![
			"admin.",
			"blue-collar",
			"entrepreneur",
			"housemaid",
			"management",
			"retired",
			"self-employed",
			"services",
			"student",
			"technician",
			"unemployed",
			"unknown",
		],
	);
	encoded_features.insert("marital", vec!["divorced", "married", "single", "unknown"]);
	encoded_features.insert(
		"education",
		vec![
			"basic.4y",
			"basic.6y",
			"basic.9y",
			"high.school",
			"illiterate",
			"professional.course",
			"university.degree",
			"unknown",
		],
	);
	PreprocessSummary {
		steps_completed: vec![
			"Missing value cleanup",
			"Categorical variable encoding",
			"Numerical variable scaling",
			"Outlier detection",
		],
		statistics: PreprocessStatistics {
			missing_values_handled: 0,
			categorical_encoded: 10,
			numerical_scaled: 10,
			outliers_detected: 127,
		},
		encoded_features,
	}
}

#[tokio::test(start_paused = true)]
async fn test_run_waits_for_delay() {
	let start = tokio::time::Instant::now();
	let summary = run(Duration::from_secs(2)).await;
	assert!(start.elapsed() >= Duration::from_secs(2));
	assert_eq!(summary.steps_completed.len(), 4);
	assert_eq!(summary.encoded_features["job"].len(), 12);
	assert_eq!(summary.encoded_features["marital"].len(), 4);
	assert_eq!(summary.encoded_features["education"].len(), 8);
	assert_eq!(summary.statistics.outliers_detected, 127);
}
