use crate::{
	dataset::{NO_RATIO, TOTAL_ROWS, YES_RATIO},
	error::ValidationError,
};
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SplitOptions {
	pub test_size: f64,
	pub random_state: u64,
	pub stratify: bool,
}

impl Default for SplitOptions {
	fn default() -> Self {
		Self {
			test_size: 0.2,
			random_state: 42,
			stratify: true,
		}
	}
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct SplitSummary {
	pub train_size: u64,
	pub test_size: u64,
	pub test_ratio: f64,
	pub stratified: bool,
	pub random_state: u64,
	pub class_distribution: ClassDistribution,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct ClassDistribution {
	pub train: ClassCounts,
	pub test: ClassCounts,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct ClassCounts {
	pub yes: u64,
	pub no: u64,
}

impl ClassCounts {
	fn of(rows: u64) -> Self {
		Self {
			yes: (rows as f64 * YES_RATIO).floor() as u64,
			no: (rows as f64 * NO_RATIO).floor() as u64,
		}
	}
}

pub async fn run(options: SplitOptions, delay: Duration) -> Result<SplitSummary, ValidationError> {
	let summary = compute(&options)?;
	tokio::time::sleep(delay).await;
	Ok(summary)
}

/// Partition the fixed row total. The train side is floored and the test side takes the remainder, so the two always add up to the total.
pub fn compute(options: &SplitOptions) -> Result<SplitSummary, ValidationError> {
	let test_size = options.test_size;
	if !(test_size > 0.0 && test_size < 1.0) {
		return Err(ValidationError::new(format!(
			"test_size must be between 0 and 1, got {}",
			test_size
		)));
	}
	let train_rows = (TOTAL_ROWS as f64 * (1.0 - test_size)).floor() as u64;
	let test_rows = TOTAL_ROWS - train_rows;
	Ok(SplitSummary {
		train_size: train_rows,
		test_size: test_rows,
		test_ratio: test_size,
		stratified: options.stratify,
		random_state: options.random_state,
		class_distribution: ClassDistribution {
			train: ClassCounts::of(train_rows),
			test: ClassCounts::of(test_rows),
		},
	})
}

#[test]
fn test_default_split() {
	let summary = compute(&SplitOptions::default()).unwrap();
	insta::assert_debug_snapshot!(summary, @r###"
 SplitSummary {
     train_size: 32950,
     test_size: 8238,
     test_ratio: 0.2,
     stratified: true,
     random_state: 42,
     class_distribution: ClassDistribution {
         train: ClassCounts {
             yes: 3690,
             no: 29259,
         },
         test: ClassCounts {
             yes: 922,
             no: 7315,
         },
     },
 }
 "###);
}

#[test]
fn test_split_sums_to_total() {
	for step in 1..100 {
		let options = SplitOptions {
			test_size: step as f64 / 100.0,
			..Default::default()
		};
		let summary = compute(&options).unwrap();
		assert_eq!(summary.train_size + summary.test_size, TOTAL_ROWS);
	}
}

#[test]
fn test_invalid_test_size() {
	for test_size in [0.0, 1.0, -0.5, 1.5, f64::NAN].iter() {
		let options = SplitOptions {
			test_size: *test_size,
			..Default::default()
		};
		assert!(compute(&options).is_err());
	}
}

#[tokio::test(start_paused = true)]
async fn test_run_waits_for_delay() {
	let start = tokio::time::Instant::now();
	run(SplitOptions::default(), Duration::from_secs(1))
		.await
		.unwrap();
	assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_run_skips_delay() {
	let start = tokio::time::Instant::now();
	let options = SplitOptions {
		test_size: 2.0,
		..Default::default()
	};
	assert!(run(options, Duration::from_secs(1)).await.is_err());
	assert_eq!(start.elapsed(), Duration::from_secs(0));
}
