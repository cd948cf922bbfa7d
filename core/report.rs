/*!
The exploratory data analysis report. Every figure is a fixed description of the bank marketing dataset.
*/

use crate::dataset::{TOTAL_COLUMNS, TOTAL_ROWS};
use indexmap::IndexMap;

#[derive(Debug, serde::Serialize)]
pub struct EdaReport {
	pub dataset_info: DatasetInfo,
	pub target_distribution: TargetDistribution,
	pub numerical_stats: IndexMap<&'static str, NumericalStats>,
	/// The most frequent values of each column, most frequent first.
	pub categorical_stats: IndexMap<&'static str, IndexMap<&'static str, u64>>,
	pub correlations: IndexMap<&'static str, f64>,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct DatasetInfo {
	pub total_rows: u64,
	pub total_columns: u64,
	pub missing_values: u64,
	pub duplicate_rows: u64,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct TargetDistribution {
	pub yes: u64,
	pub no: u64,
	pub balance_ratio: f64,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct NumericalStats {
	pub mean: f64,
	pub std: f64,
	pub min: f64,
	pub max: f64,
}

fn stats(mean: f64, std: f64, min: f64, max: f64) -> NumericalStats {
	NumericalStats {
		mean,
		std,
		min,
		max,
	}
}

fn counts(entries: &[(&'static str, u64)]) -> IndexMap<&'static str, u64> {
	entries.iter().copied().collect()
}

pub fn eda() -> EdaReport {
	let mut numerical_stats = IndexMap::new();
	numerical_stats.insert("age", stats(40.02, 10.42, 17.0, 98.0));
	numerical_stats.insert("duration", stats(258.29, 259.28, 0.0, 4918.0));
	numerical_stats.insert("campaign", stats(2.57, 2.77, 1.0, 56.0));
	numerical_stats.insert("pdays", stats(962.48, 186.91, 0.0, 999.0));
	let mut categorical_stats = IndexMap::new();
	categorical_stats.insert(
		"job",
		counts(&[
			("admin.", 10422),
			("blue-collar", 9254),
			("technician", 6743),
			("services", 3969),
			("management", 2924),
		]),
	);
	categorical_stats.insert(
		"education",
		counts(&[
			("university.degree", 12168),
			("high.school", 9515),
			("basic.9y", 6045),
			("professional.course", 5243),
		]),
	);
	let mut correlations = IndexMap::new();
	correlations.insert("age_duration", 0.003);
	correlations.insert("campaign_pdays", -0.075);
	correlations.insert("emp_var_rate_euribor3m", 0.973);
	correlations.insert("cons_price_idx_cons_conf_idx", -0.138);
	EdaReport {
		dataset_info: DatasetInfo {
			total_rows: TOTAL_ROWS,
			total_columns: TOTAL_COLUMNS,
			missing_values: 0,
			duplicate_rows: 12,
		},
		target_distribution: TargetDistribution {
			yes: 4640,
			no: 36548,
			balance_ratio: 0.112,
		},
		numerical_stats,
		categorical_stats,
		correlations,
	}
}

#[test]
fn test_eda() {
	let report = eda();
	assert_eq!(
		report.target_distribution.yes + report.target_distribution.no,
		report.dataset_info.total_rows
	);
	assert_eq!(report.numerical_stats.len(), 4);
	assert_eq!(report.categorical_stats["job"].len(), 5);
	assert_eq!(report.categorical_stats["education"].len(), 4);
	assert_eq!(report.correlations["emp_var_rate_euribor3m"], 0.973);
}

#[test]
fn test_categories_are_ranked_by_count() {
	let report = eda();
	let jobs: Vec<&str> = report.categorical_stats["job"].keys().copied().collect();
	assert_eq!(
		jobs,
		vec!["admin.", "blue-collar", "technician", "services", "management"]
	);
	let json = serde_json::to_string(&report.categorical_stats["education"]).unwrap();
	assert_eq!(
		json,
		r#"{"university.degree":12168,"high.school":9515,"basic.9y":6045,"professional.course":5243}"#
	);
	let columns: Vec<&str> = report.numerical_stats.keys().copied().collect();
	assert_eq!(columns, vec!["age", "duration", "campaign", "pdays"]);
}
