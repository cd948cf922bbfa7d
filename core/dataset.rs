/*!
The shape of the bank marketing dataset as the dashboard reports it. These figures describe the public `bank-additional-full` dataset and are returned for every upload regardless of what the file contains.
*/

use indexmap::IndexMap;

pub const TOTAL_ROWS: u64 = 41188;
pub const TOTAL_COLUMNS: u64 = 21;
pub const TARGET_COLUMN: &str = "y";
/// Share of rows whose target is `yes`.
pub const YES_RATIO: f64 = 0.112;
pub const NO_RATIO: f64 = 0.888;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
	Numeric,
	Categorical,
	Target,
}

const COLUMNS: [(&str, ColumnKind); 21] = [
	("age", ColumnKind::Numeric),
	("job", ColumnKind::Categorical),
	("marital", ColumnKind::Categorical),
	("education", ColumnKind::Categorical),
	("default", ColumnKind::Categorical),
	("housing", ColumnKind::Categorical),
	("loan", ColumnKind::Categorical),
	("contact", ColumnKind::Categorical),
	("month", ColumnKind::Categorical),
	("day_of_week", ColumnKind::Categorical),
	("duration", ColumnKind::Numeric),
	("campaign", ColumnKind::Numeric),
	("pdays", ColumnKind::Numeric),
	("previous", ColumnKind::Numeric),
	("poutcome", ColumnKind::Categorical),
	("emp_var_rate", ColumnKind::Numeric),
	("cons_price_idx", ColumnKind::Numeric),
	("cons_conf_idx", ColumnKind::Numeric),
	("euribor3m", ColumnKind::Numeric),
	("nr_employed", ColumnKind::Numeric),
	(TARGET_COLUMN, ColumnKind::Target),
];

/// Column kinds in file order, the target last.
pub fn schema() -> IndexMap<&'static str, ColumnKind> {
	COLUMNS.iter().copied().collect()
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PreviewRow {
	pub age: u32,
	pub job: &'static str,
	pub marital: &'static str,
	pub education: &'static str,
	pub default: &'static str,
	pub housing: &'static str,
	pub loan: &'static str,
	pub y: &'static str,
}

pub fn preview() -> Vec<PreviewRow> {
	vec![
		PreviewRow {
			age: 56,
			job: "housemaid",
			marital: "married",
			education: "basic.4y",
			default: "no",
			housing: "no",
			loan: "no",
			y: "no",
		},
		PreviewRow {
			age: 57,
			job: "services",
			marital: "married",
			education: "high.school",
			default: "unknown",
			housing: "no",
			loan: "no",
			y: "no",
		},
		PreviewRow {
			age: 37,
			job: "services",
			marital: "married",
			education: "high.school",
			default: "no",
			housing: "yes",
			loan: "no",
			y: "no",
		},
		PreviewRow {
			age: 40,
			job: "admin.",
			marital: "married",
			education: "basic.6y",
			default: "no",
			housing: "no",
			loan: "no",
			y: "no",
		},
		PreviewRow {
			age: 56,
			job: "services",
			marital: "married",
			education: "high.school",
			default: "no",
			housing: "no",
			loan: "yes",
			y: "no",
		},
	]
}

#[test]
fn test_schema() {
	let schema = schema();
	assert_eq!(schema.len() as u64, TOTAL_COLUMNS);
	assert_eq!(schema[TARGET_COLUMN], ColumnKind::Target);
	let numeric = schema
		.values()
		.filter(|kind| **kind == ColumnKind::Numeric)
		.count();
	assert_eq!(numeric, 10);
}

#[test]
fn test_schema_keeps_column_order() {
	let schema = schema();
	let columns: Vec<&str> = schema.keys().copied().collect();
	assert_eq!(columns.first(), Some(&"age"));
	assert_eq!(columns[1..4], ["job", "marital", "education"]);
	assert_eq!(columns.last(), Some(&TARGET_COLUMN));
	let json = serde_json::to_string(&schema).unwrap();
	assert!(json.starts_with(r#"{"age":"numeric","job":"categorical","marital":"categorical""#));
	assert!(json.ends_with(r#""nr_employed":"numeric","y":"target"}"#));
}
