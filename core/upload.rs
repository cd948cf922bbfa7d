use crate::{
	dataset::{self, ColumnKind, PreviewRow},
	error::ValidationError,
};
use indexmap::IndexMap;

pub const ALLOWED_CONTENT_TYPES: [&str; 3] = [
	"text/csv",
	"application/vnd.ms-excel",
	"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// The file part of an upload. Only its declared content type is inspected.
#[derive(Debug)]
pub struct UploadedFile {
	pub filename: Option<String>,
	pub content_type: Option<String>,
	pub size: u64,
}

#[derive(Debug, serde::Serialize)]
pub struct UploadSummary {
	pub filename: String,
	pub size: u64,
	pub rows: u64,
	pub columns: u64,
	pub schema: IndexMap<&'static str, ColumnKind>,
	pub preview: Vec<PreviewRow>,
}

/// Accept a spreadsheet upload and describe it. The description is the fixed bank marketing dataset, not the file.
pub fn validate(file: Option<UploadedFile>) -> Result<UploadSummary, ValidationError> {
	let file = file.ok_or_else(|| ValidationError::new("no file was found in the request"))?;
	let content_type = file.content_type.as_deref().unwrap_or("");
	if !is_allowed_content_type(content_type) {
		return Err(ValidationError::new(format!(
			"invalid file type \"{}\", expected a csv or excel file",
			content_type
		)));
	}
	Ok(UploadSummary {
		filename: file.filename.unwrap_or_default(),
		size: file.size,
		rows: dataset::TOTAL_ROWS,
		columns: dataset::TOTAL_COLUMNS,
		schema: dataset::schema(),
		preview: dataset::preview(),
	})
}

/// Media type parameters such as `charset` are ignored.
pub fn is_allowed_content_type(content_type: &str) -> bool {
	let essence = content_type.split(';').next().unwrap_or("").trim();
	ALLOWED_CONTENT_TYPES
		.iter()
		.any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

#[cfg(test)]
fn file(content_type: &str) -> UploadedFile {
	UploadedFile {
		filename: Some("bank.csv".to_owned()),
		content_type: Some(content_type.to_owned()),
		size: 1024,
	}
}

#[test]
fn test_csv_is_accepted() {
	let summary = validate(Some(file("text/csv"))).unwrap();
	assert_eq!(summary.filename, "bank.csv");
	assert_eq!(summary.size, 1024);
	assert_eq!(summary.rows, 41188);
	assert_eq!(summary.columns, 21);
	assert_eq!(summary.preview.len(), 5);
}

#[test]
fn test_excel_is_accepted() {
	assert!(validate(Some(file("application/vnd.ms-excel"))).is_ok());
	assert!(validate(Some(file(ALLOWED_CONTENT_TYPES[2]))).is_ok());
	assert!(validate(Some(file("text/csv; charset=utf-8"))).is_ok());
}

#[test]
fn test_json_is_rejected() {
	let error = validate(Some(file("application/json"))).unwrap_err();
	assert!(error.message().contains("application/json"));
}

#[test]
fn test_missing_file_is_rejected() {
	assert_eq!(
		validate(None).unwrap_err(),
		ValidationError::new("no file was found in the request")
	);
	let untyped = UploadedFile {
		filename: None,
		content_type: None,
		size: 0,
	};
	assert!(validate(Some(untyped)).is_err());
}
