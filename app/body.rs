use crate::error::Error;
use bankml_util::error::Result;
use hyper::{header, Body, Request};
use std::collections::BTreeMap;

/// Parse a json request body. An empty body parses as `{}`, so routes whose fields all have defaults accept it.
pub async fn read_json<T: serde::de::DeserializeOwned>(request: Request<Body>) -> Result<T> {
	let bytes = hyper::body::to_bytes(request.into_body()).await?;
	let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
		b"{}"
	} else {
		&bytes
	};
	let value = serde_json::from_slice(bytes)
		.map_err(|error| Error::bad_request(format!("invalid request body: {}", error)))?;
	Ok(value)
}

pub struct FilePart {
	pub filename: Option<String>,
	pub content_type: Option<String>,
	pub size: u64,
}

pub struct MultipartForm {
	pub file: Option<FilePart>,
	pub fields: BTreeMap<String, String>,
}

/// Read a multipart form. The part named `file` is kept as a file and its bytes are only counted. Every other part is read as text.
pub async fn read_multipart(request: Request<Body>) -> Result<MultipartForm> {
	let content_type = request
		.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|content_type| content_type.to_str().ok())
		.ok_or_else(|| Error::bad_request("expected a multipart/form-data request"))?;
	let boundary = multer::parse_boundary(content_type)
		.map_err(|_| Error::bad_request("expected a multipart/form-data request"))?;
	let mut multipart = multer::Multipart::new(request.into_body(), boundary);
	let mut form = MultipartForm {
		file: None,
		fields: BTreeMap::new(),
	};
	while let Some(field) = multipart.next_field().await.map_err(malformed)? {
		let name = match field.name() {
			Some(name) => name.to_owned(),
			None => continue,
		};
		if name == "file" {
			let filename = field.file_name().map(ToOwned::to_owned);
			let content_type = field.content_type().map(|mime| mime.to_string());
			let bytes = field.bytes().await.map_err(malformed)?;
			form.file = Some(FilePart {
				filename,
				content_type,
				size: bytes.len() as u64,
			});
		} else {
			let value = field.text().await.map_err(malformed)?;
			form.fields.insert(name, value);
		}
	}
	Ok(form)
}

fn malformed(error: multer::Error) -> Error {
	Error::bad_request(format!("malformed multipart body: {}", error))
}
