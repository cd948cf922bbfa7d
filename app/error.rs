use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("{0}")]
	BadRequest(String),
	#[error("not found")]
	NotFound,
}

impl Error {
	pub fn bad_request(message: impl Into<String>) -> Self {
		Error::BadRequest(message.into())
	}
}
