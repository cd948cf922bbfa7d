use thiserror::Error;

/// A caller supplied input that fails a precondition. These are reported back to the caller as they are and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}

	pub fn message(&self) -> &str {
		&self.0
	}
}
