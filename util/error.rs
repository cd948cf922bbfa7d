pub use anyhow::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Create an [`Error`](anyhow::Error) from a format string.
#[macro_export]
macro_rules! err {
	($($arg:tt)*) => {
		$crate::error::Error::msg(format!($($arg)*))
	};
}
