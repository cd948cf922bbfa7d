use std::sync::{
	atomic::{AtomicU64, Ordering},
	Arc,
};

/// A shared count of finished steps out of a fixed total. Clones observe the same count, so one handle can be kept by a reporter while another is advanced by the worker.
#[derive(Clone, Debug)]
pub struct ProgressCounter {
	completed: Arc<AtomicU64>,
	total: u64,
}

impl ProgressCounter {
	pub fn new(total: u64) -> Self {
		Self {
			completed: Arc::new(AtomicU64::new(0)),
			total,
		}
	}

	pub fn completed(&self) -> u64 {
		self.completed.load(Ordering::Acquire)
	}

	/// Record one more finished step and return the new count. The count saturates at the total.
	pub fn advance(&self) -> u64 {
		let total = self.total;
		let previous = self
			.completed
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |completed| {
				if completed < total {
					Some(completed + 1)
				} else {
					None
				}
			})
			.unwrap_or(total);
		(previous + 1).min(total)
	}
}

#[test]
fn test_advance() {
	let counter = ProgressCounter::new(4);
	let observer = counter.clone();
	assert_eq!(observer.completed(), 0);
	assert_eq!(counter.advance(), 1);
	assert_eq!(observer.completed(), 1);
	counter.advance();
	counter.advance();
	assert_eq!(observer.completed(), 3);
	assert_eq!(counter.advance(), 4);
	assert_eq!(counter.advance(), 4);
	assert_eq!(observer.completed(), 4);
}

#[test]
fn test_empty() {
	let counter = ProgressCounter::new(0);
	assert_eq!(counter.advance(), 0);
	assert_eq!(counter.completed(), 0);
}
