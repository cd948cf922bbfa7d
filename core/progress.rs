/// Events emitted while a training session runs. `completed` counts finished steps, including failed ones, so `completed / total` is the share of the queue already worked through.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Progress {
	Started {
		total: u64,
		skipped: Vec<String>,
	},
	Training {
		index: u64,
		total: u64,
		abbreviation: &'static str,
	},
	Completed {
		abbreviation: &'static str,
		completed: u64,
		total: u64,
	},
	Failed {
		abbreviation: &'static str,
		message: String,
		completed: u64,
		total: u64,
	},
	Cancelled {
		completed: u64,
		total: u64,
	},
	Finished {
		trained: u64,
		total: u64,
	},
}

impl Progress {
	/// The share of the queue that is done once this event has been emitted.
	pub fn fraction(&self) -> f64 {
		let (completed, total) = match self {
			Progress::Started { .. } => return 0.0,
			Progress::Training { index, total, .. } => (*index, *total),
			Progress::Completed {
				completed, total, ..
			}
			| Progress::Failed {
				completed, total, ..
			}
			| Progress::Cancelled { completed, total } => (*completed, *total),
			Progress::Finished { .. } => return 1.0,
		};
		if total == 0 {
			1.0
		} else {
			completed as f64 / total as f64
		}
	}
}

#[test]
fn test_fraction() {
	let started = Progress::Started {
		total: 4,
		skipped: Vec::new(),
	};
	assert_eq!(started.fraction(), 0.0);
	let training = Progress::Training {
		index: 1,
		total: 4,
		abbreviation: "RF",
	};
	assert_eq!(training.fraction(), 0.25);
	let completed = Progress::Completed {
		abbreviation: "RF",
		completed: 2,
		total: 4,
	};
	assert_eq!(completed.fraction(), 0.5);
	let cancelled = Progress::Cancelled {
		completed: 0,
		total: 0,
	};
	assert_eq!(cancelled.fraction(), 1.0);
}
