/*!
This module contains the training orchestrator, which runs the selected algorithms one after another and collects their results into a leaderboard.

Steps never overlap. The simulated training queue has a single slot, so each algorithm's delay must elapse before the next algorithm starts, and a [`Progress`] event is emitted between every two steps.
*/

use crate::{
	algorithms::{self, Algorithm, Slot},
	error::ValidationError,
	metrics::{random_forest_feature_importance, synthesize_metrics},
	model::{ModelMetrics, TrainedModelResult, CONFUSION_MATRIX},
	progress::Progress,
};
use bankml_util::{error::Result, progress_counter::ProgressCounter};
use chrono::prelude::*;
use futures::future::{BoxFuture, FutureExt};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::{cmp::Ordering, time::Duration};
use tokio::sync::watch;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TrainOptions {
	/// `None` trains every algorithm in table order.
	#[serde(default)]
	pub algorithms: Option<Vec<String>>,
	/// Recorded on the session. It does not change how training runs.
	#[serde(default = "default_hyperparameter_search")]
	pub hyperparameter_search: bool,
}

fn default_hyperparameter_search() -> bool {
	true
}

impl Default for TrainOptions {
	fn default() -> Self {
		Self {
			algorithms: None,
			hyperparameter_search: default_hyperparameter_search(),
		}
	}
}

/// Runs the train step for a single algorithm.
pub trait Trainer: Send {
	fn train<'a>(
		&'a mut self,
		algorithm: &'static Algorithm,
	) -> BoxFuture<'a, Result<TrainedModelResult>>;

	/// Wait out the slot of a requested abbreviation that names no algorithm.
	fn skip<'a>(&'a mut self, _abbreviation: &'a str) -> BoxFuture<'a, ()> {
		futures::future::ready(()).boxed()
	}
}

/// Fabricates a result for each algorithm after waiting out the train delay.
pub struct SimulatedTrainer {
	rng: Xoshiro256Plus,
	delay: Duration,
}

impl SimulatedTrainer {
	pub fn new(rng: Xoshiro256Plus, delay: Duration) -> Self {
		Self { rng, delay }
	}

	pub fn from_seed(seed: u64, delay: Duration) -> Self {
		Self::new(Xoshiro256Plus::seed_from_u64(seed), delay)
	}
}

impl Trainer for SimulatedTrainer {
	fn train<'a>(
		&'a mut self,
		algorithm: &'static Algorithm,
	) -> BoxFuture<'a, Result<TrainedModelResult>> {
		let metrics = synthesize_metrics(&mut self.rng);
		let delay = self.delay;
		async move {
			tokio::time::sleep(delay).await;
			Ok(trained_model_result(algorithm, metrics, Utc::now()))
		}
		.boxed()
	}

	fn skip<'a>(&'a mut self, _abbreviation: &'a str) -> BoxFuture<'a, ()> {
		tokio::time::sleep(self.delay).boxed()
	}
}

pub fn trained_model_result(
	algorithm: &Algorithm,
	metrics: ModelMetrics,
	timestamp: DateTime<Utc>,
) -> TrainedModelResult {
	let feature_importance = if algorithm.abbreviation == "RF" {
		Some(random_forest_feature_importance())
	} else {
		None
	};
	TrainedModelResult {
		algorithm: algorithm.name.to_owned(),
		abbreviation: algorithm.abbreviation.to_owned(),
		hyperparameters: algorithm.hyperparameters(),
		metrics,
		confusion_matrix: CONFUSION_MATRIX,
		feature_importance,
		training_completed: true,
		timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
	}
}

/// Stops a running session. Any clone of the paired [`Cancellation`] observes it.
pub struct CancellationHandle {
	sender: watch::Sender<bool>,
}

impl CancellationHandle {
	pub fn cancel(&self) {
		let _ = self.sender.send(true);
	}
}

#[derive(Clone, Debug)]
pub struct Cancellation {
	receiver: watch::Receiver<bool>,
}

impl Cancellation {
	pub fn new() -> (CancellationHandle, Cancellation) {
		let (sender, receiver) = watch::channel(false);
		(CancellationHandle { sender }, Cancellation { receiver })
	}

	/// A cancellation that never fires.
	pub fn never() -> Cancellation {
		let (_, cancellation) = Cancellation::new();
		cancellation
	}

	pub fn is_cancelled(&self) -> bool {
		*self.receiver.borrow()
	}

	/// Resolves once cancelled. Pends forever if the handle was dropped without cancelling.
	pub async fn cancelled(&mut self) {
		loop {
			if *self.receiver.borrow() {
				return;
			}
			if self.receiver.changed().await.is_err() {
				if *self.receiver.borrow() {
					return;
				}
				futures::future::pending::<()>().await;
			}
		}
	}
}

#[derive(Debug, Clone)]
pub struct TrainingSession {
	/// Results in the order the algorithms finished, which is the order they were requested.
	pub results: Vec<TrainedModelResult>,
	/// Requested abbreviations that name no known algorithm.
	pub skipped: Vec<String>,
	/// Algorithms whose train step failed. They have no result.
	pub failed: Vec<String>,
	pub hyperparameter_search: bool,
	pub cancelled: bool,
}

impl TrainingSession {
	/// The result with the highest f1 score. The earliest result wins a tie.
	pub fn best(&self) -> Option<&TrainedModelResult> {
		let mut best: Option<&TrainedModelResult> = None;
		for result in self.results.iter() {
			match best {
				Some(current) if result.metrics.f1_score <= current.metrics.f1_score => {}
				_ => best = Some(result),
			}
		}
		best
	}

	/// Results by descending f1 score. The sort is stable, so the head is always [`best`](Self::best).
	pub fn leaderboard(&self) -> Vec<&TrainedModelResult> {
		let mut leaderboard: Vec<&TrainedModelResult> = self.results.iter().collect();
		leaderboard.sort_by(|a, b| {
			b.metrics
				.f1_score
				.partial_cmp(&a.metrics.f1_score)
				.unwrap_or(Ordering::Equal)
		});
		leaderboard
	}
}

/// Train each selected algorithm in sequence. An empty selection is rejected before any step runs. A failing step is skipped and the queue moves on; cancelling stops the step in flight and keeps the results collected so far.
pub async fn train(
	options: TrainOptions,
	trainer: &mut dyn Trainer,
	cancellation: &mut Cancellation,
	update_progress: &mut (dyn FnMut(Progress) + Send),
) -> Result<TrainingSession, ValidationError> {
	let selection = match &options.algorithms {
		None => algorithms::resolve_selection(
			&algorithms::ALGORITHMS
				.iter()
				.map(|algorithm| algorithm.abbreviation)
				.collect::<Vec<_>>(),
		),
		Some(requested) if requested.is_empty() => {
			return Err(ValidationError::new(
				"select at least one algorithm to train",
			));
		}
		Some(requested) => algorithms::resolve_selection(requested),
	};
	for abbreviation in selection.skipped.iter() {
		log::warn!("skipping unknown algorithm \"{}\"", abbreviation);
	}
	let total = selection.algorithms.len() as u64;
	let progress_counter = ProgressCounter::new(total);
	update_progress(Progress::Started {
		total,
		skipped: selection.skipped.clone(),
	});
	let mut results = Vec::with_capacity(selection.algorithms.len());
	let mut failed = Vec::new();
	let mut cancelled = false;
	let mut index = 0;
	for slot in selection.slots.iter() {
		if cancellation.is_cancelled() {
			cancelled = true;
			break;
		}
		let algorithm = match slot {
			Slot::Known(algorithm) => *algorithm,
			Slot::Unknown(abbreviation) => {
				let waited = tokio::select! {
					_ = trainer.skip(abbreviation) => true,
					_ = cancellation.cancelled() => false,
				};
				if !waited {
					cancelled = true;
					break;
				}
				continue;
			}
		};
		update_progress(Progress::Training {
			index,
			total,
			abbreviation: algorithm.abbreviation,
		});
		index += 1;
		let outcome = tokio::select! {
			result = trainer.train(algorithm) => Some(result),
			_ = cancellation.cancelled() => None,
		};
		match outcome {
			None => {
				cancelled = true;
				break;
			}
			Some(Ok(result)) => {
				results.push(result);
				let completed = progress_counter.advance();
				update_progress(Progress::Completed {
					abbreviation: algorithm.abbreviation,
					completed,
					total,
				});
			}
			Some(Err(error)) => {
				log::warn!("training {} failed: {}", algorithm.abbreviation, error);
				failed.push(algorithm.abbreviation.to_owned());
				let completed = progress_counter.advance();
				update_progress(Progress::Failed {
					abbreviation: algorithm.abbreviation,
					message: error.to_string(),
					completed,
					total,
				});
			}
		}
	}
	if cancelled {
		update_progress(Progress::Cancelled {
			completed: progress_counter.completed(),
			total,
		});
	} else {
		update_progress(Progress::Finished {
			trained: results.len() as u64,
			total,
		});
	}
	Ok(TrainingSession {
		results,
		skipped: selection.skipped,
		failed,
		hyperparameter_search: options.hyperparameter_search,
		cancelled,
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use bankml_util::err;
	use std::collections::BTreeMap;
	use tokio::time::Instant;

	/// Reports fixed f1 scores and records when each step ran.
	struct ScriptedTrainer {
		f1_scores: BTreeMap<&'static str, f64>,
		fail: Option<&'static str>,
		delay: Duration,
		calls: Vec<(&'static str, Instant, Instant)>,
		skips: Vec<(String, Instant, Instant)>,
	}

	impl ScriptedTrainer {
		fn new(f1_scores: &[(&'static str, f64)]) -> Self {
			Self {
				f1_scores: f1_scores.iter().copied().collect(),
				fail: None,
				delay: Duration::from_secs(2),
				calls: Vec::new(),
				skips: Vec::new(),
			}
		}
	}

	impl Trainer for ScriptedTrainer {
		fn train<'a>(
			&'a mut self,
			algorithm: &'static Algorithm,
		) -> BoxFuture<'a, Result<TrainedModelResult>> {
			async move {
				let start = Instant::now();
				tokio::time::sleep(self.delay).await;
				self.calls
					.push((algorithm.abbreviation, start, Instant::now()));
				if self.fail == Some(algorithm.abbreviation) {
					return Err(err!("{} diverged", algorithm.abbreviation));
				}
				let f1_score = self
					.f1_scores
					.get(algorithm.abbreviation)
					.copied()
					.unwrap_or(0.8);
				Ok(result_with_f1(algorithm, f1_score))
			}
			.boxed()
		}

		fn skip<'a>(&'a mut self, abbreviation: &'a str) -> BoxFuture<'a, ()> {
			async move {
				let start = Instant::now();
				tokio::time::sleep(self.delay).await;
				self.skips
					.push((abbreviation.to_owned(), start, Instant::now()));
			}
			.boxed()
		}
	}

	fn result_with_f1(algorithm: &Algorithm, f1_score: f64) -> TrainedModelResult {
		let metrics = ModelMetrics {
			accuracy: 0.9,
			precision: 0.9,
			recall: 0.9,
			f1_score,
			roc_auc: 0.9,
			pr_auc: 0.8,
			training_time: 10.0,
			model_size: 20.0,
		};
		trained_model_result(algorithm, metrics, Utc::now())
	}

	fn options(algorithms: &[&str]) -> TrainOptions {
		TrainOptions {
			algorithms: Some(algorithms.iter().map(|a| (*a).to_owned()).collect()),
			hyperparameter_search: false,
		}
	}

	fn abbreviations(results: &[&TrainedModelResult]) -> Vec<String> {
		results.iter().map(|r| r.abbreviation.clone()).collect()
	}

	#[tokio::test(start_paused = true)]
	async fn test_trains_every_algorithm_by_default() {
		let mut trainer = SimulatedTrainer::from_seed(42, Duration::from_secs(2));
		let start = Instant::now();
		let session = train(
			TrainOptions::default(),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |_| {},
		)
		.await
		.unwrap();
		assert!(start.elapsed() >= Duration::from_secs(12));
		let order: Vec<&str> = session
			.results
			.iter()
			.map(|r| r.abbreviation.as_str())
			.collect();
		assert_eq!(order, vec!["KNN", "RF", "NB", "SVM", "MLP", "GPC"]);
		assert!(session.hyperparameter_search);
		assert!(!session.cancelled);
		for result in session.results.iter() {
			assert!(result.training_completed);
			assert_eq!(result.confusion_matrix, CONFUSION_MATRIX);
			assert_eq!(result.feature_importance.is_some(), result.abbreviation == "RF");
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_best_is_max_f1_in_submission_order() {
		let mut trainer = ScriptedTrainer::new(&[("NB", 0.81), ("SVM", 0.92), ("RF", 0.88)]);
		let session = train(
			options(&["NB", "SVM", "RF"]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |_| {},
		)
		.await
		.unwrap();
		let results: Vec<&TrainedModelResult> = session.results.iter().collect();
		assert_eq!(abbreviations(&results), vec!["NB", "SVM", "RF"]);
		assert_eq!(session.best().unwrap().abbreviation, "SVM");
		assert_eq!(
			abbreviations(&session.leaderboard()),
			vec!["SVM", "RF", "NB"]
		);
	}

	#[tokio::test(start_paused = true)]
	async fn test_ties_go_to_the_first_result() {
		let mut trainer = ScriptedTrainer::new(&[("MLP", 0.9), ("KNN", 0.95), ("GPC", 0.95)]);
		let session = train(
			options(&["MLP", "KNN", "GPC"]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |_| {},
		)
		.await
		.unwrap();
		assert_eq!(session.best().unwrap().abbreviation, "KNN");
		assert_eq!(session.leaderboard()[0].abbreviation, "KNN");
		assert_eq!(session.leaderboard()[1].abbreviation, "GPC");
	}

	#[tokio::test(start_paused = true)]
	async fn test_empty_selection_runs_nothing() {
		let mut trainer = ScriptedTrainer::new(&[]);
		let mut events = Vec::new();
		let start = Instant::now();
		let error = train(
			options(&[]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |progress| events.push(progress),
		)
		.await
		.unwrap_err();
		assert_eq!(error.message(), "select at least one algorithm to train");
		assert!(trainer.calls.is_empty());
		assert!(events.is_empty());
		assert_eq!(start.elapsed(), Duration::from_secs(0));
	}

	#[tokio::test(start_paused = true)]
	async fn test_steps_never_overlap() {
		let mut trainer = ScriptedTrainer::new(&[]);
		train(
			options(&["KNN", "RF", "NB", "SVM"]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |_| {},
		)
		.await
		.unwrap();
		assert_eq!(trainer.calls.len(), 4);
		for pair in trainer.calls.windows(2) {
			let (_, _, previous_end) = pair[0];
			let (_, next_start, _) = pair[1];
			assert!(next_start >= previous_end);
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_progress_is_reported_between_steps() {
		let mut trainer = ScriptedTrainer::new(&[]);
		let mut events = Vec::new();
		train(
			options(&["RF", "XGB", "SVM"]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |progress| events.push(progress),
		)
		.await
		.unwrap();
		assert_eq!(
			events,
			vec![
				Progress::Started {
					total: 2,
					skipped: vec!["XGB".to_owned()],
				},
				Progress::Training {
					index: 0,
					total: 2,
					abbreviation: "RF",
				},
				Progress::Completed {
					abbreviation: "RF",
					completed: 1,
					total: 2,
				},
				Progress::Training {
					index: 1,
					total: 2,
					abbreviation: "SVM",
				},
				Progress::Completed {
					abbreviation: "SVM",
					completed: 2,
					total: 2,
				},
				Progress::Finished {
					trained: 2,
					total: 2,
				},
			]
		);
		assert_eq!(events[2].fraction(), 0.5);
	}

	#[tokio::test(start_paused = true)]
	async fn test_unknown_abbreviation_waits_its_turn() {
		let mut trainer = ScriptedTrainer::new(&[]);
		let start = Instant::now();
		let session = train(
			options(&["RF", "XGB", "SVM"]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |_| {},
		)
		.await
		.unwrap();
		assert!(start.elapsed() >= Duration::from_secs(6));
		assert_eq!(session.results.len(), 2);
		assert_eq!(trainer.skips.len(), 1);
		let (abbreviation, skip_start, skip_end) = &trainer.skips[0];
		assert_eq!(abbreviation, "XGB");
		let (_, _, rf_end) = trainer.calls[0];
		let (_, svm_start, _) = trainer.calls[1];
		assert!(*skip_start >= rf_end);
		assert!(svm_start >= *skip_end);
		assert!(svm_start - rf_end >= Duration::from_secs(2));
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancellation_during_an_unknown_slot() {
		let mut trainer = ScriptedTrainer::new(&[]);
		let (handle, mut cancellation) = Cancellation::new();
		let mut ignore = |_: Progress| {};
		let (session, _) = tokio::join!(
			train(
				options(&["RF", "XGB", "SVM"]),
				&mut trainer,
				&mut cancellation,
				&mut ignore,
			),
			async {
				tokio::time::sleep(Duration::from_secs(3)).await;
				handle.cancel();
			}
		);
		let session = session.unwrap();
		assert!(session.cancelled);
		assert_eq!(session.results.len(), 1);
		assert!(trainer.skips.is_empty());
		assert_eq!(trainer.calls.len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn test_failed_step_is_skipped() {
		let mut trainer = ScriptedTrainer::new(&[]);
		trainer.fail = Some("NB");
		let mut events = Vec::new();
		let session = train(
			options(&["KNN", "NB", "GPC"]),
			&mut trainer,
			&mut Cancellation::never(),
			&mut |progress| events.push(progress),
		)
		.await
		.unwrap();
		let results: Vec<&TrainedModelResult> = session.results.iter().collect();
		assert_eq!(abbreviations(&results), vec!["KNN", "GPC"]);
		assert_eq!(session.failed, vec!["NB".to_owned()]);
		assert_eq!(trainer.calls.len(), 3);
		assert!(events.contains(&Progress::Failed {
			abbreviation: "NB",
			message: "NB diverged".to_owned(),
			completed: 2,
			total: 3,
		}));
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancellation_stops_the_queue() {
		let mut trainer = ScriptedTrainer::new(&[]);
		let (handle, mut cancellation) = Cancellation::new();
		let mut events = Vec::new();
		let mut record = |progress| events.push(progress);
		let start = Instant::now();
		let (session, _) = tokio::join!(
			train(
				options(&["KNN", "RF", "NB"]),
				&mut trainer,
				&mut cancellation,
				&mut record,
			),
			async {
				tokio::time::sleep(Duration::from_secs(3)).await;
				handle.cancel();
			}
		);
		let session = session.unwrap();
		assert!(session.cancelled);
		assert_eq!(session.results.len(), 1);
		assert_eq!(session.results[0].abbreviation, "KNN");
		assert!(start.elapsed() < Duration::from_secs(4));
		assert_eq!(
			events.last(),
			Some(&Progress::Cancelled {
				completed: 1,
				total: 3,
			})
		);
	}

	#[test]
	fn test_cancellation_never_fires() {
		let cancellation = Cancellation::never();
		assert!(!cancellation.is_cancelled());
	}

	#[test]
	fn test_options_defaults() {
		let options: TrainOptions = serde_json::from_str("{}").unwrap();
		assert!(options.algorithms.is_none());
		assert!(options.hyperparameter_search);
		let options: TrainOptions =
			serde_json::from_str(r#"{"algorithms": ["RF"], "hyperparameter_search": false}"#)
				.unwrap();
		assert_eq!(options.algorithms, Some(vec!["RF".to_owned()]));
		assert!(!options.hyperparameter_search);
	}
}
