use crate::{body::read_json, Context};
use bankml_core::{train, Cancellation, SimulatedTrainer, TrainOptions};
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

/// Train the selected algorithms one after another and answer with the leaderboard. Dropping the request future stops the session.
pub(crate) async fn post(context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	let options: TrainOptions = read_json(request).await?;
	let mut trainer = SimulatedTrainer::new(context.fork_rng()?, context.options.config.delays.train());
	let mut cancellation = Cancellation::never();
	let session = train(options, &mut trainer, &mut cancellation, &mut |progress| {
		log::info!("training {:.0}%: {:?}", progress.fraction() * 100.0, progress);
	})
	.await?;
	let leaderboard = session.leaderboard();
	crate::success(&serde_json::json!({
		"results": leaderboard,
		"best_model": session.best().map(|model| model.abbreviation.as_str()),
		"total_trained": session.results.len(),
		"hyperparameter_search_enabled": session.hyperparameter_search,
		"skipped": session.skipped,
		"failed": session.failed
	}))
}
