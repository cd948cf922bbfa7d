use crate::{body::read_json, Context};
use bankml_core::model::TrainedModelResult;
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn get(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let models = context.registry.list()?;
	crate::success(&serde_json::json!({
		"count": models.len(),
		"models": models
	}))
}

pub(crate) async fn post(context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	let model: TrainedModelResult = read_json(request).await?;
	let stored = context.registry.save(model)?;
	log::info!("saved {} as version {}", stored.id, stored.version);
	crate::success(&serde_json::json!({ "model": stored }))
}
