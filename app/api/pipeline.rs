use crate::{body::read_json, Context};
use bankml_core::{preprocess, split};
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn preprocess(context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	// The body carries no options, but it still has to be valid json.
	let _: serde_json::Value = read_json(request).await?;
	let summary = preprocess::run(context.options.config.delays.preprocess()).await;
	crate::success(&summary)
}

pub(crate) async fn split(context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	let options: split::SplitOptions = read_json(request).await?;
	let summary = split::run(options, context.options.config.delays.split()).await?;
	crate::success(&summary)
}
