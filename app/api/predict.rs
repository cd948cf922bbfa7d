use crate::{body::read_json, body::read_multipart, error::Error, Context};
use bankml_core::predict::{self, PredictRequest};
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn single(context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	let request: PredictRequest = read_json(request).await?;
	let mut rng = context.fork_rng()?;
	let delay = context.options.config.delays.predict_single();
	let prediction = predict::single(request, &mut rng, delay).await;
	crate::success(&prediction)
}

pub(crate) async fn file(context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	let mut form = read_multipart(request).await?;
	if form.file.is_none() {
		return Err(Error::bad_request("no file was found in the request").into());
	}
	let model_id = form.fields.remove("modelId");
	let mut rng = context.fork_rng()?;
	let delay = context.options.config.delays.predict_batch();
	let prediction = predict::batch(model_id, &mut rng, delay).await;
	log::info!("predicted {} rows", prediction.summary.total_predictions);
	crate::success(&prediction)
}
