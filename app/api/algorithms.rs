use crate::Context;
use bankml_core::algorithms::{AlgorithmDescriptor, ALGORITHMS};
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn get(_context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let algorithms: Vec<AlgorithmDescriptor> = ALGORITHMS.iter().map(Into::into).collect();
	crate::success(&serde_json::json!({ "algorithms": algorithms }))
}
