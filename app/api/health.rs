use crate::Context;
use bankml_util::error::Result;
use hyper::{Body, Request, Response, StatusCode};

pub(crate) async fn get(_context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	Ok(Response::builder()
		.status(StatusCode::OK)
		.body(Body::empty())?)
}
