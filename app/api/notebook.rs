use crate::Context;
use bankml_core::notebook;
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn generate(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let generated = notebook::generate(context.options.config.delays.notebook()).await;
	crate::success(&generated)
}
