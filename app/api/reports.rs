use crate::Context;
use bankml_core::report;
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn eda(_context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	crate::success(&report::eda())
}
