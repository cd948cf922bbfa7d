use crate::{body::read_multipart, Context};
use bankml_core::upload::{self, UploadedFile};
use bankml_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn post(_context: &Context, request: Request<Body>) -> Result<Response<Body>> {
	let form = read_multipart(request).await?;
	let file = form.file.map(|file| UploadedFile {
		filename: file.filename,
		content_type: file.content_type,
		size: file.size,
	});
	let summary = upload::validate(file)?;
	log::info!("accepted upload {} ({} bytes)", summary.filename, summary.size);
	crate::success(&summary)
}
