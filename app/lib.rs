/*!
The http api for the bank marketing dashboard. Every route answers with json. Failures have the shape `{"success": false, "error": "..."}`.
*/

use self::error::Error;
use bankml_core::{config::Config, ModelRegistry, ValidationError};
use bankml_util::{err, error::Result};
use futures::FutureExt;
use hyper::{
	header,
	service::{make_service_fn, service_fn},
	Body, Method, Request, Response, StatusCode,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::{convert::Infallible, panic::AssertUnwindSafe, sync::Arc, sync::Mutex};

mod api;
mod body;
pub mod error;

pub struct Options {
	pub host: std::net::IpAddr,
	pub port: u16,
	pub config: Config,
}

pub struct Context {
	pub options: Options,
	pub registry: ModelRegistry,
	rng: Mutex<Xoshiro256Plus>,
}

impl Context {
	pub fn new(options: Options) -> Self {
		let rng = match options.config.seed {
			Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
			None => Xoshiro256Plus::from_entropy(),
		};
		Self {
			options,
			registry: ModelRegistry::new(),
			rng: Mutex::new(rng),
		}
	}

	/// Run `f` with the shared random source. The lock is released when `f` returns, so it is never held across an await.
	pub fn with_rng<T>(&self, f: impl FnOnce(&mut Xoshiro256Plus) -> T) -> Result<T> {
		let mut rng = self
			.rng
			.lock()
			.map_err(|_| err!("the random source lock is poisoned"))?;
		Ok(f(&mut rng))
	}

	/// Derive an independent random source for work that draws across awaits, such as a training session.
	pub fn fork_rng(&self) -> Result<Xoshiro256Plus> {
		self.with_rng(|rng| Xoshiro256Plus::seed_from_u64(rng.gen()))
	}
}

pub async fn handle(request: Request<Body>, context: Arc<Context>) -> Response<Body> {
	let method = request.method().clone();
	let path = request.uri().path().to_owned();
	let path_components: Vec<_> = path.split('/').skip(1).collect();
	let result = match (&method, path_components.as_slice()) {
		(&Method::GET, &["health"]) => self::api::health::get(&context, request).await,
		(&Method::GET, &["algorithms"]) => self::api::algorithms::get(&context, request).await,
		(&Method::POST, &["upload"]) => self::api::upload::post(&context, request).await,
		(&Method::GET, &["models"]) => self::api::models::get(&context, request).await,
		(&Method::POST, &["models"]) => self::api::models::post(&context, request).await,
		(&Method::POST, &["pipeline", "preprocess"]) => {
			self::api::pipeline::preprocess(&context, request).await
		}
		(&Method::POST, &["pipeline", "split"]) => self::api::pipeline::split(&context, request).await,
		(&Method::POST, &["train"]) => self::api::train::post(&context, request).await,
		(&Method::POST, &["predict", "single"]) => self::api::predict::single(&context, request).await,
		(&Method::POST, &["predict", "file"]) => self::api::predict::file(&context, request).await,
		(&Method::GET, &["reports", "eda"]) => self::api::reports::eda(&context, request).await,
		(&Method::POST, &["notebook", "generate"]) => {
			self::api::notebook::generate(&context, request).await
		}
		_ => Err(Error::NotFound.into()),
	};
	let response = match result {
		Ok(response) => response,
		Err(error) => {
			if let Some(error) = error.downcast_ref::<ValidationError>() {
				error_response(StatusCode::BAD_REQUEST, error.message())
			} else if let Some(error) = error.downcast_ref::<Error>() {
				match error {
					Error::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
					Error::NotFound => error_response(StatusCode::NOT_FOUND, "not found"),
				}
			} else {
				log::error!("{} {}: {:#}", method, path, error);
				error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
			}
		}
	};
	log::info!("{} {} {}", method, path, response.status().as_u16());
	response
}

/// Serialize `value` as the body of a successful response. Object bodies get `"success": true` merged in.
pub(crate) fn success<T: serde::Serialize>(value: &T) -> Result<Response<Body>> {
	let mut value = serde_json::to_value(value)?;
	if let serde_json::Value::Object(fields) = &mut value {
		fields.insert("success".to_owned(), serde_json::Value::Bool(true));
	}
	json_response(StatusCode::OK, &value)
}

fn json_response(status: StatusCode, value: &serde_json::Value) -> Result<Response<Body>> {
	let body = serde_json::to_vec(value)?;
	let response = Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))?;
	Ok(response)
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
	let body = serde_json::json!({ "success": false, "error": message });
	Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

pub fn run(options: Options) -> Result<()> {
	tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?
		.block_on(run_impl(options))
}

async fn run_impl(options: Options) -> Result<()> {
	let context = Arc::new(Context::new(options));
	let service = make_service_fn(|_| {
		let context = context.clone();
		async move {
			Ok::<_, Infallible>(service_fn(move |request: Request<Body>| {
				let method = request.method().to_owned();
				let path = request.uri().path().to_owned();
				let context = context.clone();
				async move {
					let response = AssertUnwindSafe(handle(request, context))
						.catch_unwind()
						.await
						.unwrap_or_else(|_| {
							log::error!("{} {} panicked", method, path);
							log::info!("{} {} 500", method, path);
							error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
						});
					Ok::<_, Infallible>(response)
				}
			}))
		}
	});
	let addr = std::net::SocketAddr::new(context.options.host, context.options.port);
	let listener = std::net::TcpListener::bind(&addr)?;
	listener.set_nonblocking(true)?;
	log::info!("serving on port {}", context.options.port);
	hyper::Server::from_tcp(listener)?
		.serve(service)
		.with_graceful_shutdown(shutdown_signal())
		.await?;
	log::info!("shut down");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		log::error!("failed to listen for ctrl-c: {}", error);
		futures::future::pending::<()>().await;
	}
}
