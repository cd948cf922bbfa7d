//! This module contains the main entrypoint to the bankml cli.

use bankml_core::{
	config::{load_config, Config},
	progress::Progress,
	Cancellation, SimulatedTrainer, TrainOptions as SessionOptions, TrainingSession,
};
use bankml_util::error::Result;
use clap::Parser;
use colored::Colorize;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::{fs::File, io::BufWriter, path::PathBuf};

#[derive(Parser)]
#[clap(
	about = "Run the simulated bank marketing machine learning workflow.",
	disable_help_subcommand = true
)]
enum Options {
	#[clap(name = "train")]
	Train(TrainOptions),
	#[clap(name = "app")]
	App(AppOptions),
}

#[derive(Parser, Debug)]
#[clap(about = "train the selected algorithms")]
#[clap(long_about = "train the selected algorithms one after another and print the leaderboard")]
struct TrainOptions {
	#[clap(
		short,
		long = "algorithm",
		help = "the abbreviation of an algorithm to train, may be repeated (default: all)"
	)]
	algorithms: Vec<String>,
	#[clap(long = "no-hyperparameter-search", parse(from_flag = std::ops::Not::not))]
	hyperparameter_search: bool,
	#[clap(short, long, env = "CONFIG", help = "the path to a yaml or json config file")]
	config: Option<PathBuf>,
	#[clap(long, env = "SEED", help = "the seed of the random source")]
	seed: Option<u64>,
	#[clap(short, long, help = "the path to write the leaderboard json to")]
	output: Option<PathBuf>,
	#[clap(long = "no-progress", help = "do not print progress", parse(from_flag = std::ops::Not::not))]
	progress: bool,
}

#[derive(Parser)]
#[clap(about = "run the app")]
#[clap(long_about = "run the http api behind the dashboard")]
struct AppOptions {
	#[clap(long, env = "HOST", default_value = "0.0.0.0")]
	host: std::net::IpAddr,
	#[clap(long, env = "PORT", default_value = "8080")]
	port: u16,
	#[clap(short, long, env = "CONFIG", help = "the path to a yaml or json config file")]
	config: Option<PathBuf>,
	#[clap(long, env = "SEED", help = "the seed of the random source")]
	seed: Option<u64>,
}

fn main() {
	setup_logging();
	let options = Options::parse();
	let result = match options {
		Options::Train(options) => cli_train(options),
		Options::App(options) => cli_app(options),
	};
	if let Err(error) = result {
		eprintln!("{}: {}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn setup_logging() {
	let env = env_logger::Env::default()
		.default_filter_or("bankml_app=info,bankml_core=info,bankml_cli=info");
	env_logger::Builder::from_env(env)
		.format_level(false)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
}

fn config(path: Option<&std::path::Path>, seed: Option<u64>) -> Result<Config> {
	let mut config = load_config(path)?;
	if seed.is_some() {
		config.seed = seed;
	}
	Ok(config)
}

fn cli_train(options: TrainOptions) -> Result<()> {
	let config = config(options.config.as_deref(), options.seed)?;
	let rng = match config.seed {
		Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
		None => Xoshiro256Plus::from_entropy(),
	};
	let mut trainer = SimulatedTrainer::new(rng, config.delays.train());
	let session_options = SessionOptions {
		algorithms: if options.algorithms.is_empty() {
			None
		} else {
			Some(options.algorithms.clone())
		},
		hyperparameter_search: options.hyperparameter_search,
	};
	let show_progress = options.progress;
	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()?;
	let session = runtime.block_on(async {
		// Ctrl-c stops the session and keeps the models trained so far.
		let (handle, mut cancellation) = Cancellation::new();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				handle.cancel();
			}
		});
		bankml_core::train(
			session_options,
			&mut trainer,
			&mut cancellation,
			&mut |progress| {
				if show_progress {
					eprintln!(
						"[{:>3.0}%] {}",
						progress.fraction() * 100.0,
						describe(&progress)
					);
				}
			},
		)
		.await
	})?;
	print_leaderboard(&session);
	if let Some(output_path) = options.output {
		let writer = BufWriter::new(File::create(&output_path)?);
		let leaderboard = serde_json::json!({
			"results": session.leaderboard(),
			"best_model": session.best().map(|model| model.abbreviation.as_str()),
			"skipped": session.skipped,
			"failed": session.failed
		});
		serde_json::to_writer_pretty(writer, &leaderboard)?;
		eprintln!("The leaderboard was written to {}.", output_path.display());
	}
	Ok(())
}

fn describe(progress: &Progress) -> String {
	match progress {
		Progress::Started { total, skipped } if skipped.is_empty() => {
			format!("training {} algorithms", total)
		}
		Progress::Started { total, skipped } => format!(
			"training {} algorithms, skipping unknown {}",
			total,
			skipped.join(", ")
		),
		Progress::Training {
			index,
			total,
			abbreviation,
		} => format!("training {} ({} of {})", abbreviation, index + 1, total),
		Progress::Completed { abbreviation, .. } => format!("trained {}", abbreviation),
		Progress::Failed {
			abbreviation,
			message,
			..
		} => format!("failed to train {}: {}", abbreviation, message),
		Progress::Cancelled { completed, total } => {
			format!("cancelled after {} of {}", completed, total)
		}
		Progress::Finished { trained, total } => format!("trained {} of {}", trained, total),
	}
}

fn print_leaderboard(session: &TrainingSession) {
	if session.results.is_empty() {
		println!("No models were trained.");
		return;
	}
	println!(
		"{:<4} {:<6} {:>8} {:>8} {:>9} {:>8} {:>8}",
		"rank", "model", "f1", "accuracy", "precision", "recall", "roc auc"
	);
	for (rank, result) in session.leaderboard().iter().enumerate() {
		let metrics = &result.metrics;
		println!(
			"{:<4} {:<6} {:>8.4} {:>8.4} {:>9.4} {:>8.4} {:>8.4}",
			rank + 1,
			result.abbreviation,
			metrics.f1_score,
			metrics.accuracy,
			metrics.precision,
			metrics.recall,
			metrics.roc_auc
		);
	}
	if let Some(best) = session.best() {
		println!("The best model is {} ({}).", best.algorithm, best.abbreviation.bold());
	}
	if session.cancelled {
		println!("Training was cancelled before every algorithm finished.");
	}
}

fn cli_app(options: AppOptions) -> Result<()> {
	let config = config(options.config.as_deref(), options.seed)?;
	bankml_app::run(bankml_app::Options {
		host: options.host,
		port: options.port,
		config,
	})
}
