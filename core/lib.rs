/*!
The simulated machine learning workflow behind the bank marketing dashboard. Every step here fabricates its output. Metrics come from a seedable random source and saved models live in memory for the lifetime of the process.
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod algorithms;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod notebook;
pub mod predict;
pub mod preprocess;
pub mod progress;
pub mod registry;
pub mod report;
pub mod split;
pub mod train;
pub mod upload;

pub use self::{
	error::ValidationError,
	registry::ModelRegistry,
	train::{train, Cancellation, SimulatedTrainer, TrainOptions, Trainer, TrainingSession},
};
