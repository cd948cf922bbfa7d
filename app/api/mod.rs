pub mod algorithms;
pub mod health;
pub mod models;
pub mod notebook;
pub mod pipeline;
pub mod predict;
pub mod reports;
pub mod train;
pub mod upload;
