pub mod error;
pub mod progress_counter;
