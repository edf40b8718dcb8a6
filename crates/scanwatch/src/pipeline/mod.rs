pub mod config;
pub mod error;
pub mod progress;
pub mod runner;
pub mod staging;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use progress::{JobPhase, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::Pipeline;
pub use staging::StagingArea;
