pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod summary;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::run;
pub use summary::PipelineSummary;
