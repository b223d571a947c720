//! Pipeline components: orchestrator, run context, post-processing, error decoration.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod postprocess;

pub use context::RunContext;
pub use error_handler::annotate_for_input;
pub use orchestrator::{InputNamer, Pipeline};
pub use postprocess::{FileMapper, apply_postprocessors};
