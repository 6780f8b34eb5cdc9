//! Pipeline components: context, decode, workers, orchestration, lifecycle.

pub mod context;
pub mod decode;
pub mod lifecycle;
pub mod orchestrator;
pub mod worker;

pub use context::PipelineContext;
pub use decode::{discover_files, spawn_decode_thread};
pub use lifecycle::{mark_processed, processed_path_for};
pub use orchestrator::run_load;
pub use worker::spawn_line_workers;
