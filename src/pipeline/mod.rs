//! Orchestration: engine options, the renderer state machine, output writing and batches.

pub mod batch;
pub mod opts;
pub mod output;
pub mod render;

pub use batch::{BatchJob, BatchOutput, render_batch, render_to_file};
pub use opts::{EngineOpts, FilterMode};
pub use output::{output_path, write_output};
pub use render::{Rendered, Renderer, render_setup};
