//! Setup tree access and the construction step producing resolved instructions.

pub mod model;
pub mod props;
pub mod resolve;

pub use model::{
    CanvasPlan, GraphicSetup, Instruction, InstructionKind, Positioned, ResolvedSetup,
};
pub use props::Props;
pub use resolve::{SetupResolver, resolve_setup};
