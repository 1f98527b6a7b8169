//! Text-level tooling for bringup configuration: `$(command)` / `${ENV}`
//! evaluation and dotted-path overwrite scripts over YAML documents.

mod evaluate;
mod overwrite;

pub use evaluate::*;
pub use overwrite::*;
