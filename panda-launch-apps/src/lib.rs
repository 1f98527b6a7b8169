mod arguments;
mod bringup_config;
mod composer;
mod error;
mod pipelines;
mod resources;
pub mod utils;

pub use arguments::*;
pub use bringup_config::*;
pub use composer::*;
pub use error::*;
pub use pipelines::*;
pub use resources::*;
