pub mod date;
pub(crate) mod lenient;
mod project;

pub use project::*;
