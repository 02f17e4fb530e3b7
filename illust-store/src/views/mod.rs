//! Read-only projections over a project snapshot.

mod calendar;
mod list;
mod summary;

pub use calendar::*;
pub use list::*;
pub use summary::*;
