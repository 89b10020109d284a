//! Pipeline graph
//!
//! This module holds the owned tree produced by the parser and the helpers
//! consumers use to look blocks up by name and check cross references.

mod description;
mod references;

pub use description::*;
pub use references::UnresolvedReference;
