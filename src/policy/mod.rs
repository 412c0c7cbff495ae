//! Stream selection, output layout and track alignment policy

pub mod align;
pub mod layout;
pub mod query;

pub use align::*;
pub use layout::*;
pub use query::*;
