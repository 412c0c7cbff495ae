//! Utility functions for fetchmux

pub mod cookies;
pub mod url;

pub use cookies::*;
pub use url::*;
