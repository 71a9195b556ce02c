pub mod aggregate;
pub mod codec;
pub mod config;
pub mod copy;
pub mod discovery;
pub mod error;
pub mod io;
pub mod model;
pub mod prompt;

pub use error::{Result, ToolError};
