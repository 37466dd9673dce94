//! Shell tools for command execution

mod execute;

pub use execute::{RunCommand, DEFAULT_TIMEOUT_SECS};
