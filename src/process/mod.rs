//! Builder and Runner backed by real child processes.

pub mod command;
pub mod host;
pub mod make;

pub use command::{CommandOutcome, OutputMode, describe, execute};
pub use host::HostRunner;
pub use make::MakeBuilder;
