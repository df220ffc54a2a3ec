//! Host layer: text commands in, rendered state out.

pub mod command;
pub mod render;
mod workbench;

pub use command::{parse_line, HostCommand, ParseError};
pub use workbench::{Reply, Workbench};
