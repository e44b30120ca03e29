// runner/mod.rs
pub mod command_line;
pub mod tool;

pub use command_line::{build_command_line, exec, format_command_line, RunOptions};
pub use tool::Tool;
