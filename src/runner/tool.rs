// runner/tool.rs

use clap::ValueEnum;

/// Programs the simulation can be wrapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tool {
    Lldb,
    Gdb,
    Memcheck,
    Callgrind,
}

impl Tool {
    /// Arguments placed before the simulation executable.
    pub fn prefix(self) -> &'static [&'static str] {
        match self {
            Tool::Lldb => &["lldb", "--"],
            Tool::Gdb => &["gdb", "--args"],
            Tool::Memcheck => &[
                "valgrind",
                "--tool=memcheck",
                "--leak-check=full",
                "--dsymutil=yes",
                "--log-file=valgrind.out",
            ],
            Tool::Callgrind => &[
                "valgrind",
                "--tool=callgrind",
                "--dsymutil=yes",
                "--log-file=callgrind.out",
            ],
        }
    }
}
