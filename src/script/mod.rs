//! Embedded object scripting
//!
//! Programs are newline-delimited byte buffers executed incrementally, a
//! bounded number of instructions per tick, so all in-world scripts are
//! cooperatively multitasked. The first byte of each line selects its
//! instruction class; `#` lines carry keyword ("crunch") commands.

mod commands;
pub mod direction;
mod interpreter;
pub mod program;
pub mod text;

pub use interpreter::run;
pub use program::ProgramBuffer;
