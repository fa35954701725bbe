//! A two-pass symbolic assembler and instruction-driven execution engine for
//! a MIPS32 instruction subset. The crate is a pure, synchronous library:
//! `assemble` turns source text into a [`Program`], and [`Machine`] loads,
//! steps, and runs it while recording a [`TraceEvent`] per instruction.

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod registers;

pub mod assembler;
pub mod machine;

pub use assembler::{Program, StrictAssembleOptions, assemble, assemble_with_options};
pub use errors::{AssembleError, RuntimeError};
pub use machine::{Machine, MachineSnapshot, TraceEvent};
