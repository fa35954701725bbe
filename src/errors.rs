//! Closed error taxonomy for the assembler and the executor (§7).

use thiserror::Error;

/// Errors raised while turning source text into a [`crate::assembler::Program`].
///
/// Covers both the parse-time and link-time (pass 2) taxonomy from the
/// design: every variant carries the 1-based source line it was diagnosed
/// on so a caller can point a user at the offending text without
/// re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum AssembleError {
    #[error("line {line}: unknown opcode {mnemonic:?}")]
    UnknownOpcode { line: usize, mnemonic: String },

    #[error("line {line}: unknown register {token:?}")]
    UnknownRegister { line: usize, token: String },

    #[error("line {line}: malformed operand {token:?}: {reason}")]
    MalformedOperand {
        line: usize,
        token: String,
        reason: String,
    },

    #[error("line {line}: {mnemonic} expects {expected} operand(s), got {actual}")]
    WrongOperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: duplicate label {label:?}")]
    DuplicateLabel { line: usize, label: String },

    #[error("line {line}: unresolved label {label:?}")]
    UnresolvedLabel { line: usize, label: String },

    #[error("line {line}: immediate {value} out of range for a 16-bit field")]
    ImmediateOutOfRange { line: usize, value: i64 },
}

/// Errors raised while executing an already-assembled [`crate::assembler::Program`].
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum RuntimeError {
    #[error(
        "memory fault at pc={pc} ({instruction_text}): address {address} is unaligned or out of range"
    )]
    MemoryFault {
        pc: usize,
        instruction_text: String,
        address: i64,
    },

    #[error("pc={pc} ({instruction_text}): jr targets non-existent instruction index {target}")]
    JumpOutOfRange {
        pc: usize,
        instruction_text: String,
        target: i64,
    },

    #[error("instruction limit of {limit} exceeded without reaching a terminal pc")]
    InstructionLimitExceeded { limit: usize },
}
