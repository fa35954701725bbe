//! The closed, pass-2-resolved instruction set (design note in §9: a tagged
//! `Op` enum instead of a mnemonic string chain, so the executor's match is
//! compile-time exhaustive rather than falling through to "unknown opcode").

use serde::{Deserialize, Serialize};

/// The third operand of `sll`/`srl`: either a literal shift amount fixed at
/// assembly time, or a register whose low 5 bits are read at execution
/// time (§4.6 "Shift operand").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftAmount {
    Immediate(u8),
    Register(u8),
}

/// One fully resolved instruction: registers are numeric indices, branch
/// and jump targets are instruction indices. `imm`/`offset` carry the full
/// 32-bit execution-time value (matching the reference behavior, where the
/// 16-bit field width only bounds the *encoded* bit pattern, not the value
/// `Machine::step` actually adds); the encoder truncates separately when it
/// packs these into an instruction word. Produced by the assembler's second
/// pass; consumed by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add { rd: u8, rs: u8, rt: u8 },
    Sub { rd: u8, rs: u8, rt: u8 },
    And { rd: u8, rs: u8, rt: u8 },
    Or { rd: u8, rs: u8, rt: u8 },
    Slt { rd: u8, rs: u8, rt: u8 },
    Sll { rd: u8, rt: u8, shamt: ShiftAmount },
    Srl { rd: u8, rt: u8, shamt: ShiftAmount },
    Addi { rt: u8, rs: u8, imm: i32 },
    Lw { rt: u8, rs: u8, offset: i32 },
    Sw { rt: u8, rs: u8, offset: i32 },
    Beq { rs: u8, rt: u8, target: usize },
    Bne { rs: u8, rt: u8, target: usize },
    J { target: usize },
    Jal { target: usize },
    Jr { rs: u8 },
}

/// An assembled instruction: the resolved [`Op`] plus the exact source text
/// it came from, carried for disassembly and `TraceEvent::instruction_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Op,
    pub text: String,
}
