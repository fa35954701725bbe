//! Per-opcode execution semantics (§4.6).

use crate::ast::{Op, ShiftAmount};
use crate::errors::RuntimeError;

use super::state::{CpuState, DATA_MEMORY_WORDS};

/// What executing one instruction did to control flow, beyond the register
/// and memory writes already applied to `state`.
#[derive(Debug)]
pub struct StepEffect {
    pub next_pc: usize,
    pub branch_taken: Option<bool>,
}

fn shift_distance(state: &CpuState, shamt: ShiftAmount) -> u32 {
    match shamt {
        ShiftAmount::Immediate(value) => value as u32,
        ShiftAmount::Register(index) => state.read_register(index) as u32 & 0x1F,
    }
}

fn data_memory_address(
    rs_value: i32,
    offset: i32,
    pc: usize,
    instruction_text: &str,
) -> Result<usize, RuntimeError> {
    let address = rs_value as i64 + offset as i64;
    if address < 0 || address % 4 != 0 || (address / 4) as usize >= DATA_MEMORY_WORDS {
        return Err(RuntimeError::MemoryFault {
            pc,
            instruction_text: instruction_text.to_string(),
            address,
        });
    }
    Ok((address / 4) as usize)
}

/// Execute one instruction against `state`, returning where the program
/// counter goes next. `pc` and `instruction_text` are carried only for
/// error reporting (§7).
pub fn execute(
    state: &mut CpuState,
    op: &Op,
    pc: usize,
    instruction_text: &str,
    program_len: usize,
) -> Result<StepEffect, RuntimeError> {
    let fallthrough = StepEffect {
        next_pc: pc + 1,
        branch_taken: None,
    };

    match *op {
        Op::Add { rd, rs, rt } => {
            state.write_register(rd, state.read_register(rs).wrapping_add(state.read_register(rt)));
            Ok(fallthrough)
        }
        Op::Sub { rd, rs, rt } => {
            state.write_register(rd, state.read_register(rs).wrapping_sub(state.read_register(rt)));
            Ok(fallthrough)
        }
        Op::And { rd, rs, rt } => {
            state.write_register(rd, state.read_register(rs) & state.read_register(rt));
            Ok(fallthrough)
        }
        Op::Or { rd, rs, rt } => {
            state.write_register(rd, state.read_register(rs) | state.read_register(rt));
            Ok(fallthrough)
        }
        Op::Slt { rd, rs, rt } => {
            let value = if state.read_register(rs) < state.read_register(rt) { 1 } else { 0 };
            state.write_register(rd, value);
            Ok(fallthrough)
        }
        Op::Sll { rd, rt, shamt } => {
            let distance = shift_distance(state, shamt);
            state.write_register(rd, ((state.read_register(rt) as u32) << distance) as i32);
            Ok(fallthrough)
        }
        Op::Srl { rd, rt, shamt } => {
            let distance = shift_distance(state, shamt);
            state.write_register(rd, ((state.read_register(rt) as u32) >> distance) as i32);
            Ok(fallthrough)
        }
        Op::Addi { rt, rs, imm } => {
            state.write_register(rt, state.read_register(rs).wrapping_add(imm));
            Ok(fallthrough)
        }
        Op::Lw { rt, rs, offset } => {
            let word = data_memory_address(state.read_register(rs), offset, pc, instruction_text)?;
            state.write_register(rt, state.data_memory[word]);
            Ok(fallthrough)
        }
        Op::Sw { rt, rs, offset } => {
            let word = data_memory_address(state.read_register(rs), offset, pc, instruction_text)?;
            state.data_memory[word] = state.read_register(rt);
            Ok(fallthrough)
        }
        Op::Beq { rs, rt, target } => {
            let taken = state.read_register(rs) == state.read_register(rt);
            Ok(StepEffect {
                next_pc: if taken { target } else { pc + 1 },
                branch_taken: Some(taken),
            })
        }
        Op::Bne { rs, rt, target } => {
            let taken = state.read_register(rs) != state.read_register(rt);
            Ok(StepEffect {
                next_pc: if taken { target } else { pc + 1 },
                branch_taken: Some(taken),
            })
        }
        Op::J { target } => Ok(StepEffect {
            next_pc: target,
            branch_taken: None,
        }),
        Op::Jal { target } => {
            state.write_register(31, (pc + 1) as i32);
            Ok(StepEffect {
                next_pc: target,
                branch_taken: None,
            })
        }
        Op::Jr { rs } => {
            let target = state.read_register(rs) as i64;
            if target < 0 || target as usize > program_len {
                return Err(RuntimeError::JumpOutOfRange {
                    pc,
                    instruction_text: instruction_text.to_string(),
                    target,
                });
            }
            Ok(StepEffect {
                next_pc: target as usize,
                branch_taken: None,
            })
        }
    }
}
