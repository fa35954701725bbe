//! Operand resolution and bit-packing for R/I/J-format instructions (§4.4).

use std::collections::HashMap;

use crate::ast::{Op, ShiftAmount};
use crate::errors::AssembleError;
use crate::parser::RawInstr;
use crate::registers;

use super::StrictAssembleOptions;

fn reg(token: &str, line: usize) -> Result<u8, AssembleError> {
    registers::name_to_index(token).ok_or_else(|| AssembleError::UnknownRegister {
        line,
        token: token.to_string(),
    })
}

fn expect_operands(
    operands: &[String],
    line: usize,
    mnemonic: &str,
    expected: usize,
) -> Result<(), AssembleError> {
    if operands.len() == expected {
        Ok(())
    } else {
        Err(AssembleError::WrongOperandCount {
            line,
            mnemonic: mnemonic.to_string(),
            expected,
            actual: operands.len(),
        })
    }
}

fn parse_signed(token: &str, line: usize) -> Result<i64, AssembleError> {
    token
        .parse::<i64>()
        .map_err(|_| AssembleError::MalformedOperand {
            line,
            token: token.to_string(),
            reason: "expected a signed decimal integer".to_string(),
        })
}

/// Split a `signed_int(register)` token into its offset and base register.
fn parse_mem_operand(token: &str, line: usize) -> Result<(i64, u8), AssembleError> {
    let malformed = || AssembleError::MalformedOperand {
        line,
        token: token.to_string(),
        reason: "expected offset(register), e.g. 4($sp)".to_string(),
    };

    let open = token.find('(').ok_or_else(malformed)?;
    if !token.ends_with(')') {
        return Err(malformed());
    }

    let offset = parse_signed(token[..open].trim(), line)?;
    let base = reg(token[open + 1..token.len() - 1].trim(), line)?;
    Ok((offset, base))
}

/// Validate (in strict mode) that `value` fits the 16-bit field `addi`,
/// `lw`, and `sw` encode their immediate into, per §4.4's
/// default-truncating / `strict_immediates` policy. Either way, the value
/// returned is the *full* 32-bit execution-time value — the reference
/// behavior only truncates the encoded bit pattern (see [`i_format`]
/// call sites), never the value the executor actually adds.
fn resolve_immediate(value: i64, line: usize, strict: bool) -> Result<i32, AssembleError> {
    if strict && !(i16::MIN as i64..=i16::MAX as i64).contains(&value) {
        return Err(AssembleError::ImmediateOutOfRange { line, value });
    }
    Ok(value as i32)
}

fn resolve_label(
    target: &str,
    line: usize,
    labels: &HashMap<String, usize>,
) -> Result<usize, AssembleError> {
    labels
        .get(target)
        .copied()
        .ok_or_else(|| AssembleError::UnresolvedLabel {
            line,
            label: target.to_string(),
        })
}

/// Resolve the third `sll`/`srl` operand: a literal (masked to 5 bits right
/// away, since the encoded field is a fixed-width bit pattern) or a
/// register, whose value is read fresh at execution time (§4.6).
fn shift_amount(token: &str, line: usize) -> Result<ShiftAmount, AssembleError> {
    if let Ok(value) = token.parse::<i64>() {
        Ok(ShiftAmount::Immediate((value as u32 & 0x1F) as u8))
    } else {
        Ok(ShiftAmount::Register(reg(token, line)?))
    }
}

/// Resolve one parsed instruction into its typed, pass-2 [`Op`]. `current_index`
/// is this instruction's own instruction index (used for relative branch math
/// by [`encode`], not needed here since branch/jump targets are stored as
/// absolute instruction indices).
pub fn resolve(
    raw: &RawInstr,
    line: usize,
    labels: &HashMap<String, usize>,
    opts: &StrictAssembleOptions,
) -> Result<Op, AssembleError> {
    let ops = &raw.operands;
    let mnemonic = raw.mnemonic.as_str();

    match mnemonic {
        "add" | "sub" | "and" | "or" | "slt" => {
            expect_operands(ops, line, mnemonic, 3)?;
            let rd = reg(&ops[0], line)?;
            let rs = reg(&ops[1], line)?;
            let rt = reg(&ops[2], line)?;
            Ok(match mnemonic {
                "add" => Op::Add { rd, rs, rt },
                "sub" => Op::Sub { rd, rs, rt },
                "and" => Op::And { rd, rs, rt },
                "or" => Op::Or { rd, rs, rt },
                _ => Op::Slt { rd, rs, rt },
            })
        }

        "sll" | "srl" => {
            expect_operands(ops, line, mnemonic, 3)?;
            let rd = reg(&ops[0], line)?;
            let rt = reg(&ops[1], line)?;
            let shamt = shift_amount(&ops[2], line)?;
            Ok(if mnemonic == "sll" {
                Op::Sll { rd, rt, shamt }
            } else {
                Op::Srl { rd, rt, shamt }
            })
        }

        "jr" => {
            expect_operands(ops, line, mnemonic, 1)?;
            Ok(Op::Jr {
                rs: reg(&ops[0], line)?,
            })
        }

        "addi" => {
            expect_operands(ops, line, mnemonic, 3)?;
            let rt = reg(&ops[0], line)?;
            let rs = reg(&ops[1], line)?;
            let imm = resolve_immediate(parse_signed(&ops[2], line)?, line, opts.strict_immediates)?;
            Ok(Op::Addi { rt, rs, imm })
        }

        "lw" | "sw" => {
            expect_operands(ops, line, mnemonic, 2)?;
            let rt = reg(&ops[0], line)?;
            let (raw_offset, rs) = parse_mem_operand(&ops[1], line)?;
            let offset = resolve_immediate(raw_offset, line, opts.strict_immediates)?;
            Ok(if mnemonic == "lw" {
                Op::Lw { rt, rs, offset }
            } else {
                Op::Sw { rt, rs, offset }
            })
        }

        "beq" | "bne" => {
            expect_operands(ops, line, mnemonic, 3)?;
            let rs = reg(&ops[0], line)?;
            let rt = reg(&ops[1], line)?;
            let target = resolve_label(&ops[2], line, labels)?;
            Ok(if mnemonic == "beq" {
                Op::Beq { rs, rt, target }
            } else {
                Op::Bne { rs, rt, target }
            })
        }

        "j" | "jal" => {
            expect_operands(ops, line, mnemonic, 1)?;
            let target = resolve_label(&ops[0], line, labels)?;
            Ok(if mnemonic == "j" {
                Op::J { target }
            } else {
                Op::Jal { target }
            })
        }

        _ => Err(AssembleError::UnknownOpcode {
            line,
            mnemonic: mnemonic.to_string(),
        }),
    }
}

fn r_format(rs: u8, rt: u8, rd: u8, shamt: u8, funct: u8) -> u32 {
    ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | ((shamt as u32) << 6) | funct as u32
}

fn i_format(opcode: u8, rs: u8, rt: u8, imm16: u16) -> u32 {
    ((opcode as u32) << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm16 as u32
}

fn j_format(opcode: u8, addr26: u32) -> u32 {
    ((opcode as u32) << 26) | (addr26 & 0x03FF_FFFF)
}

fn shamt_bits(shamt: ShiftAmount) -> u8 {
    match shamt {
        ShiftAmount::Immediate(value) => value & 0x1F,
        // The register-carrying shamt is a non-standard extension (§4.6):
        // its value isn't known until execution, so the static field is 0.
        ShiftAmount::Register(_) => 0,
    }
}

/// Encode a resolved [`Op`] into its 32-bit bit pattern. `current_index` is
/// this instruction's own index, needed to compute `beq`/`bne`'s
/// instruction-relative offset field (§4.4's immediate semantics).
pub fn encode(op: &Op, current_index: usize) -> u32 {
    match *op {
        Op::Add { rd, rs, rt } => r_format(rs, rt, rd, 0, 0b100000),
        Op::Sub { rd, rs, rt } => r_format(rs, rt, rd, 0, 0b100010),
        Op::And { rd, rs, rt } => r_format(rs, rt, rd, 0, 0b100100),
        Op::Or { rd, rs, rt } => r_format(rs, rt, rd, 0, 0b100101),
        Op::Slt { rd, rs, rt } => r_format(rs, rt, rd, 0, 0b101010),
        Op::Sll { rd, rt, shamt } => r_format(0, rt, rd, shamt_bits(shamt), 0b000000),
        Op::Srl { rd, rt, shamt } => r_format(0, rt, rd, shamt_bits(shamt), 0b000010),
        Op::Jr { rs } => r_format(rs, 0, 0, 0, 0b001000),
        Op::Addi { rt, rs, imm } => i_format(0b001000, rs, rt, imm as u16),
        Op::Lw { rt, rs, offset } => i_format(0b100011, rs, rt, offset as u16),
        Op::Sw { rt, rs, offset } => i_format(0b101011, rs, rt, offset as u16),
        Op::Beq { rs, rt, target } => {
            let offset = target as i64 - (current_index as i64 + 1);
            i_format(0b000100, rs, rt, offset as i16 as u16)
        }
        Op::Bne { rs, rt, target } => {
            let offset = target as i64 - (current_index as i64 + 1);
            i_format(0b000101, rs, rt, offset as i16 as u16)
        }
        Op::J { target } => j_format(0b000010, target as u32 & 0x03FF_FFFF),
        Op::Jal { target } => j_format(0b000011, target as u32 & 0x03FF_FFFF),
    }
}
