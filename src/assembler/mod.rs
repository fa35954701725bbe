//! Two-pass symbolic assembler (§4.4): resolves labels, then resolves and
//! encodes every instruction against the finished label table.

mod encoder;

use std::collections::HashMap;

use crate::ast::Instruction;
use crate::errors::AssembleError;
use crate::parser::{self, RawInstr};

/// Policy knobs for assembly. The only current knob resolves the immediate
/// range Open Question (§9): by default, out-of-range immediates are
/// silently truncated to 16 bits, matching the original tool's behavior;
/// setting `strict_immediates` turns that into an [`AssembleError::ImmediateOutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrictAssembleOptions {
    pub strict_immediates: bool,
}

/// An assembled program: every instruction in source order, its 32-bit
/// encoding, and the label table used to resolve it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    encodings: Vec<u32>,
    labels: HashMap<String, usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn encoding(&self, index: usize) -> Option<u32> {
        self.encodings.get(index).copied()
    }

    /// The instruction's encoding as a fixed-width 32-character binary
    /// string, matching the original tool's display format.
    pub fn encoding_bits(&self, index: usize) -> Option<String> {
        self.encoding(index).map(|bits| format!("{bits:032b}"))
    }

    pub fn labels(&self) -> &HashMap<String, usize> {
        &self.labels
    }
}

/// Assemble with the default (truncating) options. See [`assemble_with_options`].
pub fn assemble(source: &str) -> Result<Program, AssembleError> {
    assemble_with_options(source, StrictAssembleOptions::default())
}

/// Assemble `source` into a [`Program`].
///
/// Pass 1 walks every line and binds each label to the instruction index it
/// precedes, incrementing the index only when the line also carries an
/// instruction; a label with no following instruction (including one at the
/// very end of the program) binds to the program's eventual length, which
/// lets `j end_label` express "terminate" the way real MIPS cooperates with
/// the Python original it mirrors. Pass 2 resolves and encodes each
/// instruction against the finished table.
pub fn assemble_with_options(
    source: &str,
    opts: StrictAssembleOptions,
) -> Result<Program, AssembleError> {
    let lines = parser::parse(source);

    let mut labels = HashMap::new();
    let mut index = 0usize;
    for line in &lines {
        if let Some(label) = &line.label {
            if labels.insert(label.clone(), index).is_some() {
                return Err(AssembleError::DuplicateLabel {
                    line: line.line_number,
                    label: label.clone(),
                });
            }
        }
        if line.instr.is_some() {
            index += 1;
        }
    }

    let mut instructions = Vec::new();
    let mut encodings = Vec::new();
    let mut current_index = 0usize;
    for line in &lines {
        let Some(raw) = &line.instr else { continue };
        let op = encoder::resolve(raw, line.line_number, &labels, &opts)?;
        let text = render_instruction_text(raw);
        encodings.push(encoder::encode(&op, current_index));
        instructions.push(Instruction { op, text });
        current_index += 1;
    }

    Ok(Program {
        instructions,
        encodings,
        labels,
    })
}

/// Render a parsed instruction back into its canonical `"mnemonic op1, op2,
/// op3"` display text, used for `TraceEvent::instruction_text` and
/// disassembly.
fn render_instruction_text(raw: &RawInstr) -> String {
    if raw.operands.is_empty() {
        raw.mnemonic.clone()
    } else {
        format!("{} {}", raw.mnemonic, raw.operands.join(", "))
    }
}
