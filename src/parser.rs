//! Label/instruction recognition over the lexer's cleaned lines (§4.3).

use crate::lexer::{self, LexedLine};

/// A mnemonic plus its raw, untyped operand tokens. Operand counts and
/// register validity are not checked here — that happens in the assembler's
/// second pass, once labels are known and every mnemonic's exact arity is
/// in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstr {
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// One logical source line: an optional label definition, an optional
/// instruction, or both (`LOOP: addi $t0, $t0, -1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub line_number: usize,
    pub label: Option<String>,
    pub instr: Option<RawInstr>,
}

/// Tokenize and structurally classify every line of `source`.
///
/// This never fails: an unrecognized mnemonic or a malformed operand is a
/// pass-2 concern (§4.4), since resolving them requires the label table and
/// per-mnemonic arity knowledge this stage intentionally does not have.
pub fn parse(source: &str) -> Vec<Line> {
    lexer::lex(source).into_iter().map(parse_line).collect()
}

fn parse_line(lexed: LexedLine) -> Line {
    let LexedLine { line_number, text } = lexed;

    let (label, rest) = match text.find(':') {
        Some(colon) => (
            Some(text[..colon].trim().to_string()),
            text[colon + 1..].trim(),
        ),
        None => (None, text.as_str()),
    };

    let instr = if rest.is_empty() {
        None
    } else {
        let mut tokens = lexer::tokenize(rest);
        let mnemonic = tokens.remove(0).to_lowercase();
        Some(RawInstr {
            mnemonic,
            operands: tokens,
        })
    };

    Line {
        line_number,
        label,
        instr,
    }
}
