//! Comment stripping and physical-line cleanup (§4.2).

/// A source line after comments have been stripped and surrounding
/// whitespace trimmed. Empty lines never appear in the output of [`lex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedLine {
    /// 1-based line number in the original source, kept for diagnostics.
    pub line_number: usize,
    /// Comment-free, trimmed line content. May still contain a `label:`
    /// prefix — the parser is responsible for splitting that out.
    pub text: String,
}

/// Strip everything from the first `#` to end-of-line.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Split source text into cleaned, non-empty lines.
pub fn lex(source: &str) -> Vec<LexedLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(zero_based, raw)| {
            let text = strip_comment(raw).trim();
            if text.is_empty() {
                None
            } else {
                Some(LexedLine {
                    line_number: zero_based + 1,
                    text: text.to_string(),
                })
            }
        })
        .collect()
}

/// Split an instruction body into whitespace/comma-delimited tokens,
/// preserving an `offset(base)` operand as a single token.
pub fn tokenize(body: &str) -> Vec<String> {
    body.replace(',', " ")
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}
