//! Symbolic/numeric register name to index mapping (§4.1).

/// The 32 canonical MIPS register names, in index order.
const SYMBOLIC_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

/// Resolve a register token (including the leading `$`) to its index 0..31.
///
/// Accepts both symbolic names (`$t0`) and numeric aliases (`$r8`). Returns
/// `None` for anything else so the caller can raise `UnknownRegister`.
pub fn name_to_index(token: &str) -> Option<u8> {
    let name = token.strip_prefix('$')?;

    if let Some(digits) = name.strip_prefix('r').or_else(|| name.strip_prefix('R')) {
        let index: u8 = digits.parse().ok()?;
        return (index < 32).then_some(index);
    }

    SYMBOLIC_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(|index| index as u8)
}

/// Canonical symbolic name for a register index, used when rendering
/// disassembly and trace output.
pub fn index_to_name(index: u8) -> &'static str {
    SYMBOLIC_NAMES[index as usize]
}
