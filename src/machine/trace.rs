//! Observability stream emitted by each `step()` (§4.7): the structured log
//! this crate carries in place of a logging crate, since every fact worth
//! recording is already a state transition the caller can replay.

use serde::{Deserialize, Serialize};

use super::state::CpuState;

/// One instruction's worth of observable effect, reported by `Machine::step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub step_number: usize,
    pub pc_before: usize,
    pub instruction_text: String,
    pub encoding_bits: String,
    pub reg_deltas: Vec<(u8, i32, i32)>,
    pub mem_deltas: Vec<(usize, i32, i32)>,
    pub branch_taken: Option<bool>,
}

/// Diff `before`/`after` register files and data memories into the
/// `(index, old, new)` triples a [`TraceEvent`] carries, so the executor
/// never has to track its own writes separately from the state it mutates.
pub(crate) fn diff_deltas(
    before: &CpuState,
    after: &CpuState,
) -> (Vec<(u8, i32, i32)>, Vec<(usize, i32, i32)>) {
    let reg_deltas = before
        .registers
        .iter()
        .zip(after.registers.iter())
        .enumerate()
        .filter(|(_, (old, new))| old != new)
        .map(|(index, (&old, &new))| (index as u8, old, new))
        .collect();

    let mem_deltas = before
        .data_memory
        .iter()
        .zip(after.data_memory.iter())
        .enumerate()
        .filter(|(_, (old, new))| old != new)
        .map(|(index, (&old, &new))| (index, old, new))
        .collect();

    (reg_deltas, mem_deltas)
}
