//! The public execution façade: load a [`Program`], step or run it, and
//! observe it through snapshots and a trace (§4.5-§4.8).

mod executor;
mod state;
mod trace;

use crate::assembler::Program;
use crate::errors::RuntimeError;

pub use state::MachineSnapshot;
pub use trace::TraceEvent;

use state::CpuState;

/// An instruction-driven MIPS machine: a loaded [`Program`], its
/// architectural state, and the trace of every step taken since the last
/// `load`/`reset`.
pub struct Machine {
    program: Program,
    state: CpuState,
    instruction_count: usize,
    trace: Vec<TraceEvent>,
}

impl Machine {
    /// An empty machine with no program loaded. `step`/`run` are no-ops
    /// until [`Machine::load`] is called.
    pub fn new() -> Self {
        Self {
            program: Program::default(),
            state: CpuState::new(),
            instruction_count: 0,
            trace: Vec::new(),
        }
    }

    /// Load `program`, resetting all architectural state and the trace.
    pub fn load(&mut self, program: Program) {
        self.program = program;
        self.reset();
    }

    /// Reset registers, data memory, and the program counter to zero, and
    /// clear the trace, without discarding the loaded program.
    pub fn reset(&mut self) {
        self.state = CpuState::new();
        self.instruction_count = 0;
        self.trace.clear();
    }

    /// Whether `pc` has run off the end of the loaded program.
    pub fn halted(&self) -> bool {
        self.state.pc >= self.program.len()
    }

    /// Execute the instruction at the current `pc` and advance it.
    ///
    /// Returns `Ok(None)` once the machine is halted (so callers can poll
    /// `step()` in a loop without special-casing the terminal condition),
    /// or the [`TraceEvent`] recorded for the instruction just executed.
    pub fn step(&mut self) -> Result<Option<TraceEvent>, RuntimeError> {
        if self.halted() {
            return Ok(None);
        }

        let pc_before = self.state.pc;
        let instruction = self.program.instruction(pc_before).expect("checked by halted()");
        let encoding_bits = self
            .program
            .encoding_bits(pc_before)
            .expect("checked by halted()");

        let before = self.state.clone();
        let effect = executor::execute(
            &mut self.state,
            &instruction.op,
            pc_before,
            &instruction.text,
            self.program.len(),
        )?;
        self.state.pc = effect.next_pc;
        self.instruction_count += 1;

        let (reg_deltas, mem_deltas) = trace::diff_deltas(&before, &self.state);
        let event = TraceEvent {
            step_number: self.instruction_count,
            pc_before,
            instruction_text: instruction.text.clone(),
            encoding_bits,
            reg_deltas,
            mem_deltas,
            branch_taken: effect.branch_taken,
        };
        self.trace.push(event.clone());
        Ok(Some(event))
    }

    /// Step until halted or `limit` instructions have executed, whichever
    /// comes first. With `limit = None`, uses `10 * program.len() + 1000` as
    /// a runaway-loop backstop, generous enough for any terminating program
    /// this instruction set can express while still catching a true
    /// infinite loop in finite time.
    pub fn run(&mut self, limit: Option<usize>) -> Result<(), RuntimeError> {
        let limit = limit.unwrap_or(10 * self.program.len() + 1000);
        for _ in 0..limit {
            if self.step()?.is_none() {
                return Ok(());
            }
        }
        if self.halted() {
            Ok(())
        } else {
            Err(RuntimeError::InstructionLimitExceeded { limit })
        }
    }

    /// A point-in-time view of registers, memory, pc, labels, and halted
    /// status.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot::capture(&self.state, &self.program, self.instruction_count)
    }

    /// Every [`TraceEvent`] recorded since the last `load`/`reset`.
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;

    #[test]
    fn new_machine_is_halted_until_loaded() {
        let machine = Machine::new();
        assert!(machine.halted());
    }

    #[test]
    fn step_returns_none_once_halted() {
        let mut machine = Machine::new();
        machine.load(assemble("addi $t0, $zero, 1").unwrap());
        assert!(machine.step().unwrap().is_some());
        assert!(machine.step().unwrap().is_none());
    }

    #[test]
    fn run_executes_straight_line_program_to_completion() {
        let mut machine = Machine::new();
        machine.load(assemble("addi $t0, $zero, 5\nadd $t1, $t0, $t0").unwrap());
        machine.run(None).unwrap();
        assert!(machine.halted());
        assert_eq!(machine.snapshot().registers[9], 10);
    }

    #[test]
    fn reset_clears_state_but_keeps_program() {
        let mut machine = Machine::new();
        machine.load(assemble("addi $t0, $zero, 5").unwrap());
        machine.run(None).unwrap();
        machine.reset();
        assert_eq!(machine.snapshot().registers[8], 0);
        assert!(!machine.halted());
        assert!(machine.trace().is_empty());
    }

    #[test]
    fn trace_records_one_event_per_step() {
        let mut machine = Machine::new();
        machine.load(assemble("addi $t0, $zero, 5\naddi $t0, $t0, 1").unwrap());
        machine.run(None).unwrap();
        assert_eq!(machine.trace().len(), 2);
        assert_eq!(machine.trace()[1].reg_deltas, vec![(8, 5, 6)]);
    }

    #[test]
    fn infinite_loop_hits_instruction_limit() {
        let mut machine = Machine::new();
        machine.load(assemble("LOOP: j LOOP").unwrap());
        let err = machine.run(Some(100)).unwrap_err();
        assert_eq!(err, RuntimeError::InstructionLimitExceeded { limit: 100 });
    }

    #[test]
    fn branch_taken_is_recorded_in_trace() {
        let mut machine = Machine::new();
        machine.load(assemble("beq $zero, $zero, END\nadd $t0,$t0,$t0\nEND: addi $t1,$zero,1").unwrap());
        machine.run(None).unwrap();
        assert_eq!(machine.trace()[0].branch_taken, Some(true));
        assert_eq!(machine.snapshot().registers[8], 0);
    }
}
