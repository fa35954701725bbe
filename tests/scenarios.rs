//! End-to-end scenarios driven entirely through the public façade
//! (`assemble`, `Machine`), the way an external caller would use the crate.

use mips32_sim::{Machine, RuntimeError, assemble};

fn run(source: &str) -> Machine {
    let mut machine = Machine::new();
    machine.load(assemble(source).unwrap());
    machine.run(None).unwrap();
    machine
}

#[test]
fn arithmetic() {
    let program = assemble(
        "addi $t0,$zero,5\naddi $t1,$zero,3\nadd  $t2,$t0,$t1",
    )
    .unwrap();
    assert_eq!(
        program.encoding_bits(0).unwrap(),
        "00100000000010000000000000000101"
    );
    assert_eq!(
        program.encoding_bits(1).unwrap(),
        "00100000000010010000000000000011"
    );
    assert_eq!(
        program.encoding_bits(2).unwrap(),
        "00000001000010010101000000100000"
    );

    let machine = run("addi $t0,$zero,5\naddi $t1,$zero,3\nadd  $t2,$t0,$t1");
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.registers[8], 5);
    assert_eq!(snapshot.registers[9], 3);
    assert_eq!(snapshot.registers[10], 8);
}

#[test]
fn logical() {
    let machine = run("addi $t0,$zero,12\naddi $t1,$zero,10\nand $t2,$t0,$t1\nor $t3,$t0,$t1");
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.registers[10], 8);
    assert_eq!(snapshot.registers[11], 14);
}

#[test]
fn memory_round_trip() {
    let machine = run("addi $t0,$zero,42\nsw $t0,0($zero)\nlw $t1,0($zero)");
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.data_memory[0], 42);
    assert_eq!(snapshot.registers[9], 42);
}

#[test]
fn branch_taken() {
    let machine = run(
        "addi $t0,$zero,5\naddi $t1,$zero,5\nbeq $t0,$t1,L\naddi $t2,$zero,1\nL: addi $t3,$zero,2",
    );
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.registers[10], 0);
    assert_eq!(snapshot.registers[11], 2);
}

#[test]
fn jump_skips() {
    let machine = run("j M\naddi $t0,$zero,1\nM: addi $t1,$zero,2");
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.registers[8], 0);
    assert_eq!(snapshot.registers[9], 2);
}

#[test]
fn overflow_wraps_to_minimum() {
    let machine = run("addi $t0,$zero,2147483647\naddi $t1,$zero,1\nadd $t2,$t0,$t1");
    assert_eq!(machine.snapshot().registers[10], i32::MIN);
}

#[test]
fn immediate_wrap_boundary() {
    let machine = run("addi $t0,$zero,2147483647\naddi $t1,$t0,1");
    assert_eq!(machine.snapshot().registers[9], i32::MIN);
}

#[test]
fn shifts() {
    let machine = run("addi $t0,$zero,8\nsll $t1,$t0,2\nsrl $t2,$t1,3");
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.registers[9], 32);
    assert_eq!(snapshot.registers[10], 4);
}

#[test]
fn shift_by_32_masks_to_zero_distance() {
    let machine = run("addi $t0,$zero,1\nsll $t1,$t0,32");
    assert_eq!(machine.snapshot().registers[9], 1);
}

#[test]
fn memory_fault_boundaries() {
    let mut machine = Machine::new();
    machine.load(assemble("addi $t0,$zero,1\nsw $t0,508($zero)").unwrap());
    assert!(machine.run(None).is_ok());

    let mut machine = Machine::new();
    machine.load(assemble("addi $t0,$zero,1\nsw $t0,512($zero)").unwrap());
    assert!(matches!(
        machine.run(None),
        Err(RuntimeError::MemoryFault { .. })
    ));

    let mut machine = Machine::new();
    machine.load(assemble("addi $t0,$zero,1\nsw $t0,2($zero)").unwrap());
    assert!(matches!(
        machine.run(None),
        Err(RuntimeError::MemoryFault { .. })
    ));
}

#[test]
fn bubble_sort() {
    let source = "\
addi $t0, $zero, 6
addi $s0, $zero, 0
addi $t1, $zero, 5
addi $t2, $zero, 2
addi $t3, $zero, 8
addi $t4, $zero, 1
addi $t5, $zero, 9
addi $t6, $zero, 3
sw $t1, 0($zero)
sw $t2, 4($zero)
sw $t3, 8($zero)
sw $t4, 12($zero)
sw $t5, 16($zero)
sw $t6, 20($zero)
OUTER: slt $at, $s0, $t0
beq $at, $zero, DONE
addi $s1, $zero, 0
addi $t7, $t0, -1
sub $t7, $t7, $s0
INNER: slt $at, $s1, $t7
beq $at, $zero, NEXT_OUTER
sll $t8, $s1, 2
lw $t2, 0($t8)
addi $t9, $t8, 4
lw $t3, 0($t9)
slt $at, $t3, $t2
beq $at, $zero, SKIP
sw $t3, 0($t8)
sw $t2, 0($t9)
SKIP: addi $s1, $s1, 1
j INNER
NEXT_OUTER: addi $s0, $s0, 1
j OUTER
DONE: addi $v0, $zero, 0";

    let machine = run(source);
    let snapshot = machine.snapshot();
    assert_eq!(&snapshot.data_memory[0..6], &[1, 2, 3, 5, 8, 9]);
}

#[test]
fn step_counting() {
    let mut machine = Machine::new();
    machine.load(assemble("addi $t0,$zero,5\naddi $t1,$zero,3\nadd  $t2,$t0,$t1").unwrap());
    machine.step().unwrap();
    machine.step().unwrap();
    machine.step().unwrap();
    let steps: Vec<usize> = machine.trace().iter().map(|event| event.step_number).collect();
    assert_eq!(steps, vec![1, 2, 3]);
}

#[test]
fn reset_is_idempotent() {
    let mut machine = Machine::new();
    machine.load(assemble("addi $t0,$zero,5").unwrap());
    machine.run(None).unwrap();
    machine.reset();
    let once = machine.snapshot();
    machine.reset();
    let twice = machine.snapshot();
    assert_eq!(once, twice);
}

#[test]
fn run_is_deterministic() {
    let source = "addi $t0,$zero,5\naddi $t1,$zero,3\nadd  $t2,$t0,$t1";
    let first = run(source);
    let second = run(source);
    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.trace(), second.trace());
}

#[test]
fn label_at_end_of_program_terminates_cleanly() {
    let mut machine = Machine::new();
    machine.load(assemble("j END\naddi $t0,$zero,1\nEND:").unwrap());
    machine.run(None).unwrap();
    assert!(machine.halted());
    assert_eq!(machine.snapshot().registers[8], 0);
}
