//! Tests for the ALU instructions.
//!
//! Tests cover:
//! - Results written to the first register, wrapping to 8 bits
//! - Second register never modified
//! - PC advances by 3 (2 for NOT)
//! - CMP flag stickiness
//! - MOD by zero is fatal and leaves state untouched

use ls8::{ExecutionError, Flags, FlatMemory, NoInterrupts, Opcode, RunState, CPU};

fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut cpu = CPU::with_interrupt_source(FlatMemory::new(), Box::new(NoInterrupts));
    cpu.load(program).unwrap();
    cpu
}

/// Runs `opcode R0,R1` once with R0 = a, R1 = b and returns R0.
fn binary_op(opcode: Opcode, a: u8, b: u8) -> u8 {
    let mut cpu = setup_cpu(&[opcode.byte(), 0, 1]);
    cpu.set_register(0, a).unwrap();
    cpu.set_register(1, b).unwrap();

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 3, "{} width", opcode);
    assert_eq!(cpu.register(1), Some(b), "{} must not modify R1", opcode);
    cpu.register(0).unwrap()
}

#[test]
fn test_add() {
    assert_eq!(binary_op(Opcode::Add, 2, 3), 5);
    assert_eq!(binary_op(Opcode::Add, 200, 100), 44);
}

#[test]
fn test_mul() {
    assert_eq!(binary_op(Opcode::Mul, 8, 9), 72);
    assert_eq!(binary_op(Opcode::Mul, 0x10, 0x10), 0);
}

#[test]
fn test_bitwise() {
    assert_eq!(binary_op(Opcode::And, 0b1111_0000, 0b1010_1010), 0b1010_0000);
    assert_eq!(binary_op(Opcode::Or, 0b1111_0000, 0b1010_1010), 0b1111_1010);
    assert_eq!(binary_op(Opcode::Xor, 0b1111_0000, 0b1010_1010), 0b0101_1010);
}

#[test]
fn test_shifts() {
    assert_eq!(binary_op(Opcode::Shl, 0b0000_0101, 1), 0b0000_1010);
    assert_eq!(binary_op(Opcode::Shl, 0b1100_0000, 1), 0b1000_0000);
    assert_eq!(binary_op(Opcode::Shr, 0b1010_0000, 5), 0b0000_0101);
    assert_eq!(binary_op(Opcode::Shr, 0xFF, 8), 0);
}

#[test]
fn test_mod() {
    assert_eq!(binary_op(Opcode::Mod, 100, 7), 2);
    assert_eq!(binary_op(Opcode::Mod, 7, 7), 0);
}

#[test]
fn test_not_is_ones_complement() {
    let mut cpu = setup_cpu(&[0b0110_1001, 3]);
    cpu.set_register(3, 0b0011_1100).unwrap();

    cpu.step().unwrap();

    assert_eq!(cpu.register(3), Some(0b1100_0011));
    assert_eq!(cpu.pc(), 2);
}

#[test]
fn test_mod_by_zero_is_fatal() {
    let mut cpu = setup_cpu(&[0b1010_0100, 0, 1, 0b0000_0001]);
    cpu.set_register(0, 17).unwrap();
    let before = *cpu.registers();

    assert_eq!(cpu.run(), Err(ExecutionError::DivisionByZero));

    assert_eq!(*cpu.registers(), before);
    assert_eq!(cpu.pc(), 0);
    assert_eq!(cpu.state(), &RunState::Faulted(ExecutionError::DivisionByZero));
}

// ========== CMP ==========

#[test]
fn test_cmp_less_equal_greater() {
    let cases = [(3, 4, Flags::LESS), (4, 4, Flags::EQUAL), (5, 4, Flags::GREATER)];

    for (a, b, expected) in cases {
        let mut cpu = setup_cpu(&[0b1010_0111, 0, 1]);
        cpu.set_register(0, a).unwrap();
        cpu.set_register(1, b).unwrap();

        cpu.step().unwrap();

        assert_eq!(cpu.flags(), expected, "CMP {} vs {}", a, b);
        assert_eq!(cpu.register(0), Some(a));
        assert_eq!(cpu.pc(), 3);
    }
}

#[test]
fn test_cmp_flags_are_sticky() {
    // CMP R0,R1 (1 < 2) then CMP R2,R3 (9 > 3)
    let mut cpu = setup_cpu(&[0b1010_0111, 0, 1, 0b1010_0111, 2, 3, 0b0000_0001]);
    cpu.set_register(0, 1).unwrap();
    cpu.set_register(1, 2).unwrap();
    cpu.set_register(2, 9).unwrap();
    cpu.set_register(3, 3).unwrap();

    cpu.step().unwrap();
    assert_eq!(cpu.flags(), Flags::LESS);

    cpu.step().unwrap();
    assert!(cpu.flags().less());
    assert!(cpu.flags().greater());
    assert!(!cpu.flags().equal());
    assert_eq!(cpu.flags().bits(), 0b101);
}

#[test]
fn test_cmp_never_clears_equal() {
    // Once Equal is set, an unequal comparison does not clear it
    let mut cpu = setup_cpu(&[0b1010_0111, 0, 0, 0b1010_0111, 0, 1]);
    cpu.set_register(1, 1).unwrap();

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert!(cpu.flags().equal());
    assert!(cpu.flags().less());
}

#[test]
fn test_other_alu_ops_leave_flags() {
    for opcode in [Opcode::Add, Opcode::Mul, Opcode::And, Opcode::Xor, Opcode::Shl] {
        let mut cpu = setup_cpu(&[opcode.byte(), 0, 1]);
        cpu.set_flags(Flags::EQUAL);

        cpu.step().unwrap();

        assert_eq!(cpu.flags(), Flags::EQUAL, "{} touched flags", opcode);
    }
}
