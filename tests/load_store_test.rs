//! Tests for LDI, ST and ADDI.
//!
//! Each instruction is single-stepped from a known state; only the documented
//! register or memory cell may change and PC advances by 3.

use ls8::{Flags, FlatMemory, MemoryBus, NoInterrupts, CPU};

fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut cpu = CPU::with_interrupt_source(FlatMemory::new(), Box::new(NoInterrupts));
    cpu.load(program).unwrap();
    cpu
}

// ========== LDI ==========

#[test]
fn test_ldi_sets_register() {
    let mut cpu = setup_cpu(&[0b1000_0010, 3, 0x7F]);

    cpu.step().unwrap();

    assert_eq!(cpu.registers().as_array(), [0, 0, 0, 0x7F, 0, 0, 0, 0xF4]);
    assert_eq!(cpu.pc(), 3);
    assert_eq!(cpu.flags(), Flags::default());
}

#[test]
fn test_ldi_overwrites_previous_value() {
    let mut cpu = setup_cpu(&[0b1000_0010, 0, 1, 0b1000_0010, 0, 2]);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.register(0), Some(2));
    assert_eq!(cpu.pc(), 6);
}

#[test]
fn test_ldi_into_stack_pointer() {
    let mut cpu = setup_cpu(&[0b1000_0010, 7, 0xE0]);

    cpu.step().unwrap();

    assert_eq!(cpu.sp(), 0xE0);
}

// ========== ST ==========

#[test]
fn test_st_writes_through_register_address() {
    let mut cpu = setup_cpu(&[0b1000_0100, 0, 1]);
    cpu.set_register(0, 0x80).unwrap(); // address
    cpu.set_register(1, 0x5A).unwrap(); // value

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x80), 0x5A);
    assert_eq!(cpu.register(0), Some(0x80));
    assert_eq!(cpu.register(1), Some(0x5A));
    assert_eq!(cpu.pc(), 3);
}

#[test]
fn test_st_only_touches_target_cell() {
    let mut cpu = setup_cpu(&[0b1000_0100, 2, 3]);
    cpu.set_register(2, 0x40).unwrap();
    cpu.set_register(3, 0xEE).unwrap();
    let before = cpu.memory().clone();

    cpu.step().unwrap();

    for addr in 0..=255u8 {
        let expected = if addr == 0x40 { 0xEE } else { before.read(addr) };
        assert_eq!(cpu.memory().read(addr), expected, "address {:#04X}", addr);
    }
}

#[test]
fn test_st_can_overwrite_program() {
    // ST R0,R1 with R0 = 0 rewrites its own opcode byte
    let mut cpu = setup_cpu(&[0b1000_0100, 0, 1]);
    cpu.set_register(1, 0b0000_0001).unwrap();

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0), 0b0000_0001);
}

// ========== ADDI ==========

#[test]
fn test_addi_adds_immediate() {
    let mut cpu = setup_cpu(&[0b1000_1000, 4, 10]);
    cpu.set_register(4, 32).unwrap();

    cpu.step().unwrap();

    assert_eq!(cpu.register(4), Some(42));
    assert_eq!(cpu.pc(), 3);
}

#[test]
fn test_addi_wraps() {
    let mut cpu = setup_cpu(&[0b1000_1000, 0, 0xFF]);
    cpu.set_register(0, 2).unwrap();

    cpu.step().unwrap();

    assert_eq!(cpu.register(0), Some(1));
}

#[test]
fn test_addi_leaves_flags_alone() {
    let mut cpu = setup_cpu(&[0b1000_1000, 0, 1]);
    cpu.set_flags(Flags::LESS);

    cpu.step().unwrap();

    assert_eq!(cpu.flags(), Flags::LESS);
}
