//! Tests for the timer interrupt and IRET.
//!
//! A scripted interrupt source stands in for the wall clock so every scenario
//! is deterministic.

use std::cell::Cell;
use std::rc::Rc;

use ls8::{Flags, FlatMemory, InterruptSource, MemoryBus, NoInterrupts, Opcode, StepOutcome, CPU};

const IM: u8 = 5;
const IS: u8 = 6;

const LDI: u8 = 0b1000_0010;
const PRN: u8 = 0b0100_0111;
const IRET: u8 = 0b0001_0011;
const JMP: u8 = 0b0101_0100;
const HLT: u8 = 0b0000_0001;

/// Fires on the next poll after `trigger` is set, once.
#[derive(Clone, Default)]
struct ManualTimer {
    pending: Rc<Cell<bool>>,
}

impl ManualTimer {
    fn trigger(&self) {
        self.pending.set(true);
    }
}

impl InterruptSource for ManualTimer {
    fn poll(&mut self) -> bool {
        self.pending.replace(false)
    }
}

fn setup_cpu(program: &[u8]) -> (CPU<FlatMemory>, ManualTimer) {
    let timer = ManualTimer::default();
    let mut cpu = CPU::with_interrupt_source(FlatMemory::new(), Box::new(timer.clone()));
    cpu.load(program).unwrap();
    (cpu, timer)
}

#[test]
fn test_service_pushes_state_in_order() {
    let (mut cpu, timer) = setup_cpu(&[]);
    cpu.memory_mut().write(0xF8, 0x60);
    cpu.set_pc(0x12);
    cpu.set_flags(Flags::GREATER);
    for reg in 0..5 {
        cpu.set_register(reg, 0x10 + reg).unwrap();
    }
    cpu.set_register(IM, 0b0000_0001).unwrap();

    timer.trigger();
    assert_eq!(cpu.step(), Ok(StepOutcome::Interrupted(0)));

    let mem = cpu.memory();
    assert_eq!(mem.read(0xF3), 0x12, "return PC");
    assert_eq!(mem.read(0xF2), Flags::GREATER.bits(), "flags");
    for reg in 0..5u8 {
        assert_eq!(mem.read(0xF1 - reg), 0x10 + reg, "R{}", reg);
    }
    assert_eq!(mem.read(0xEC), 0b0000_0001, "R5 (IM)");
    // IS is cleared before the registers are saved
    assert_eq!(mem.read(0xEB), 0, "R6 (IS)");

    assert_eq!(cpu.pc(), 0x60);
    assert_eq!(cpu.sp(), 0xEB);
    assert_eq!(cpu.register(IS), Some(0));
}

#[test]
fn test_serviced_cycle_fetches_nothing() {
    // The instruction at the interrupted PC must not run in the same step
    let (mut cpu, timer) = setup_cpu(&[LDI, 0, 0x55]);
    cpu.memory_mut().write(0xF8, 0x80);
    cpu.set_register(IM, 1).unwrap();

    timer.trigger();
    cpu.step().unwrap();

    assert_eq!(cpu.register(0), Some(0));
    assert_eq!(cpu.pc(), 0x80);
}

#[test]
fn test_masked_timer_interrupt_stays_pending() {
    let (mut cpu, timer) = setup_cpu(&[LDI, 0, 9, HLT]);

    timer.trigger();
    assert_eq!(cpu.step(), Ok(StepOutcome::Executed(Opcode::Ldi)));

    assert_eq!(cpu.register(IS), Some(1));
    assert_eq!(cpu.register(0), Some(9));
    assert_eq!(cpu.sp(), 0xF4);
}

#[test]
fn test_pending_interrupt_serviced_once_unmasked() {
    // LDI R5,1 enables the timer; the already-pending bit is serviced next cycle
    let (mut cpu, timer) = setup_cpu(&[LDI, 0, 1, LDI, IM, 1, HLT]);
    cpu.memory_mut().write(0xF8, 0x40);

    timer.trigger();
    cpu.step().unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.register(IS), Some(1));

    assert_eq!(cpu.step(), Ok(StepOutcome::Interrupted(0)));
    assert_eq!(cpu.pc(), 0x40);
    assert_eq!(cpu.memory().read(0xF3), 6);
}

#[test]
fn test_timer_overwrites_status_register() {
    let (mut cpu, timer) = setup_cpu(&[LDI, 0, 0]);
    cpu.set_register(IS, 0b1000_0100).unwrap();

    timer.trigger();
    cpu.step().unwrap();

    assert_eq!(cpu.register(IS), Some(1));
}

#[test]
fn test_iret_restores_state() {
    let (mut cpu, _timer) = setup_cpu(&[IRET]);
    // Stack image as left by the service sequence, top first: R6..R0, FL, PC
    let frame = [0x66, 0x55, 0x44, 0x33, 0x22, 0x11, 0x00, 0b101, 0x2A];
    for (offset, byte) in frame.into_iter().enumerate() {
        cpu.memory_mut().write(0xEB + offset as u8, byte);
    }
    cpu.set_sp(0xEB);

    assert_eq!(cpu.step(), Ok(StepOutcome::Executed(Opcode::Iret)));

    assert_eq!(
        cpu.registers().as_array(),
        [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0xF4]
    );
    assert_eq!(cpu.flags().bits(), 0b101);
    assert_eq!(cpu.pc(), 0x2A);
}

#[test]
fn test_interrupt_and_iret_round_trip() {
    // main:  LDI R5,1; LDI R0,7; PRN R0; HLT
    // 0x50:  LDI R0,200; LDI R1,201; PRN R0; IRET
    let (mut cpu, timer) = setup_cpu(&[LDI, IM, 1, LDI, 0, 7, PRN, 0, HLT]);
    for (offset, byte) in [LDI, 0, 200, LDI, 1, 201, PRN, 0, IRET]
        .into_iter()
        .enumerate()
    {
        cpu.memory_mut().write(0x50 + offset as u8, byte);
    }
    cpu.memory_mut().write(0xF8, 0x50);
    cpu.set_flags(Flags::LESS);

    cpu.step().unwrap(); // LDI R5,1
    cpu.step().unwrap(); // LDI R0,7
    timer.trigger();
    cpu.run().unwrap();

    // Handler output comes first, then main resumes with its own R0 restored
    assert_eq!(cpu.printed(), &[200, 7]);
    assert_eq!(cpu.register(0), Some(7));
    assert_eq!(cpu.register(1), Some(0));
    assert_eq!(cpu.register(IM), Some(1));
    assert_eq!(cpu.flags(), Flags::LESS);
    assert_eq!(cpu.sp(), 0xF4);
    assert_eq!(cpu.pc(), 8);
}

#[test]
fn test_handler_can_be_interrupted_again() {
    // Interrupts stay enabled inside a handler, so frames nest
    // main:  JMP R0 (spins at 0)
    // 0x30:  JMP R1 (spins at 0x30)
    let (mut cpu, timer) = setup_cpu(&[JMP, 0]);
    cpu.memory_mut().write(0x30, JMP);
    cpu.memory_mut().write(0x31, 1);
    cpu.memory_mut().write(0xF8, 0x30);
    cpu.set_register(1, 0x30).unwrap();
    cpu.set_register(IM, 1).unwrap();

    timer.trigger();
    assert_eq!(cpu.step(), Ok(StepOutcome::Interrupted(0)));
    assert_eq!(cpu.step(), Ok(StepOutcome::Executed(Opcode::Jmp)));
    assert_eq!(cpu.pc(), 0x30);

    timer.trigger();
    assert_eq!(cpu.step(), Ok(StepOutcome::Interrupted(0)));

    assert_eq!(cpu.sp(), 0xF4 - 18);
    // Second frame's return address is inside the first handler
    assert_eq!(cpu.memory().read(0xF4 - 10), 0x30);
}

#[test]
fn test_no_interrupts_source_never_fires() {
    let mut cpu = CPU::with_interrupt_source(FlatMemory::new(), Box::new(NoInterrupts));
    cpu.load(&[JMP, 0]).unwrap();
    cpu.set_register(IM, 0xFF).unwrap();

    for _ in 0..100 {
        assert_eq!(cpu.step(), Ok(StepOutcome::Executed(Opcode::Jmp)));
    }
    assert_eq!(cpu.register(IS), Some(0));
}
