//! Fuzz target for CPU step execution.
//!
//! This target creates arbitrary register, flag and memory contents, then runs a
//! handful of dispatch cycles with an arbitrary timer schedule.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ls8::{Flags, FlatMemory, InterruptSource, MemoryBus, RunState, CPU};

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    /// R0-R7, including IM, IS and SP
    registers: [u8; 8],
    pc: u8,
    flags: u8,
}

/// Timer that replays a fixed firing schedule.
#[derive(Debug, Arbitrary)]
struct ScriptedTimer {
    schedule: Vec<bool>,
}

impl InterruptSource for ScriptedTimer {
    fn poll(&mut self) -> bool {
        self.schedule.pop().unwrap_or(false)
    }
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: [u8; 256],
    timer: ScriptedTimer,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    for (addr, &byte) in (0..=u8::MAX).zip(input.memory.iter()) {
        memory.write(addr, byte);
    }

    let mut cpu = CPU::with_interrupt_source(memory, Box::new(input.timer));
    for (index, &value) in (0..8).zip(input.cpu_state.registers.iter()) {
        cpu.set_register(index, value).unwrap();
    }
    cpu.set_pc(input.cpu_state.pc);
    cpu.set_flags(Flags::from_bits(input.cpu_state.flags));

    // Errors are expected for most inputs - just no panics
    for _ in 0..input.steps {
        if cpu.step().is_err() {
            break;
        }
    }

    // A failed step must leave the CPU faulted
    if let RunState::Faulted(err) = cpu.state().clone() {
        assert_eq!(cpu.step(), Err(err));
    }
    assert!(cpu.flags().bits() <= 0b111);
});
