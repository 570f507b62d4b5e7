//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the LS-8 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: R0-R7, where R5/R6/R7 are the interrupt mask, interrupt status
//!   and stack pointer
//! - **Program counter** (PC): 8-bit address of the next instruction
//! - **Flags**: sticky LessThan/Equal/GreaterThan bits written by CMP
//! - **Hint buffer**: text appended by PRA
//! - **Printed values**: values emitted by PRN
//!
//! ## Execution Model
//!
//! - `step()`: poll the timer, service a pending interrupt or execute one
//!   instruction
//! - `run()`: step until HLT or a fatal error
//!
//! A fatal error leaves the CPU in the `Faulted` state. Its registers, memory and
//! hint stay readable for debugging.

use std::fmt;
use std::time::Duration;

use tracing::{error, info, trace};

use crate::interrupts::{self, IntervalTimer, InterruptSource};
use crate::{
    instructions, ExecutionError, Flags, FlatMemory, LoadError, MemoryBus, Opcode,
    RegisterFile, MEMORY_SIZE,
};

/// Tunables for a CPU instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    /// Period of the default wall-clock timer interrupt.
    pub timer_period: Duration,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            timer_period: Duration::from_secs(1),
        }
    }
}

/// Lifecycle of a CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// HLT was executed.
    Halted,
    /// A fatal error stopped execution.
    Faulted(ExecutionError),
}

/// What a single `step()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An ordinary instruction was executed.
    Executed(Opcode),
    /// An interrupt was serviced instead of fetching an instruction. Carries the
    /// interrupt number (bit index).
    Interrupted(u8),
    /// The CPU is halted.
    Halted,
}

/// Snapshot of the machine for debugging.
///
/// Displays as
/// `TRACE: PC | FL OP A1 A2 | R0 R1 R2 R3 R4 R5 R6 R7` with every field in hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    pub pc: u8,
    pub flags: u8,
    /// The byte at PC and the two following bytes (zero past the end of memory).
    pub bytes: [u8; 3],
    pub registers: [u8; 8],
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TRACE: {:02X} | {:02X} {:02X} {:02X} {:02X} |",
            self.pc, self.flags, self.bytes[0], self.bytes[1], self.bytes[2]
        )?;
        for value in self.registers {
            write!(f, " {:02X}", value)?;
        }
        Ok(())
    }
}

/// LS-8 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait, defaulting to
/// the 256-byte `FlatMemory`.
///
/// # Examples
///
/// ```
/// use ls8::{FlatMemory, CPU};
///
/// let cpu = CPU::new(FlatMemory::new());
///
/// assert_eq!(cpu.pc(), 0);
/// assert_eq!(cpu.sp(), 0xF4);
/// assert_eq!(cpu.flags().bits(), 0);
/// assert_eq!(cpu.hint(), "");
/// ```
pub struct CPU<M: MemoryBus = FlatMemory> {
    pub(crate) memory: M,
    pub(crate) registers: RegisterFile,
    pub(crate) flags: Flags,
    pub(crate) pc: u8,
    pub(crate) hint: String,
    pub(crate) printed: Vec<u8>,
    pub(crate) state: RunState,
    timer: Box<dyn InterruptSource>,
}

impl Default for CPU<FlatMemory> {
    fn default() -> Self {
        Self::new(FlatMemory::new())
    }
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU in power-on state with the default configuration.
    ///
    /// PC is 0, flags are clear, R0-R6 are zero and SP is `0xF4`.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    /// Creates a CPU whose timer interrupt fires every `config.timer_period`.
    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        Self::with_interrupt_source(memory, Box::new(IntervalTimer::new(config.timer_period)))
    }

    /// Creates a CPU driven by a custom timer interrupt source.
    pub fn with_interrupt_source(memory: M, timer: Box<dyn InterruptSource>) -> Self {
        Self {
            memory,
            registers: RegisterFile::new(),
            flags: Flags::default(),
            pc: 0,
            hint: String::new(),
            printed: Vec::new(),
            state: RunState::Running,
            timer,
        }
    }

    /// Replaces the timer interrupt source.
    pub fn set_interrupt_source(&mut self, timer: Box<dyn InterruptSource>) {
        self.timer = timer;
    }

    /// Copies a program image into memory starting at address 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::{FlatMemory, MemoryBus, CPU};
    ///
    /// let mut cpu = CPU::new(FlatMemory::new());
    /// cpu.load(&[0b0000_0001]).unwrap();
    /// assert_eq!(cpu.memory().read(0), 0b0000_0001);
    /// ```
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MEMORY_SIZE {
            return Err(LoadError::ProgramTooLarge { len: program.len() });
        }

        for (addr, &byte) in (0..=u8::MAX).zip(program) {
            self.memory.write(addr, byte);
        }
        tracing::debug!(bytes = program.len(), "program loaded");

        Ok(())
    }

    /// Executes one dispatch cycle.
    ///
    /// 1. Poll the timer; if it fired, the interrupt status register becomes 1
    /// 2. If an enabled interrupt is pending, service it and end the cycle
    /// 3. Fetch the opcode at PC; HLT halts the CPU
    /// 4. Decode and execute; an unknown opcode is fatal
    ///
    /// Stepping a halted CPU does nothing. Stepping a faulted CPU returns the
    /// original error again.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::{FlatMemory, Opcode, StepOutcome, CPU};
    ///
    /// let mut cpu = CPU::new(FlatMemory::new());
    /// cpu.load(&[0b1000_0010, 0, 7, 0b0000_0001]).unwrap(); // LDI R0,7; HLT
    ///
    /// assert_eq!(cpu.step(), Ok(StepOutcome::Executed(Opcode::Ldi)));
    /// assert_eq!(cpu.register(0), Some(7));
    /// assert_eq!(cpu.step(), Ok(StepOutcome::Halted));
    /// ```
    pub fn step(&mut self) -> Result<StepOutcome, ExecutionError> {
        match &self.state {
            RunState::Running => {}
            RunState::Halted => return Ok(StepOutcome::Halted),
            RunState::Faulted(err) => return Err(err.clone()),
        }

        match self.cycle() {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(error = %err, trace = %self.trace(), "fatal execution error");
                self.state = RunState::Faulted(err.clone());
                Err(err)
            }
        }
    }

    /// Runs until HLT or a fatal error.
    ///
    /// There is no step limit: a program that never halts never returns.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        loop {
            if self.step()? == StepOutcome::Halted {
                return Ok(());
            }
        }
    }

    fn cycle(&mut self) -> Result<StepOutcome, ExecutionError> {
        if self.timer.poll() {
            tracing::debug!("timer interrupt raised");
            // Overwrites rather than ORs the timer bit in
            self.registers.set_interrupt_status(1);
        }

        if self.registers.interrupt_status() >= 1 {
            if let Some(index) = interrupts::service_pending(self)? {
                return Ok(StepOutcome::Interrupted(index));
            }
        }

        let pc = self.pc;
        let byte = self.memory.read(pc);
        let opcode = Opcode::from_byte(byte)
            .ok_or(ExecutionError::UnknownOpcode { opcode: byte, pc })?;

        trace!(%opcode, trace = %self.trace());

        if opcode == Opcode::Hlt {
            info!(pc, hint = %self.hint, "halted");
            self.state = RunState::Halted;
            return Ok(StepOutcome::Halted);
        }

        instructions::execute(self, opcode)?;
        Ok(StepOutcome::Executed(opcode))
    }

    // ========== Helpers for instruction implementations ==========

    /// Reads the operand byte `n` positions after the opcode.
    pub(crate) fn operand(&self, n: u8) -> Result<u8, ExecutionError> {
        let addr = checked_address(self.pc as usize + n as usize)?;
        Ok(self.memory.read(addr))
    }

    pub(crate) fn reg(&self, index: u8) -> Result<u8, ExecutionError> {
        self.registers.get(index)
    }

    pub(crate) fn set_reg(&mut self, index: u8, value: u8) -> Result<(), ExecutionError> {
        self.registers.set(index, value)
    }

    /// Address of the instruction following the current one.
    pub(crate) fn next_pc(&self, opcode: Opcode) -> Result<u8, ExecutionError> {
        checked_address(self.pc as usize + opcode.size_bytes() as usize)
    }

    /// Moves PC past the current instruction.
    pub(crate) fn advance(&mut self, opcode: Opcode) -> Result<(), ExecutionError> {
        self.pc = self.next_pc(opcode)?;
        Ok(())
    }

    /// Decrements SP, then writes `value` at the new SP.
    pub(crate) fn push(&mut self, value: u8) -> Result<(), ExecutionError> {
        let sp = self
            .registers
            .sp()
            .checked_sub(1)
            .ok_or(ExecutionError::StackOverflow)?;
        self.memory.write(sp, value);
        self.registers.set_sp(sp);
        Ok(())
    }

    /// Reads the byte at SP, then increments SP.
    pub(crate) fn pop(&mut self) -> Result<u8, ExecutionError> {
        let sp = self.registers.sp();
        let next = sp.checked_add(1).ok_or(ExecutionError::StackUnderflow)?;
        let value = self.memory.read(sp);
        self.registers.set_sp(next);
        Ok(value)
    }

    // ========== State inspection ==========

    /// Returns the program counter value.
    pub fn pc(&self) -> u8 {
        self.pc
    }

    /// Returns the stack pointer (R7).
    pub fn sp(&self) -> u8 {
        self.registers.sp()
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Returns register `index`, or `None` if there is no such register.
    pub fn register(&self, index: u8) -> Option<u8> {
        self.registers.get(index).ok()
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Text accumulated by PRA so far.
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Consumes the CPU, returning the hint text.
    pub fn into_hint(self) -> String {
        self.hint
    }

    /// Values emitted by PRN, oldest first.
    pub fn printed(&self) -> &[u8] {
        &self.printed
    }

    /// Removes and returns the values emitted by PRN since the last call.
    pub fn take_printed(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.printed)
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// True once HLT has executed.
    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Captures the current machine state.
    pub fn trace(&self) -> Trace {
        let byte_at = |offset: usize| {
            checked_address(self.pc as usize + offset)
                .map(|addr| self.memory.read(addr))
                .unwrap_or(0)
        };

        Trace {
            pc: self.pc,
            flags: self.flags.bits(),
            bytes: [byte_at(0), byte_at(1), byte_at(2)],
            registers: self.registers.as_array(),
        }
    }

    // ========== Setters (debugging and tests) ==========

    pub fn set_pc(&mut self, pc: u8) {
        self.pc = pc;
    }

    pub fn set_sp(&mut self, sp: u8) {
        self.registers.set_sp(sp);
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Writes register `index`.
    pub fn set_register(&mut self, index: u8, value: u8) -> Result<(), ExecutionError> {
        self.registers.set(index, value)
    }
}

fn checked_address(addr: usize) -> Result<u8, ExecutionError> {
    u8::try_from(addr).map_err(|_| ExecutionError::AddressOutOfRange { address: addr })
}
