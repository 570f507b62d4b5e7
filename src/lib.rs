//! # LS-8 CPU Emulator Core
//!
//! An emulator for the LS-8, a small 8-bit-word machine used by the game client to
//! decode the binary "riddle" programs handed out by the game server. Running a
//! riddle accumulates a textual hint, which is the only output the client cares
//! about.
//!
//! The crate provides the CPU state and fetch-decode-execute loop, a trait-based
//! memory bus, a closed opcode enum, the ALU, a timer-driven interrupt controller
//! and a loader for the textual binary-literal program format.
//!
//! ## Quick Start
//!
//! ```rust
//! use ls8::{FlatMemory, CPU};
//!
//! let program = ls8::loader::parse_program(
//!     "10000010 # LDI R0,72\n\
//!      00000000\n\
//!      01001000\n\
//!      10000010 # LDI R0,105\n\
//!      00000000\n\
//!      01101001\n\
//!      01001000 # PRA R0\n\
//!      00000000\n\
//!      00000001 # HLT\n",
//! )
//! .unwrap();
//!
//! let mut cpu = CPU::new(FlatMemory::new());
//! cpu.load(&program).unwrap();
//! cpu.run().unwrap();
//!
//! assert_eq!(cpu.hint(), "i");
//! assert!(cpu.is_halted());
//! ```
//!
//! For the common case of turning riddle text into a hint, use [`decode_hint`].
//!
//! ## Modules
//!
//! - `cpu` - CPU state and execution loop
//! - `memory` - MemoryBus trait and the 256-byte flat memory
//! - `registers` - register file and flags register
//! - `alu` - arithmetic and logic operations
//! - `opcodes` - opcode enum and its metadata
//! - `interrupts` - interrupt sources and interrupt servicing
//! - `loader` - program text parsing

pub mod alu;
pub mod cpu;
pub mod interrupts;
pub mod loader;
pub mod memory;
pub mod opcodes;
pub mod registers;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::path::PathBuf;

use thiserror::Error;

// Re-export public API
pub use alu::AluOp;
pub use cpu::{CpuConfig, RunState, StepOutcome, Trace, CPU};
pub use interrupts::{IntervalTimer, InterruptSource, NoInterrupts};
pub use loader::LoaderConfig;
pub use memory::{FlatMemory, MemoryBus, MEMORY_SIZE};
pub use opcodes::Opcode;
pub use registers::{Flags, RegisterFile};

/// Fatal errors raised while the CPU is executing.
///
/// None of these are retried. Once one is returned the run has failed, although
/// the CPU keeps its state (including the partial hint) for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The byte at the program counter is not a known opcode.
    #[error("unknown opcode {opcode:#010b} at PC {pc:#04X}")]
    UnknownOpcode { opcode: u8, pc: u8 },

    /// MOD was executed with a zero divisor.
    #[error("MOD by zero")]
    DivisionByZero,

    /// An operand named a register outside R0-R7.
    #[error("invalid register index {index}")]
    InvalidRegister { index: u8 },

    /// An address past the end of the 256-byte memory was formed.
    #[error("address {address:#X} is outside memory")]
    AddressOutOfRange { address: usize },

    /// A push would move the stack pointer below address 0.
    #[error("stack overflow")]
    StackOverflow,

    /// A pop would move the stack pointer past the end of memory.
    #[error("stack underflow")]
    StackUnderflow,
}

/// Errors raised while turning program text into a memory image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("failed to read program {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not hold an 8-digit binary literal.
    #[error("line {line}: `{text}` is not an 8-bit binary literal")]
    InvalidLiteral { line: usize, text: String },

    /// The program has more bytes than memory has cells.
    #[error("program is {len} bytes, memory holds {}", MEMORY_SIZE)]
    ProgramTooLarge { len: usize },
}

/// Failure of a whole [`decode_hint`] invocation.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Execution failed; whatever hint text was produced before the fault is kept.
    #[error("execution failed after producing {partial_hint:?}: {source}")]
    Execution {
        #[source]
        source: ExecutionError,
        partial_hint: String,
    },
}

/// Parses riddle program text, runs it to completion and returns the hint.
///
/// Uses the default loader and CPU configuration (no skipped lines, 1 second
/// timer).
pub fn decode_hint(source: &str) -> Result<String, DecodeError> {
    decode_hint_with(source, &LoaderConfig::default(), CpuConfig::default())
}

/// Like [`decode_hint`], with explicit loader and CPU configuration.
pub fn decode_hint_with(
    source: &str,
    loader_config: &LoaderConfig,
    cpu_config: CpuConfig,
) -> Result<String, DecodeError> {
    let program = loader::parse_program_with(source, loader_config)?;

    let mut cpu = CPU::with_config(FlatMemory::new(), cpu_config);
    cpu.load(&program)?;

    match cpu.run() {
        Ok(()) => Ok(cpu.into_hint()),
        Err(source) => Err(DecodeError::Execution {
            source,
            partial_hint: cpu.into_hint(),
        }),
    }
}
