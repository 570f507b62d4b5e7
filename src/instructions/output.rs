//! # Output Instructions
//!
//! - PRN: print a register as a number
//! - PRA: append a register to the hint as a character

use tracing::debug;

use crate::{ExecutionError, MemoryBus, Opcode, CPU};

/// Executes PRN.
///
/// The value is recorded in `CPU::printed` for the caller to display.
pub(crate) fn execute_prn<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let value = cpu.reg(cpu.operand(1)?)?;

    debug!(value, "PRN");
    cpu.printed.push(value);
    cpu.advance(opcode)
}

/// Executes PRA.
///
/// Appends the character whose code point is the register value (0-255, so
/// Latin-1) to the hint buffer.
pub(crate) fn execute_pra<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let value = cpu.reg(cpu.operand(1)?)?;

    cpu.hint.push(char::from(value));
    cpu.advance(opcode)
}
