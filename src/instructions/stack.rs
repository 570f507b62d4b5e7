//! # Stack Operations
//!
//! - PUSH: Push register on stack
//! - POP: Pop stack into register
//!
//! The stack lives in main memory and grows downward from `0xF4`. SP (R7) holds
//! the address of the most recently pushed byte: PUSH decrements SP and then
//! writes, POP reads and then increments SP.

use crate::registers::SP;
use crate::{ExecutionError, MemoryBus, Opcode, CPU};

/// Executes PUSH.
///
/// Bytes: 2 (opcode, register)
pub(crate) fn execute_push<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let value = cpu.reg(cpu.operand(1)?)?;

    cpu.push(value)?;
    cpu.advance(opcode)
}

/// Executes POP.
///
/// The stack pointer is incremented after the register is written, so `POP R7`
/// discards the popped byte and leaves SP one past its old value.
///
/// Bytes: 2 (opcode, register)
pub(crate) fn execute_pop<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let reg = cpu.operand(1)?;
    // Validate before touching SP
    cpu.reg(reg)?;

    let value = cpu.pop()?;
    if reg != SP {
        cpu.set_reg(reg, value)?;
    }
    cpu.advance(opcode)
}
