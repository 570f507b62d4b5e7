//! # Load and Store Instructions
//!
//! - LDI: Load Immediate
//! - ST: Store register to memory
//! - ADDI: Add Immediate

use crate::{ExecutionError, MemoryBus, Opcode, CPU};

/// Executes LDI (`reg = imm`).
///
/// Bytes: 3 (opcode, register, immediate)
pub(crate) fn execute_ldi<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let reg = cpu.operand(1)?;
    let value = cpu.operand(2)?;

    cpu.set_reg(reg, value)?;
    cpu.advance(opcode)
}

/// Executes ST (`Memory[regA] = regB`).
///
/// The address comes from the value held in regA, not from regA's index.
///
/// Bytes: 3 (opcode, regA, regB)
pub(crate) fn execute_st<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let address = cpu.reg(cpu.operand(1)?)?;
    let value = cpu.reg(cpu.operand(2)?)?;

    cpu.memory.write(address, value);
    cpu.advance(opcode)
}

/// Executes ADDI (`reg += imm`, wrapping).
///
/// Not routed through the ALU: flags are untouched.
///
/// Bytes: 3 (opcode, register, immediate)
pub(crate) fn execute_addi<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let reg = cpu.operand(1)?;
    let immediate = cpu.operand(2)?;

    let value = cpu.reg(reg)?.wrapping_add(immediate);
    cpu.set_reg(reg, value)?;
    cpu.advance(opcode)
}
