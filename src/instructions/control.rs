//! # Control Flow Instructions
//!
//! - CALL: push return address, jump to register
//! - RET: pop return address
//! - JMP: jump to register
//! - JEQ / JNE: jump to register if the Equal flag is set / clear
//! - IRET: return from interrupt handler
//!
//! All of these set PC themselves. JEQ/JNE fall through to the next instruction
//! when the condition does not hold.

use tracing::debug;

use crate::{ExecutionError, Flags, MemoryBus, Opcode, CPU};

/// Executes CALL.
///
/// Pushes the address of the instruction after the CALL (PC + 2), then jumps to
/// the address held in the operand register. The register is read after the
/// push, so `CALL R7` jumps to the decremented stack pointer.
pub(crate) fn execute_call<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let reg = cpu.operand(1)?;
    // Validate before touching SP
    cpu.reg(reg)?;
    let return_address = cpu.next_pc(opcode)?;

    cpu.push(return_address)?;
    cpu.pc = cpu.reg(reg)?;

    Ok(())
}

/// Executes RET.
pub(crate) fn execute_ret<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.pc = cpu.pop()?;
    Ok(())
}

/// Executes JMP.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.pc = cpu.reg(cpu.operand(1)?)?;
    Ok(())
}

/// Executes JEQ or JNE.
///
/// Only bit 1 (Equal) of the flags register is consulted.
pub(crate) fn execute_conditional_jump<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let taken = match opcode {
        Opcode::Jeq => cpu.flags.equal(),
        _ => !cpu.flags.equal(),
    };

    if taken {
        cpu.pc = cpu.reg(cpu.operand(1)?)?;
        Ok(())
    } else {
        cpu.advance(opcode)
    }
}

/// Executes IRET.
///
/// Pops R6 down to R0, then the flags register, then the return address.
pub(crate) fn execute_iret<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    for reg in (0..=6).rev() {
        let value = cpu.pop()?;
        cpu.set_reg(reg, value)?;
    }

    cpu.flags = Flags::from_bits(cpu.pop()?);
    cpu.pc = cpu.pop()?;

    debug!(return_pc = cpu.pc, "returned from interrupt");
    Ok(())
}
