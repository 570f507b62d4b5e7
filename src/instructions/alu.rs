//! # ALU Instructions
//!
//! ADD, MUL, MOD, CMP, AND, OR, XOR, SHL and SHR take two register operands;
//! NOT takes one. All of them hand off to [`crate::alu::execute`].

use crate::{alu, ExecutionError, MemoryBus, Opcode, CPU};

/// Executes any ALU opcode.
///
/// A failing operation (MOD by zero, bad register) leaves PC on the faulting
/// instruction.
pub(crate) fn execute_alu<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    let Some(op) = opcode.alu_op() else {
        unreachable!("{} routed to the ALU", opcode);
    };

    let reg_a = cpu.operand(1)?;
    let reg_b = match opcode.operand_count() {
        2 => Some(cpu.operand(2)?),
        _ => None,
    };

    alu::execute(op, &mut cpu.registers, &mut cpu.flags, reg_a, reg_b)?;
    cpu.advance(opcode)
}
