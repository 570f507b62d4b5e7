//! # LS-8 Instruction Implementations
//!
//! Each instruction is a standalone function taking a mutable reference to the CPU
//! and the decoded opcode. Handlers read their own operands and either advance the
//! program counter by the instruction width or set it explicitly.
//!
//! ## Categories
//!
//! - **load_store**: LDI, ST, ADDI
//! - **alu**: ADD, MUL, MOD, CMP, AND, OR, XOR, NOT, SHL, SHR
//! - **stack**: PUSH, POP
//! - **control**: CALL, RET, JMP, JEQ, JNE, IRET
//! - **output**: PRN, PRA
//!
//! HLT is handled by the dispatch loop itself.

pub mod alu;
pub mod control;
pub mod load_store;
pub mod output;
pub mod stack;

use crate::{ExecutionError, MemoryBus, Opcode, CPU};

/// Routes a decoded opcode to its handler.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    opcode: Opcode,
) -> Result<(), ExecutionError> {
    match opcode {
        Opcode::Hlt => Ok(()),
        Opcode::Ldi => load_store::execute_ldi(cpu, opcode),
        Opcode::St => load_store::execute_st(cpu, opcode),
        Opcode::Addi => load_store::execute_addi(cpu, opcode),
        Opcode::Push => stack::execute_push(cpu, opcode),
        Opcode::Pop => stack::execute_pop(cpu, opcode),
        Opcode::Call => control::execute_call(cpu, opcode),
        Opcode::Ret => control::execute_ret(cpu),
        Opcode::Jmp => control::execute_jmp(cpu),
        Opcode::Jeq | Opcode::Jne => control::execute_conditional_jump(cpu, opcode),
        Opcode::Iret => control::execute_iret(cpu),
        Opcode::Prn => output::execute_prn(cpu, opcode),
        Opcode::Pra => output::execute_pra(cpu, opcode),
        Opcode::Add
        | Opcode::Mul
        | Opcode::Mod
        | Opcode::Cmp
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Not
        | Opcode::Shl
        | Opcode::Shr => alu::execute_alu(cpu, opcode),
    }
}
