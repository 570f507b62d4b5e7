//! # ALU (Arithmetic Logic Unit)
//!
//! Stateless executor for the LS-8 arithmetic and logic operations. Operands are
//! register indices; results are written back to the first register and wrap to
//! the 8-bit range. CMP is the only operation that touches the flags register.

use crate::{ExecutionError, Flags, RegisterFile};

/// An operation the ALU can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// regA += regB
    Add,
    /// regA *= regB
    Mul,
    /// regA %= regB, fatal if regB is zero
    Mod,
    /// Record regA vs regB in the flags register
    Cmp,
    /// regA &= regB
    And,
    /// regA |= regB
    Or,
    /// regA ^= regB
    Xor,
    /// regA = 255 - regA
    Not,
    /// regA <<= regB
    Shl,
    /// regA >>= regB
    Shr,
}

/// Executes `op` over registers `reg_a` and `reg_b`.
///
/// `reg_b` is ignored by NOT. For every other operation a missing `reg_b` reads as
/// zero.
///
/// CMP ORs exactly one of LessThan/Equal/GreaterThan into `flags` and never clears
/// a bit that an earlier comparison set.
///
/// On error no register and no flag is modified.
///
/// # Examples
///
/// ```
/// use ls8::{alu, AluOp, Flags, RegisterFile};
///
/// let mut regs = RegisterFile::new();
/// let mut flags = Flags::default();
/// regs.set(0, 200).unwrap();
/// regs.set(1, 100).unwrap();
///
/// alu::execute(AluOp::Add, &mut regs, &mut flags, 0, Some(1)).unwrap();
/// assert_eq!(regs.get(0).unwrap(), 44); // 300 wraps to 44
/// ```
pub fn execute(
    op: AluOp,
    registers: &mut RegisterFile,
    flags: &mut Flags,
    reg_a: u8,
    reg_b: Option<u8>,
) -> Result<(), ExecutionError> {
    let a = registers.get(reg_a)?;
    let b = match reg_b {
        Some(index) if op != AluOp::Not => registers.get(index)?,
        _ => 0,
    };

    let result = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Mod => a.checked_rem(b).ok_or(ExecutionError::DivisionByZero)?,
        AluOp::Cmp => {
            flags.insert(compare(a, b));
            return Ok(());
        }
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Not => 255 - a,
        // Shifting a byte by 8 or more clears it
        AluOp::Shl => a.checked_shl(u32::from(b)).unwrap_or(0),
        AluOp::Shr => a.checked_shr(u32::from(b)).unwrap_or(0),
    };

    registers.set(reg_a, result)
}

fn compare(a: u8, b: u8) -> Flags {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => Flags::LESS,
        std::cmp::Ordering::Equal => Flags::EQUAL,
        std::cmp::Ordering::Greater => Flags::GREATER,
    }
}
