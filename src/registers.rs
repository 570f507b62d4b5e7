//! LS-8 register file and flags register.

use std::fmt;

use crate::ExecutionError;

/// Number of registers in the register file.
pub const REGISTER_COUNT: usize = 8;

/// Index of the Interrupt Mask register.
pub const IM: u8 = 5;

/// Index of the Interrupt Status register.
pub const IS: u8 = 6;

/// Index of the Stack Pointer register.
pub const SP: u8 = 7;

/// Initial stack pointer: the top 12 bytes of memory are reserved, the stack
/// grows down from here.
pub const STACK_START: u8 = 0xF4;

/// LS-8 register file.
///
/// Eight 8-bit registers:
/// - R0-R4: general purpose
/// - R5 (IM): interrupt mask
/// - R6 (IS): interrupt status
/// - R7 (SP): stack pointer, the address of the most recently pushed byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    values: [u8; REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Registers in power-on state: everything zero except SP.
    #[must_use]
    pub const fn new() -> Self {
        let mut values = [0; REGISTER_COUNT];
        values[SP as usize] = STACK_START;
        Self { values }
    }

    /// Reads register `index`.
    pub fn get(&self, index: u8) -> Result<u8, ExecutionError> {
        self.values
            .get(index as usize)
            .copied()
            .ok_or(ExecutionError::InvalidRegister { index })
    }

    /// Writes register `index`.
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), ExecutionError> {
        let slot = self
            .values
            .get_mut(index as usize)
            .ok_or(ExecutionError::InvalidRegister { index })?;
        *slot = value;
        Ok(())
    }

    pub fn sp(&self) -> u8 {
        self.values[SP as usize]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.values[SP as usize] = value;
    }

    pub fn interrupt_mask(&self) -> u8 {
        self.values[IM as usize]
    }

    pub fn interrupt_status(&self) -> u8 {
        self.values[IS as usize]
    }

    pub fn set_interrupt_status(&mut self, value: u8) {
        self.values[IS as usize] = value;
    }

    /// All eight registers, R0 first.
    pub fn as_array(&self) -> [u8; REGISTER_COUNT] {
        self.values
    }
}

/// Comparison flags written by CMP.
///
/// Only the low three bits are meaningful:
/// - bit 0: GreaterThan
/// - bit 1: Equal
/// - bit 2: LessThan
///
/// CMP only ever sets bits, so flags accumulate across comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const GREATER: Flags = Flags(0b0000_0001);
    pub const EQUAL: Flags = Flags(0b0000_0010);
    pub const LESS: Flags = Flags(0b0000_0100);

    const MASK: u8 = 0b0000_0111;

    /// Builds flags from a raw byte, discarding the meaningless high bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Flags(bits & Self::MASK)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn equal(self) -> bool {
        self.contains(Self::EQUAL)
    }

    pub fn greater(self) -> bool {
        self.contains(Self::GREATER)
    }

    pub fn less(self) -> bool {
        self.contains(Self::LESS)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            bit(self.less(), 'L'),
            bit(self.equal(), 'E'),
            bit(self.greater(), 'G')
        )
    }
}
