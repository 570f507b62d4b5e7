//! # Memory Bus Abstraction
//!
//! The LS-8 addresses a single 256-byte memory with 8-bit addresses. The CPU talks
//! to it through the `MemoryBus` trait so tests and hosts can substitute their own
//! backing store.
//!
//! ## Memory Map
//!
//! - `0x00..` - program image, loaded from address 0
//! - `..0xF3` - stack, growing down from `0xF4` (the initial stack pointer)
//! - `0xF8-0xFF` - interrupt vector table, one handler address per interrupt bit
//!
//! Because addresses are `u8`, every address the trait sees is in range. Addresses
//! computed by the CPU that would fall past `0xFF` are rejected before they reach
//! the bus.

/// Number of addressable cells.
pub const MEMORY_SIZE: usize = 256;

/// Memory bus trait for CPU to read/write bytes.
///
/// # Examples
///
/// ```
/// use ls8::{MemoryBus, FlatMemory};
///
/// let mut mem = FlatMemory::new();
///
/// mem.write(0x42, 0x99);
/// assert_eq!(mem.read(0x42), 0x99);
/// ```
pub trait MemoryBus {
    /// Reads the byte at `addr`.
    fn read(&self, addr: u8) -> u8;

    /// Writes `value` at `addr`.
    fn write(&mut self, addr: u8, value: u8);
}

/// Flat 256-byte RAM, all cells initialised to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatMemory {
    data: [u8; MEMORY_SIZE],
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    ///
    /// ```
    /// use ls8::{FlatMemory, MemoryBus};
    ///
    /// let mem = FlatMemory::new();
    /// assert_eq!(mem.read(0x00), 0x00);
    /// assert_eq!(mem.read(0xFF), 0x00);
    /// ```
    pub fn new() -> Self {
        Self {
            data: [0; MEMORY_SIZE],
        }
    }

    /// Returns the whole memory as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u8) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u8, value: u8) {
        self.data[addr as usize] = value;
    }
}
