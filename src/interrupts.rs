//! Interrupt sources and interrupt servicing.
//!
//! The LS-8 has eight interrupt lines, one bit each in the Interrupt Status
//! register (R6), gated by the Interrupt Mask register (R5). In practice a single
//! source is wired up: a wall-clock timer on bit 0.
//!
//! # Timer
//!
//! The CPU polls its [`InterruptSource`] at the top of every dispatch cycle. When
//! the source reports that it fired, the CPU sets IS to the literal value 1. It
//! does not OR the bit in, so any other pending bits are overwritten.
//!
//! # Service Sequence
//!
//! When IS is non-zero, the CPU computes `IM & IS` and looks for the lowest set
//! bit. For the first (and only the first) match it:
//!
//! 1. Clears the whole IS register
//! 2. Pushes PC
//! 3. Pushes the flags register
//! 4. Reads the handler address from the vector table at `0xF8 + bit`
//! 5. Pushes R0 through R6, in that order
//! 6. Jumps to the handler
//!
//! IRET undoes steps 5, 3 and 2 in reverse order. Interrupts are not disabled
//! while a handler runs.
//!
//! # Example
//!
//! ```rust
//! use ls8::InterruptSource;
//!
//! /// Fires exactly once.
//! struct OneShot {
//!     fired: bool,
//! }
//!
//! impl InterruptSource for OneShot {
//!     fn poll(&mut self) -> bool {
//!         !std::mem::replace(&mut self.fired, true)
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{ExecutionError, MemoryBus, CPU};

/// First address of the interrupt vector table.
pub const VECTOR_TABLE_BASE: u8 = 0xF8;

/// A timer that can request an interrupt.
///
/// # Contract
///
/// - Called exactly once per dispatch cycle
/// - Returns `true` when the source wants the CPU to raise its interrupt
pub trait InterruptSource {
    /// Returns `true` if the source fired since the last poll.
    fn poll(&mut self) -> bool;
}

/// Wall-clock timer firing once per `period`.
///
/// The period is measured from the last time the timer fired (initially, from
/// construction), so a CPU that is polled slowly sees at most one interrupt per
/// poll.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    last_fired: Instant,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl InterruptSource for IntervalTimer {
    fn poll(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_fired) >= self.period {
            self.last_fired = now;
            true
        } else {
            false
        }
    }
}

/// A source that never fires. Useful for deterministic runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterrupts;

impl InterruptSource for NoInterrupts {
    fn poll(&mut self) -> bool {
        false
    }
}

/// Services the lowest pending, unmasked interrupt.
///
/// Returns the serviced interrupt number, or `None` when every pending bit is
/// masked (IS is then left untouched).
pub(crate) fn service_pending<M: MemoryBus>(
    cpu: &mut CPU<M>,
) -> Result<Option<u8>, ExecutionError> {
    let masked = cpu.registers.interrupt_mask() & cpu.registers.interrupt_status();

    let Some(index) = (0..8u8).find(|bit| masked & (1 << bit) != 0) else {
        return Ok(None);
    };

    // The whole register is cleared, whichever bit matched
    cpu.registers.set_interrupt_status(0);

    cpu.push(cpu.pc)?;
    cpu.push(cpu.flags.bits())?;

    let handler = cpu.memory.read(VECTOR_TABLE_BASE + index);

    for reg in 0..=6 {
        let value = cpu.reg(reg)?;
        cpu.push(value)?;
    }

    debug!(
        interrupt = index,
        return_pc = cpu.pc,
        handler,
        "servicing interrupt"
    );
    cpu.pc = handler;

    Ok(Some(index))
}
