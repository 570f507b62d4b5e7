//! WASM API for the LS-8 emulator.
//!
//! `std::time::Instant` is unavailable on `wasm32-unknown-unknown`, so the timer
//! interrupt is driven by `Date.now()` instead.

use wasm_bindgen::prelude::*;

use crate::loader::{self, LoaderConfig};
use crate::{DecodeError, FlatMemory, InterruptSource, StepOutcome, CPU};

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl<E: std::error::Error> From<E> for JsError {
    fn from(err: E) -> Self {
        JsError::new(&err.to_string())
    }
}

/// Timer interrupt source backed by the JavaScript clock.
struct DateTimer {
    period_ms: f64,
    last_fired_ms: f64,
}

impl DateTimer {
    fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            last_fired_ms: js_sys::Date::now(),
        }
    }
}

impl InterruptSource for DateTimer {
    fn poll(&mut self) -> bool {
        let now = js_sys::Date::now();
        if now - self.last_fired_ms >= self.period_ms {
            self.last_fired_ms = now;
            true
        } else {
            false
        }
    }
}

/// Decodes riddle text into its hint.
///
/// `skip_lines` leading lines (the riddle preamble) are ignored.
/// On an execution fault the error message carries the partial hint.
#[wasm_bindgen]
pub fn decode_hint(source: &str, skip_lines: usize) -> Result<String, JsError> {
    let Ls8Emulator { cpu } = Ls8Emulator::new(source, skip_lines)?;
    Ok(run_to_hint(cpu)?)
}

fn run_to_hint(mut cpu: CPU<FlatMemory>) -> Result<String, DecodeError> {
    match cpu.run() {
        Ok(()) => Ok(cpu.into_hint()),
        Err(source) => Err(DecodeError::Execution {
            source,
            partial_hint: cpu.into_hint(),
        }),
    }
}

/// Step-able emulator for JavaScript debuggers.
#[wasm_bindgen]
pub struct Ls8Emulator {
    cpu: CPU<FlatMemory>,
}

#[wasm_bindgen]
impl Ls8Emulator {
    /// Parses and loads `source`, with a one second timer interrupt.
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str, skip_lines: usize) -> Result<Ls8Emulator, JsError> {
        let program = loader::parse_program_with(source, &LoaderConfig { skip_lines })?;

        let mut cpu =
            CPU::with_interrupt_source(FlatMemory::new(), Box::new(DateTimer::new(1000.0)));
        cpu.load(&program)?;

        Ok(Ls8Emulator { cpu })
    }

    /// Executes one dispatch cycle. Returns `false` once the CPU has halted.
    pub fn step(&mut self) -> Result<bool, JsError> {
        Ok(self.cpu.step()? != StepOutcome::Halted)
    }

    /// Runs until HLT.
    pub fn run(&mut self) -> Result<(), JsError> {
        Ok(self.cpu.run()?)
    }

    /// Hint text so far. Still readable after a failed step.
    pub fn hint(&self) -> String {
        self.cpu.hint().to_string()
    }

    /// Values printed by PRN so far.
    pub fn printed(&self) -> Vec<u8> {
        self.cpu.printed().to_vec()
    }

    /// R0-R7.
    pub fn registers(&self) -> Vec<u8> {
        self.cpu.registers().as_array().to_vec()
    }

    /// Human-readable machine state.
    pub fn trace(&self) -> String {
        self.cpu.trace().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u8 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn flags(&self) -> u8 {
        self.cpu.flags().bits()
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.cpu.is_halted()
    }
}
