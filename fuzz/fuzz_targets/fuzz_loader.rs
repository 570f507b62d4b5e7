//! Fuzz target for the program text loader.
//!
//! Feeds arbitrary text to the loader and, when it parses, runs the result for a
//! bounded number of cycles.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ls8::loader::parse_program;
use ls8::{FlatMemory, NoInterrupts, CPU};

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let Ok(program) = parse_program(&source) else {
        return;
    };
    assert!(program.len() <= ls8::MEMORY_SIZE);

    let mut cpu = CPU::with_interrupt_source(FlatMemory::new(), Box::new(NoInterrupts));
    cpu.load(&program).unwrap();

    // Programs may loop forever; errors are fine, panics are not
    for _ in 0..10_000 {
        match cpu.step() {
            Ok(ls8::StepOutcome::Halted) | Err(_) => break,
            Ok(_) => {}
        }
    }
});
